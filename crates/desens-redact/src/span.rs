//! Entity span masking
//!
//! Spans are applied in descending `start` order so each replacement only
//! changes text to the right of the spans still waiting to be applied.
//! Overlapping spans are not merged: an earlier-starting span is applied
//! to text already rewritten by the later-starting ones.

use desens_core::{EntityLabel, TextSpan};
use std::collections::HashSet;

pub const DEFAULT_MASK: &str = "**";

/// Organizational and administrative unit tokens kept after masking
pub const DEFAULT_UNIT_SUFFIXES: &[&str] = &[
    "局", "公司", "工程", "省", "市", "县", "区", "街道", "社区", "小区", "花园", "苑",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRedaction {
    pub text: String,
    /// Number of spans that were replaced
    pub applied: usize,
}

#[derive(Debug, Clone)]
pub struct SpanRedactor {
    mask: String,
    allowed: HashSet<EntityLabel>,
    /// Sorted longest first so "社区" wins over "区"
    suffixes: Vec<String>,
}

impl SpanRedactor {
    pub fn new(mask: impl Into<String>, allowed: impl IntoIterator<Item = EntityLabel>) -> Self {
        Self {
            mask: mask.into(),
            allowed: allowed.into_iter().collect(),
            suffixes: Vec::new(),
        }
        .with_suffixes(DEFAULT_UNIT_SUFFIXES.iter().copied())
    }

    pub fn with_suffixes<I, S>(mut self, suffixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut suffixes: Vec<String> = suffixes
            .into_iter()
            .map(Into::into)
            .filter(|s| !s.is_empty())
            .collect();
        suffixes.sort_by(|a, b| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
        });
        suffixes.dedup();
        self.suffixes = suffixes;
        self
    }

    pub fn mask(&self) -> &str {
        &self.mask
    }

    pub fn allows(&self, label: &EntityLabel) -> bool {
        self.allowed.contains(label)
    }

    /// Trailing unit token of `entity`, if it ends with a configured suffix
    pub fn unit_suffix<'a>(&self, entity: &'a str) -> Option<&'a str> {
        self.suffixes
            .iter()
            .find(|suffix| entity.ends_with(suffix.as_str()))
            .map(|suffix| &entity[entity.len() - suffix.len()..])
    }

    /// Mask text for one entity: the mask plus any preserved unit suffix
    pub fn replacement(&self, entity: &str) -> String {
        match self.unit_suffix(entity) {
            Some(unit) => format!("{}{}", self.mask, unit),
            None => self.mask.clone(),
        }
    }

    pub fn redact(&self, chunk: &str, spans: &[TextSpan]) -> SpanRedaction {
        let mut ordered: Vec<&TextSpan> = spans
            .iter()
            .filter(|span| self.allows(&span.label))
            .collect();
        ordered.sort_by(|a, b| b.start.cmp(&a.start));

        let mut text = chunk.to_string();
        let mut applied = 0;

        for span in ordered {
            if span.is_empty() {
                tracing::debug!(start = span.start, end = span.end, "Skipping empty span");
                continue;
            }

            let replacement = self.replacement(&span.text);
            tracing::debug!(
                label = %span.label,
                entity = %span.text,
                start = span.start,
                end = span.end,
                "Masking entity"
            );
            text = splice_chars(&text, span.start, span.end, &replacement);
            applied += 1;
        }

        SpanRedaction { text, applied }
    }
}

/// Replace characters `[start, end)` of `text`, clamping both offsets to
/// the current length.
fn splice_chars(text: &str, start: usize, end: usize, replacement: &str) -> String {
    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end.max(start));

    let mut out =
        String::with_capacity(text.len() - (end_byte - start_byte) + replacement.len());
    out.push_str(&text[..start_byte]);
    out.push_str(replacement);
    out.push_str(&text[end_byte..]);
    out
}

fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redactor() -> SpanRedactor {
        SpanRedactor::new(DEFAULT_MASK, EntityLabel::redactable())
    }

    #[test]
    fn test_person_masked() {
        let spans = vec![TextSpan::new("孙中山", "PERSON", 0, 3)];
        let result = redactor().redact("孙中山是开国元勋吗？", &spans);
        assert_eq!(result.text, "**是开国元勋吗？");
        assert_eq!(result.applied, 1);
    }

    #[test]
    fn test_unit_suffix_preserved() {
        let spans = vec![TextSpan::new("连云港市审计局", "ORGANIZATION", 0, 7)];
        let result = redactor().redact("连云港市审计局派出审计组", &spans);
        assert_eq!(result.text, "**局派出审计组");

        let spans = vec![TextSpan::new("上海市", "NS", 2, 5)];
        let result = redactor().redact("位于上海市中心", &spans);
        assert_eq!(result.text, "位于**市中心");
    }

    #[test]
    fn test_longest_suffix_wins() {
        let r = redactor();
        assert_eq!(r.unit_suffix("阳光社区"), Some("社区"));
        assert_eq!(r.unit_suffix("浦东新区"), Some("区"));
        assert_eq!(r.unit_suffix("华为技术有限公司"), Some("公司"));
        assert_eq!(r.unit_suffix("张三"), None);
        assert_eq!(r.replacement("阳光社区"), "**社区");
    }

    #[test]
    fn test_disallowed_label_untouched() {
        let r = SpanRedactor::new("*", [EntityLabel::Person]);
        let spans = vec![
            TextSpan::new("张三", "PERSON", 0, 2),
            TextSpan::new("北京市", "LOCATION", 3, 6),
            TextSpan::new("明天", "DATE", 7, 9),
        ];
        let result = r.redact("张三在北京市，明天见", &spans);
        assert_eq!(result.text, "*在北京市，明天见");
        assert_eq!(result.applied, 1);
    }

    #[test]
    fn test_unsorted_spans_applied_right_to_left() {
        let spans = vec![
            TextSpan::new("张三", "PERSON", 0, 2),
            TextSpan::new("北京", "LOCATION", 6, 8),
            TextSpan::new("李四", "PERSON", 3, 5),
        ];
        let result = redactor().redact("张三和李四在北京", &spans);
        assert_eq!(result.text, "**和**在**");
        assert_eq!(result.applied, 3);
    }

    #[test]
    fn test_overlapping_spans_mutate_sequentially() {
        let spans = vec![
            TextSpan::new("BCD", "PERSON", 1, 4),
            TextSpan::new("CDEF", "LOCATION", 2, 6),
        ];
        // CDEF first: "AB**G", then [1, 4) of that: "A" + "**" + "G"
        let result = redactor().redact("ABCDEFG", &spans);
        assert_eq!(result.text, "A**G");
    }

    #[test]
    fn test_empty_spans_return_chunk() {
        let result = redactor().redact("没有实体的文本。", &[]);
        assert_eq!(result.text, "没有实体的文本。");
        assert_eq!(result.applied, 0);
    }

    #[test]
    fn test_offsets_past_end_are_clamped() {
        let spans = vec![TextSpan::new("xyz", "PERSON", 5, 9)];
        let result = redactor().redact("abc", &spans);
        assert_eq!(result.text, "abc**");
    }

    #[test]
    fn test_custom_suffixes() {
        let r = redactor().with_suffixes(["大学"]);
        assert_eq!(r.replacement("南京大学"), "**大学");
        assert_eq!(r.replacement("审计局"), "**");
    }
}
