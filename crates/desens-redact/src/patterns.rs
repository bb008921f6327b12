//! Regex pre-pass applied before entity recognition
//!
//! Catches what recognizers tend to miss: numbers following "编号" and
//! company names ending in "公司".

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Alternation order matters: at any position the ID rule is tried first.
static SUPPLEMENTARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(编号)\d+|\w*公司").expect("supplementary pattern is valid")
});

#[derive(Debug, Clone)]
pub struct PatternRedactor {
    mask: String,
}

impl PatternRedactor {
    pub fn new(mask: impl Into<String>) -> Self {
        Self { mask: mask.into() }
    }

    /// Mask ID numbers and company names. Returns the rewritten text and
    /// the number of matches replaced. Unmatched text passes through.
    pub fn apply(&self, chunk: &str) -> (String, usize) {
        let mut count = 0;
        let text = SUPPLEMENTARY.replace_all(chunk, |caps: &Captures| {
            count += 1;
            match caps.get(1) {
                Some(label) => format!("{}{}", label.as_str(), self.mask),
                None => format!("{}公司", self.mask),
            }
        });

        (text.into_owned(), count)
    }
}

impl Default for PatternRedactor {
    fn default() -> Self {
        Self::new(crate::DEFAULT_MASK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_number_masked() {
        let redactor = PatternRedactor::default();
        let (text, count) = redactor.apply("合同编号12345，已归档。");

        assert_eq!(text, "合同编号**，已归档。");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_company_name_collapsed() {
        let redactor = PatternRedactor::default();
        let (text, count) = redactor.apply("合同编号12345，由华为技术有限公司签署。");

        assert_eq!(text, "合同编号**，**公司签署。");
        assert_eq!(count, 2);
    }

    #[test]
    fn test_bare_company_masked() {
        let redactor = PatternRedactor::new("*");
        let (text, _) = redactor.apply("。公司规定");
        assert_eq!(text, "。*公司规定");
    }

    #[test]
    fn test_greedy_word_run() {
        // The word run is greedy up to the last "公司" before punctuation
        let redactor = PatternRedactor::default();
        let (text, count) = redactor.apply("甲公司和乙公司，合作");
        assert_eq!(text, "**公司，合作");
        assert_eq!(count, 1);
    }

    #[test]
    fn test_no_match_passes_through() {
        let redactor = PatternRedactor::default();
        let (text, count) = redactor.apply("今天天气很好。编号为空");

        assert_eq!(text, "今天天气很好。编号为空");
        assert_eq!(count, 0);
    }
}
