//! Sentence-aware chunking of paragraph text
//!
//! Entity recognizers accept a bounded input length. Paragraphs are cut
//! after sentence-ending punctuation and the fragments are packed greedily
//! into chunks of at most `max_length` characters.

use desens_core::{Error, OverflowPolicy, Result};

/// Punctuation that ends a fragment. The delimiter stays with the
/// fragment it terminates.
const SENTENCE_ENDERS: &[char] = &['。', '，', '”', '“', '！', '？', '?', '!'];

#[derive(Debug, Clone)]
pub struct Chunker {
    max_length: usize,
    overflow: OverflowPolicy,
}

impl Chunker {
    pub fn new(max_length: usize) -> Result<Self> {
        if max_length == 0 {
            return Err(Error::InvalidChunkLength(max_length));
        }

        Ok(Self {
            max_length,
            overflow: OverflowPolicy::default(),
        })
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Split `text` into chunks of at most `max_length` characters.
    ///
    /// A fragment longer than the limit is hard-sliced into pieces of
    /// exactly `max_length` characters (the last one may be shorter), with
    /// no further boundary search.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_len = 0;

        for fragment in split_sentences(text) {
            let len = fragment.chars().count();

            if current_len + len <= self.max_length {
                current.push_str(fragment);
                current_len += len;
                continue;
            }

            if len > self.max_length {
                match self.overflow {
                    OverflowPolicy::Flush => {
                        if !current.is_empty() {
                            chunks.push(std::mem::take(&mut current));
                        }
                    }
                    OverflowPolicy::Discard => {
                        if !current.is_empty() {
                            tracing::warn!(
                                dropped_chars = current_len,
                                "Discarding pending chunk before oversized fragment"
                            );
                        }
                        current.clear();
                    }
                }
                current_len = 0;
                chunks.extend(hard_slice(fragment, self.max_length));
            } else {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                current.push_str(fragment);
                current_len = len;
            }
        }

        if !current.is_empty() {
            chunks.push(current);
        }

        chunks
    }
}

/// Split text after every sentence ender, keeping the ender on the left
/// fragment. Never yields empty fragments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if SENTENCE_ENDERS.contains(&ch) {
            let end = idx + ch.len_utf8();
            fragments.push(&text[start..end]);
            start = end;
        }
    }

    if start < text.len() {
        fragments.push(&text[start..]);
    }

    fragments
}

fn hard_slice(fragment: &str, size: usize) -> Vec<String> {
    let chars: Vec<char> = fragment.chars().collect();
    chars
        .chunks(size)
        .map(|piece| piece.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_sentences_keeps_enders() {
        let fragments = split_sentences("你好。世界很大！再见");
        assert_eq!(fragments, vec!["你好。", "世界很大！", "再见"]);

        let fragments = split_sentences("他说“走吧”，然后走了?对!");
        assert_eq!(
            fragments,
            vec!["他说“", "走吧”", "，", "然后走了?", "对!"]
        );
    }

    #[test]
    fn test_split_sentences_edge_cases() {
        assert!(split_sentences("").is_empty());
        assert_eq!(split_sentences("。"), vec!["。"]);
        assert_eq!(split_sentences("no enders here"), vec!["no enders here"]);
    }

    #[test]
    fn test_short_paragraph_is_single_chunk() {
        let chunker = Chunker::new(126).unwrap();
        let chunks = chunker.chunk("孙中山是开国元勋吗？");
        assert_eq!(chunks, vec!["孙中山是开国元勋吗？"]);
    }

    #[test]
    fn test_greedy_packing() {
        let chunker = Chunker::new(5).unwrap();
        let chunks = chunker.chunk("你好。世界很大！再见");
        assert_eq!(chunks, vec!["你好。", "世界很大！", "再见"]);

        let chunker = Chunker::new(8).unwrap();
        let chunks = chunker.chunk("你好。世界很大！再见");
        assert_eq!(chunks, vec!["你好。世界很大！", "再见"]);
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 6 characters, 18 bytes
        let chunker = Chunker::new(6).unwrap();
        let chunks = chunker.chunk("连云港市审计");
        assert_eq!(chunks, vec!["连云港市审计"]);
    }

    #[test]
    fn test_oversized_fragment_flushes_pending_buffer() {
        let chunker = Chunker::new(4).unwrap();
        let chunks = chunker.chunk("甲。乙丙丁戊己庚。辛");
        assert_eq!(chunks, vec!["甲。", "乙丙丁戊", "己庚。", "辛"]);
        assert_eq!(chunks.concat(), "甲。乙丙丁戊己庚。辛");
    }

    #[test]
    fn test_oversized_fragment_discard_drops_pending_buffer() {
        let chunker = Chunker::new(4)
            .unwrap()
            .with_overflow(OverflowPolicy::Discard);
        let chunks = chunker.chunk("甲。乙丙丁戊己庚。辛");

        // "甲。" is lost in this mode, and never re-emitted ahead of "辛"
        assert_eq!(chunks, vec!["乙丙丁戊", "己庚。", "辛"]);
    }

    #[test]
    fn test_hard_slice_exact_multiple() {
        let chunker = Chunker::new(3).unwrap();
        let chunks = chunker.chunk("abcdefghi");
        assert_eq!(chunks, vec!["abc", "def", "ghi"]);
    }

    #[test]
    fn test_empty_text() {
        let chunker = Chunker::new(10).unwrap();
        assert!(chunker.chunk("").is_empty());
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(matches!(
            Chunker::new(0),
            Err(Error::InvalidChunkLength(0))
        ));
    }
}
