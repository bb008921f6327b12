use desens_core::{EntityLabel, OverflowPolicy, TextSpan};
use desens_redact::{Chunker, DEFAULT_MASK, SpanRedactor, split_sentences};
use proptest::prelude::*;

// ── Chunking never loses or duplicates text ──────────────────────────────

proptest! {
    #[test]
    fn chunks_concatenate_to_input(
        text in "[a-z孙中山审计局。，！？?!“”]{0,200}",
        max_length in 1usize..40
    ) {
        let chunker = Chunker::new(max_length).unwrap();
        let chunks = chunker.chunk(&text);
        prop_assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn chunks_respect_max_length(
        text in "[a-z孙中山审计局。，！？?!“”]{0,200}",
        max_length in 1usize..40
    ) {
        let chunker = Chunker::new(max_length).unwrap();
        for chunk in chunker.chunk(&text) {
            prop_assert!(!chunk.is_empty());
            prop_assert!(
                chunk.chars().count() <= max_length,
                "chunk {:?} longer than {}",
                chunk,
                max_length
            );
        }
    }

    #[test]
    fn discard_never_repeats_pending_text(
        text in "[a-z孙中山审计局。，！？]{0,200}",
        max_length in 1usize..20
    ) {
        let chunker = Chunker::new(max_length)
            .unwrap()
            .with_overflow(OverflowPolicy::Discard);
        let emitted: usize = chunker.chunk(&text).iter().map(|c| c.chars().count()).sum();
        prop_assert!(emitted <= text.chars().count());
    }

    #[test]
    fn discard_matches_flush_when_no_fragment_overflows(
        text in "[a-z孙中山。，！？]{0,120}",
    ) {
        let max_length = split_sentences(&text)
            .iter()
            .map(|f| f.chars().count())
            .max()
            .unwrap_or(1);
        let flush = Chunker::new(max_length).unwrap();
        let discard = Chunker::new(max_length)
            .unwrap()
            .with_overflow(OverflowPolicy::Discard);
        prop_assert_eq!(flush.chunk(&text), discard.chunk(&text));
    }
}

// ── Span redaction length accounting ─────────────────────────────────────

proptest! {
    #[test]
    fn disjoint_spans_shrink_by_span_lengths(
        words in prop::collection::vec("[a-z]{1,6}", 1..8)
    ) {
        // One entity per word, separated by a single space; no unit suffixes
        let text = words.join(" ");
        let mut spans = Vec::new();
        let mut offset = 0;
        for word in &words {
            let len = word.chars().count();
            spans.push(TextSpan::new(word.clone(), EntityLabel::Person, offset, offset + len));
            offset += len + 1;
        }

        let redactor = SpanRedactor::new(DEFAULT_MASK, [EntityLabel::Person]);
        let result = redactor.redact(&text, &spans);

        let removed: usize = spans.iter().map(TextSpan::len).sum();
        let expected = text.chars().count() - removed + spans.len() * DEFAULT_MASK.len();
        prop_assert_eq!(result.text.chars().count(), expected);
        prop_assert_eq!(result.applied, spans.len());
    }

    #[test]
    fn suffix_entities_keep_their_unit(
        name in "[a-z]{1,6}",
        unit in prop::sample::select(vec!["局", "市", "省", "社区", "公司"])
    ) {
        let entity = format!("{name}{unit}");
        let len = entity.chars().count();
        let text = format!("{entity}派出审计组");

        let redactor = SpanRedactor::new(DEFAULT_MASK, EntityLabel::redactable());
        let result = redactor.redact(&text, &[TextSpan::new(entity, "NT", 0, len)]);

        prop_assert_eq!(result.text, format!("{DEFAULT_MASK}{unit}派出审计组"));
    }
}
