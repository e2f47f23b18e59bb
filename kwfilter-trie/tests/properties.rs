// kwfilter-trie/tests/properties.rs
//! Property tests for scanning, masking and cascading replacement.

use std::collections::BTreeSet;

use kwfilter_trie::{PatternSet, Replacer, DEFAULT_MASK_CHAR};
use proptest::collection::{btree_map, vec};
use proptest::prelude::*;

/// Keywords drawn from a small alphabet so that matches are frequent.
fn keywords() -> impl Strategy<Value = Vec<String>> {
    vec("[abc]{1,4}", 0..6)
}

fn text() -> impl Strategy<Value = String> {
    "[abcdé ]{0,40}"
}

proptest! {
    #[test]
    fn every_span_covers_a_keyword(words in keywords(), input in text()) {
        let set = PatternSet::new(&words);
        let chars: Vec<char> = input.chars().collect();
        let vocabulary: BTreeSet<&str> = words.iter().map(String::as_str).collect();

        for span in set.scan_matches(&input) {
            let found = span.extract(&chars);
            prop_assert!(vocabulary.contains(found.as_str()), "unexpected match {:?}", found);
        }
    }

    #[test]
    fn masking_is_idempotent(words in keywords(), input in text()) {
        let set = PatternSet::new(&words);
        let first = set.mask_filter(&input, DEFAULT_MASK_CHAR);
        let second = set.mask_filter(&first.masked, DEFAULT_MASK_CHAR);

        prop_assert!(!second.found);
        prop_assert_eq!(&second.masked, &first.masked);
        prop_assert_eq!(first.masked.chars().count(), input.chars().count());
        prop_assert_eq!(first.found, !first.keywords.is_empty());
    }

    #[test]
    fn text_without_keywords_is_untouched(words in keywords(), input in "[dé ]{0,40}") {
        let set = PatternSet::new(&words);
        let outcome = set.mask_filter(&input, DEFAULT_MASK_CHAR);

        prop_assert_eq!(outcome.masked, input);
        prop_assert!(outcome.keywords.is_empty());
        prop_assert!(!outcome.found);
    }

    #[test]
    fn find_keywords_agrees_with_mask_filter(words in keywords(), input in text()) {
        let set = PatternSet::new(&words);
        prop_assert_eq!(set.find_keywords(&input), set.mask_filter(&input, '#').keywords);
    }

    #[test]
    fn identity_replacer_is_identity(words in keywords(), input in text()) {
        let replacer = Replacer::new(words.iter().map(|w| (w.clone(), w.clone())));
        let outcome = replacer.replace_with_outcome(&input);

        prop_assert_eq!(outcome.text, input);
        prop_assert_eq!(outcome.cascades, 0);
    }

    #[test]
    fn acyclic_replacement_reaches_a_fixed_point(
        mapping in btree_map("[ab]{1,3}", "[XY]{1,3}", 0..5),
        input in "[abX ]{0,30}",
    ) {
        let replacer = Replacer::new(mapping.clone());
        let outcome = replacer.replace_with_outcome(&input);

        prop_assert!(!outcome.truncated);
        for key in mapping.keys() {
            prop_assert!(!outcome.text.contains(key.as_str()), "{:?} survived in {:?}", key, outcome.text);
        }
    }
}
