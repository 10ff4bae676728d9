//! Property-based tests for the bilingual fallback rule.

use folio_model::{Lang, LocalizedText, Record};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    /// A non-empty secondary value always wins for the secondary language.
    #[test]
    fn prop_secondary_wins_when_non_empty(base in ".*", en in ".+") {
        let text = LocalizedText::new(base.clone()).with(Lang::En, en.clone());
        prop_assert_eq!(text.resolve(Lang::En), en.as_str());
        prop_assert_eq!(text.resolve(Lang::Ru), base.as_str());
    }

    /// An empty secondary value is ignored.
    #[test]
    fn prop_empty_override_is_ignored(base in ".*") {
        let record = Record::from_value(json!({"field": base, "field_en": ""}))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(record.resolve("field", Lang::En), base.clone());
        prop_assert_eq!(record.resolve("field", Lang::Ru), base);
    }

    /// Fields resolve independently of each other.
    #[test]
    fn prop_fields_resolve_independently(a in ".+", a_en in ".+", b in ".+") {
        let record = Record::from_value(json!({"a": a, "a_en": a_en, "b": b}))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert_eq!(record.resolve("a", Lang::En), a_en);
        prop_assert_eq!(record.resolve("b", Lang::En), b);
    }

    /// Reading a written pair gives back the same text.
    #[test]
    fn prop_localized_pair_round_trips(base in ".*", en in ".*") {
        let text = LocalizedText::new(base).with(Lang::En, en);
        let mut record = Record::new();
        record.put_localized("title", &text);
        prop_assert_eq!(record.localized("title"), text);
    }
}
