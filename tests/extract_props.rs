use proptest::prelude::*;
use review_sentiment::nlp::extract::{extract_balanced, extract_brace_span, ExtractStrategy};
use serde_json::json;

fn clean_object() -> impl Strategy<Value = String> {
    (
        "[a-zA-Zçãé ]{0,12}",
        "[^\\\\]{0,24}",
        0u32..1000,
        proptest::bool::ANY,
    )
        .prop_map(|(key, text, n, flag)| {
            json!({ key: text, "n": n, "nested": {"flag": flag, "list": [text, n]} }).to_string()
        })
}

proptest! {
    #[test]
    fn clean_json_is_returned_unchanged(obj in clean_object()) {
        prop_assert_eq!(extract_brace_span(&obj), obj.as_str());
        prop_assert_eq!(extract_balanced(&obj), obj.as_str());
    }

    #[test]
    fn surrounding_prose_is_stripped(obj in clean_object(), before in "[a-z .:\n]{0,30}", after in "[a-z .!\n]{0,30}") {
        let reply = format!("{before}{obj}{after}");
        prop_assert_eq!(ExtractStrategy::Balanced.extract(&reply), obj.as_str());
        prop_assert_eq!(ExtractStrategy::BraceSpan.extract(&reply), obj.as_str());
    }

    #[test]
    fn text_without_open_brace_is_empty(text in "[^{]{0,64}") {
        prop_assert_eq!(extract_brace_span(&text), "");
        prop_assert_eq!(extract_balanced(&text), "");
    }

    #[test]
    fn text_without_close_brace_is_empty(text in "[^}]{0,64}") {
        prop_assert_eq!(extract_brace_span(&text), "");
        prop_assert_eq!(extract_balanced(&text), "");
    }
}
