//! Property-based tests for filter rendering

use pbchat::backend::store::{escape_filter_value, Filter};
use proptest::prelude::*;

/// How the backend reads a quoted literal back: only `\"` is unescaped
fn unquote(escaped: &str) -> String {
    escaped.replace("\\\"", "\"")
}

/// Every `"` in the escaped text is preceded by a backslash
fn quotes_are_escaped(escaped: &str) -> bool {
    let mut previous = None;
    for c in escaped.chars() {
        if c == '"' && previous != Some('\\') {
            return false;
        }
        previous = Some(c);
    }
    true
}

proptest! {
    #[test]
    fn test_escape_is_reversible(raw in ".*") {
        prop_assert_eq!(unquote(&escape_filter_value(&raw)), raw);
    }

    #[test]
    fn test_backslashes_are_untouched(raw in r"[a-z\\]*") {
        prop_assert_eq!(escape_filter_value(&raw), raw);
    }

    #[test]
    fn test_quotes_are_always_escaped(raw in r#"[a-z"\\ ]*"#) {
        prop_assert!(quotes_are_escaped(&escape_filter_value(&raw)));
    }

    #[test]
    fn test_rendered_equality_wraps_escaped_value(field in "[a-zA-Z]{1,12}", raw in ".*") {
        let rendered = Filter::eq(field.clone(), raw.as_str()).render();
        let expected = format!("{} = \"{}\"", field, escape_filter_value(&raw));
        prop_assert_eq!(rendered, expected);
    }

    #[test]
    fn test_conjunction_flattens(a in 0i64..1000, b in 0i64..1000, c in 0i64..1000) {
        let nested = Filter::eq("a", a).and(Filter::eq("b", b)).and(Filter::eq("c", c));
        match nested {
            Filter::And(parts) => prop_assert_eq!(parts.len(), 3),
            other => prop_assert!(false, "expected a conjunction, got {:?}", other),
        }
    }
}
