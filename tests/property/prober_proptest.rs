//! Property-based tests for identity candidates

use pbchat::backend::auth::prober::candidate_filters;
use pbchat::backend::store::Filter;
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_email_identity_probes_email_only(local in "[a-z0-9.]{1,16}", domain in "[a-z]{1,10}\\.[a-z]{2,4}") {
        let identity = format!("{local}@{domain}");
        prop_assert_eq!(
            candidate_filters(&identity),
            vec![Filter::eq("email", identity.as_str())]
        );
    }

    #[test]
    fn test_username_probes_username_then_email(identity in "[^@]{1,32}") {
        prop_assert_eq!(
            candidate_filters(&identity),
            vec![
                Filter::eq("username", identity.as_str()),
                Filter::eq("email", identity.as_str()),
            ]
        );
    }

    #[test]
    fn test_never_more_than_two_candidates(identity in ".{1,40}") {
        let candidates = candidate_filters(&identity);
        prop_assert!(!candidates.is_empty());
        prop_assert!(candidates.len() <= 2);
    }
}
