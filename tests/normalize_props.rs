//! Property tests for the URL normalizers

use kodegen_tools_storefinder::utils::{clean_url, normalize_domain};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalize_domain_is_idempotent(input in ".{0,64}") {
        let once = normalize_domain(&input);
        prop_assert_eq!(normalize_domain(&once), once.clone());
    }

    #[test]
    fn normalize_domain_is_lowercase_alphanumeric(input in ".{0,64}") {
        let normalized = normalize_domain(&input);
        prop_assert!(normalized.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn scheme_and_www_do_not_matter(name in "[a-v][a-v0-9]{0,15}", tld in "(com|co\\.kr|net|shop)") {
        let bare = normalize_domain(&format!("{name}.{tld}"));
        prop_assert_eq!(normalize_domain(&format!("https://www.{name}.{tld}/any/path")), bare.clone());
        prop_assert_eq!(normalize_domain(&format!("http://{name}.{tld}")), bare);
    }

    #[test]
    fn clean_url_ignores_scheme_and_trailing_slash(host in "[a-v]{1,12}\\.test", path in "(/[a-z0-9]{1,6}){0,3}") {
        prop_assert_eq!(
            clean_url(&format!("https://www.{host}{path}/")),
            clean_url(&format!("http://{host}{path}"))
        );
    }
}

#[test]
fn documented_example() {
    assert_eq!(normalize_domain("https://www.Example.co.kr/shop"), "example");
}
