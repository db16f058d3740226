//! Channel Classifier
//!
//! Maps a settled URL to a channel with a fixed precedence; the first
//! matching rule wins:
//!
//! 1. host contains the native storefront domain
//! 2. host contains the alternate marketplace domain
//! 3. site name of the URL's host contains the declared site name
//! 4. host or path contains a fashion keyword
//! 5. otherwise unclassified
//!
//! Rule 3 is substring containment, so a declared `examplestore` also
//! matches `examplestorex.com`. That false positive is accepted.

use tracing::trace;

use super::types::{ChannelCategory, ClassificationResult};
use crate::config::FinderConfig;
use crate::utils::{clean_url, host_of, path_of, site_name};

/// Classifier bound to one marketplace's domains and keywords
#[derive(Debug, Clone)]
pub struct ChannelClassifier {
    native_storefront_domain: String,
    alternate_marketplace_domain: String,
    fashion_keywords: Vec<String>,
}

impl ChannelClassifier {
    #[must_use]
    pub fn new(config: &FinderConfig) -> Self {
        Self {
            native_storefront_domain: config.native_storefront_domain().to_lowercase(),
            alternate_marketplace_domain: config.alternate_marketplace_domain().to_lowercase(),
            fashion_keywords: config
                .fashion_keywords()
                .iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Classify `final_url` for a seller whose declared homepage is
    /// `declared_url` (may be empty).
    #[must_use]
    pub fn classify(&self, final_url: &str, declared_url: &str) -> ClassificationResult {
        let category = self.category_of(final_url, declared_url);
        trace!("Classified {final_url} as {category}");
        ClassificationResult {
            category,
            url: final_url.to_string(),
        }
    }

    fn category_of(&self, final_url: &str, declared_url: &str) -> ChannelCategory {
        // Unparsable URLs are matched on their cleaned text
        let host = host_of(final_url).unwrap_or_else(|| clean_url(final_url));
        let path = path_of(final_url).unwrap_or_default();

        if contains_domain(&host, &self.native_storefront_domain) {
            return ChannelCategory::NativeStorefront;
        }

        if contains_domain(&host, &self.alternate_marketplace_domain) {
            return ChannelCategory::AlternateMarketplace;
        }

        let declared = site_name(declared_url);
        if !declared.is_empty() && site_name(final_url).contains(&declared) {
            return ChannelCategory::OwnedSite;
        }

        if self
            .fashion_keywords
            .iter()
            .any(|keyword| host.contains(keyword.as_str()) || path.contains(keyword.as_str()))
        {
            return ChannelCategory::FashionChannel;
        }

        ChannelCategory::Unclassified
    }
}

fn contains_domain(host: &str, domain: &str) -> bool {
    !domain.is_empty() && host.contains(domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> ChannelClassifier {
        ChannelClassifier::new(&FinderConfig::default())
    }

    fn category(url: &str, declared: &str) -> ChannelCategory {
        classifier().classify(url, declared).category
    }

    #[test]
    fn native_storefront_first() {
        assert_eq!(
            category("https://smartstore.naver.com/acme", "acme.com"),
            ChannelCategory::NativeStorefront
        );
    }

    #[test]
    fn alternate_marketplace_beats_fashion_keyword() {
        assert_eq!(
            category("https://zigzag.kr/catalog/fashion/123", ""),
            ChannelCategory::AlternateMarketplace
        );
    }

    #[test]
    fn owned_site_by_containment() {
        assert_eq!(
            category("https://shop.examplestore.com/item", "examplestore.com"),
            ChannelCategory::OwnedSite
        );
        // Literal substring: accepted false positive
        assert_eq!(
            category("https://examplestorex.com/", "examplestore.com"),
            ChannelCategory::OwnedSite
        );
    }

    #[test]
    fn declared_name_in_path_or_query_is_not_owned() {
        assert_eq!(
            category("https://marketplace.example.jp/acme", "acme.com"),
            ChannelCategory::Unclassified
        );
        assert_eq!(
            category("https://partner.example/landing?ref=acme", "acme.com"),
            ChannelCategory::Unclassified
        );
    }

    #[test]
    fn empty_declared_url_never_owns() {
        assert_eq!(
            category("https://acme.com/p/1", ""),
            ChannelCategory::Unclassified
        );
    }

    #[test]
    fn fashion_keyword_in_host_or_path() {
        assert_eq!(
            category("https://bestapparel.example/", "acme.com"),
            ChannelCategory::FashionChannel
        );
        assert_eq!(
            category("https://mall.example/women/clothing", "acme.com"),
            ChannelCategory::FashionChannel
        );
    }

    #[test]
    fn owned_site_beats_fashion_keyword() {
        assert_eq!(
            category("https://acmestyle.com/", "acmestyle.com"),
            ChannelCategory::OwnedSite
        );
    }

    #[test]
    fn classification_keeps_the_url() {
        let result = classifier().classify("https://elsewhere.example/x", "acme.com");
        assert_eq!(result.category, ChannelCategory::Unclassified);
        assert_eq!(result.url, "https://elsewhere.example/x");
    }
}
