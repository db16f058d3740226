//! Data model for channel discovery
//!
//! `SellerRecord` is read-only input and `SellerOutcome` is the only thing
//! persisted. Everything in between lives for one seller's pipeline run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::constants::UNKNOWN_SELLER_NAME;

/// One row of the input table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerRecord {
    pub id: i64,
    pub display_name: String,
    pub rank: i64,
    /// Declared homepage, empty when the seller has none
    pub declared_url: String,
}

impl SellerRecord {
    /// Build a record from raw cell values, applying the defaults for blanks.
    ///
    /// Blank or non-numeric `id`/`rank` become 0, a blank name becomes
    /// `"Unknown"`, a blank URL stays empty.
    #[must_use]
    pub fn from_raw(
        id: Option<&str>,
        display_name: Option<&str>,
        rank: Option<&str>,
        declared_url: Option<&str>,
    ) -> Self {
        Self {
            id: parse_integer(id),
            display_name: non_blank(display_name)
                .unwrap_or(UNKNOWN_SELLER_NAME)
                .to_string(),
            rank: parse_integer(rank),
            declared_url: non_blank(declared_url).unwrap_or_default().to_string(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Integer cell; spreadsheets export whole numbers as `12.0` too
fn parse_integer(value: Option<&str>) -> i64 {
    let Some(raw) = non_blank(value) else {
        return 0;
    };
    raw.parse::<i64>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        })
        .unwrap_or(0)
}

/// One product item read from the search results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingCandidate {
    /// Product page link; `None` when the item has no readable link
    pub product_url: Option<String>,
    pub title: String,
    /// Number of sellers co-listed on the item
    pub seller_link_count: usize,
    /// Seller link whose domain contains the declared domain
    pub owned_domain_match_url: Option<String>,
}

/// What the Candidate Selector hands to the orchestrator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSelection {
    /// Product page of the chosen listing
    pub product_url: Option<String>,
    pub title: Option<String>,
    /// Owned-domain signal from the listing scan, independent of the choice
    pub owned_domain_match_url: Option<String>,
}

impl SearchSelection {
    /// Nothing worth following
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.product_url.is_none() && self.owned_domain_match_url.is_none()
    }
}

/// Raw outbound purchase link, in discovery order
pub type SellerLink = String;

/// A seller link after redirect resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub source_link: SellerLink,
    pub final_url: String,
    /// Came straight from the listing-scan owned-domain signal; bypasses
    /// classification
    pub is_owned_domain: bool,
}

impl ResolvedLink {
    #[must_use]
    pub fn resolved(source_link: SellerLink, final_url: String) -> Self {
        Self {
            source_link,
            final_url,
            is_owned_domain: false,
        }
    }

    #[must_use]
    pub fn owned_signal(url: String) -> Self {
        Self {
            source_link: url.clone(),
            final_url: url,
            is_owned_domain: true,
        }
    }
}

/// Distribution channel a URL belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelCategory {
    NativeStorefront,
    OwnedSite,
    FashionChannel,
    AlternateMarketplace,
    Unclassified,
}

impl ChannelCategory {
    /// Output table column holding this category, if any
    #[must_use]
    pub fn column(self) -> Option<&'static str> {
        match self {
            Self::NativeStorefront => Some("smart_store"),
            Self::OwnedSite => Some("own_mall"),
            Self::FashionChannel => Some("fashion_mall"),
            Self::AlternateMarketplace => Some("zigzag_mall"),
            Self::Unclassified => None,
        }
    }
}

impl fmt::Display for ChannelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NativeStorefront => "native storefront",
            Self::OwnedSite => "owned site",
            Self::FashionChannel => "fashion channel",
            Self::AlternateMarketplace => "alternate marketplace",
            Self::Unclassified => "unclassified",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub category: ChannelCategory,
    pub url: String,
}

/// Channels found for one seller; empty string means not found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerOutcome {
    pub id: i64,
    pub display_name: String,
    pub rank: i64,
    pub native_storefront_url: String,
    pub owned_site_url: String,
    pub fashion_channel_url: String,
    pub alternate_marketplace_url: String,
}

impl SellerOutcome {
    /// Outcome with every channel empty
    #[must_use]
    pub fn empty(record: &SellerRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name.clone(),
            rank: record.rank,
            ..Self::default()
        }
    }

    /// Record a classification unless its category is already filled.
    ///
    /// Returns whether the field was set. Unclassified results and empty
    /// URLs are ignored.
    pub fn record_first_hit(&mut self, result: &ClassificationResult) -> bool {
        if result.url.is_empty() {
            return false;
        }
        let slot = match result.category {
            ChannelCategory::NativeStorefront => &mut self.native_storefront_url,
            ChannelCategory::OwnedSite => &mut self.owned_site_url,
            ChannelCategory::FashionChannel => &mut self.fashion_channel_url,
            ChannelCategory::AlternateMarketplace => &mut self.alternate_marketplace_url,
            ChannelCategory::Unclassified => return false,
        };
        if !slot.is_empty() {
            return false;
        }
        slot.clone_from(&result.url);
        true
    }

    /// URL recorded for a category, empty when none
    #[must_use]
    pub fn url_for(&self, category: ChannelCategory) -> &str {
        match category {
            ChannelCategory::NativeStorefront => &self.native_storefront_url,
            ChannelCategory::OwnedSite => &self.owned_site_url,
            ChannelCategory::FashionChannel => &self.fashion_channel_url,
            ChannelCategory::AlternateMarketplace => &self.alternate_marketplace_url,
            ChannelCategory::Unclassified => "",
        }
    }

    /// Whether any channel was found
    #[must_use]
    pub fn has_any_channel(&self) -> bool {
        !(self.native_storefront_url.is_empty()
            && self.owned_site_url.is_empty()
            && self.fashion_channel_url.is_empty()
            && self.alternate_marketplace_url.is_empty())
    }
}
