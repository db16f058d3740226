//! URL and domain normalization utilities.
//!
//! Two distinct canonical forms are used by the pipeline:
//! - [`normalize_domain`] reduces a URL or bare domain to its alphanumeric
//!   site name, dropping scheme, `www.`, known TLD suffixes and the path.
//!   Classification and owned-domain matching compare these.
//! - [`clean_url`] only strips scheme, `www.` and trailing slashes, keeping
//!   the path. Redirect completion is detected by comparing these.

use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use super::constants::KNOWN_TLD_SUFFIXES;

static SCHEME_ANYWHERE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://").expect("static regex"));

static WWW_ANYWHERE: Lazy<Regex> = Lazy::new(|| Regex::new(r"www\.").expect("static regex"));

static TLD_AND_REST: Lazy<Regex> = Lazy::new(|| {
    let alternation = KNOWN_TLD_SUFFIXES
        .iter()
        .map(|suffix| regex::escape(suffix))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\.({alternation}).*$")).expect("static regex")
});

static NON_ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]").expect("static regex"));

static LEADING_SCHEME_AND_WWW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(https?://)?(www\.)?").expect("static regex"));

/// Reduce a URL or domain to a comparable site name.
///
/// `normalize_domain("https://www.Example.co.kr/shop") == "example"`.
///
/// Pure and idempotent: the output only contains `[a-z0-9]`, which none of
/// the stripping rules touch. Empty input yields an empty string.
#[must_use]
pub fn normalize_domain(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let lowered = input.to_lowercase();
    let without_scheme = SCHEME_ANYWHERE.replace_all(&lowered, "");
    let without_www = WWW_ANYWHERE.replace_all(&without_scheme, "");
    let without_tld = TLD_AND_REST.replace(&without_www, "");
    NON_ALPHANUMERIC.replace_all(&without_tld, "").into_owned()
}

/// Lighter normalization for whole-URL equality checks.
///
/// Lowercases, strips a leading scheme and `www.`, and trailing slashes.
/// The path and query are kept.
#[must_use]
pub fn clean_url(url: &str) -> String {
    let lowered = url.trim().to_lowercase();
    LEADING_SCHEME_AND_WWW
        .replace(&lowered, "")
        .trim_end_matches('/')
        .to_string()
}

/// Parse a possibly scheme-less URL.
fn parse_lenient(url: &str) -> Option<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return None;
    }
    Url::parse(trimmed)
        .ok()
        .filter(|parsed| parsed.has_host())
        .or_else(|| Url::parse(&format!("https://{trimmed}")).ok())
        .filter(|parsed| parsed.has_host())
}

/// Lowercase host of a URL, accepting inputs without a scheme.
#[must_use]
pub fn host_of(url: &str) -> Option<String> {
    parse_lenient(url).and_then(|parsed| parsed.host_str().map(str::to_lowercase))
}

/// Site name of a URL's host, as [`normalize_domain`] would give for the
/// bare domain. Path and query never take part; input without a parsable
/// host is normalized as is.
#[must_use]
pub fn site_name(url: &str) -> String {
    match host_of(url) {
        Some(host) => normalize_domain(&host),
        None => normalize_domain(url),
    }
}

/// Lowercase path of a URL, accepting inputs without a scheme.
#[must_use]
pub fn path_of(url: &str) -> Option<String> {
    parse_lenient(url).map(|parsed| parsed.path().to_lowercase())
}

/// Resolve `href` against the page it was found on.
///
/// Absolute links come back unchanged; relative ones are joined onto `base`.
/// Returns `None` when neither form yields a valid URL.
#[must_use]
pub fn absolutize(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    if let Ok(absolute) = Url::parse(href) {
        return Some(absolute.to_string());
    }
    Url::parse(base)
        .ok()
        .and_then(|base| base.join(href).ok())
        .map(|joined| joined.to_string())
}

/// Check if a URL is an http(s) link worth following
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}
