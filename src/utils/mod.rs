pub mod constants;
pub mod string_utils;
pub mod url_utils;

pub use constants::*;
pub use string_utils::safe_truncate_chars;
pub use url_utils::{absolutize, clean_url, host_of, is_valid_url, normalize_domain, path_of, site_name};
