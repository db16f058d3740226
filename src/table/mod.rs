//! Seller input and result tables (CSV)

pub mod reader;
pub mod writer;

pub use reader::{REQUIRED_COLUMNS, read_sellers, read_sellers_from};
pub use writer::{RECORD_COLUMNS, write_outcomes, write_outcomes_to};
