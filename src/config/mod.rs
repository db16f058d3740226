//! Configuration module for seller channel discovery
//!
//! This module provides the `FinderConfig` struct and its type-safe builder,
//! with defaults matching Naver Shopping.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{FinderConfigBuilder, WithSearchBase};
pub use types::{FinderConfig, SelectorSet};
