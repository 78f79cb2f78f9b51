//! Clients for daily-featured-image services used by Daybreak.
//!
//! Currently only the Bing homepage archive is implemented. Its submodule
//! provides the HTTP client wrapper and loosely typed response models.
pub mod bing;
