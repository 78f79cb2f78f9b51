//! Bing homepage image archive integration.
//!
//! Submodules provide the HTTP client wrapper and the response models. The
//! archive document is extracted permissively: absent fields decay to empty
//! strings instead of failing the run.
pub mod client;
pub mod types;

pub use client::{BingApi, DEFAULT_ARCHIVE_BASE, DEFAULT_MARKET};
pub use types::DailyImage;
