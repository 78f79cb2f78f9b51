//! Common types and utilities shared across the Daybreak crates.
//!
//! This crate defines the shared error type and the observability helpers
//! used by the binary and by integration tests. It is intentionally
//! lightweight so that all crates can depend on it without introducing heavy
//! transitive costs.
//!
//! # Overview
//!
//! - [`DaybreakError`] and [`Result`]: shared error handling
//! - [`observability`]: centralised tracing/logging initialisation

pub mod observability;

/// Error types raised outside the HTTP transport.
///
/// Transport-level failures live in `daybreak-http`; this enum covers the
/// process-level conditions the binary itself produces.
#[derive(thiserror::Error, Debug)]
pub enum DaybreakError {
    /// A required startup parameter was missing or unusable. Raised before
    /// any network activity.
    #[error("configuration error: {0}")]
    Config(String),

    /// The run was interrupted before the pipeline finished.
    #[error("canceled before completion")]
    Canceled,
}

/// Convenient alias for results that use [`DaybreakError`].
pub type Result<T> = std::result::Result<T, DaybreakError>;
