//! Weibo statuses API integration.
//!
//! A single static access token is supplied at construction and used for the
//! process lifetime; there is no refresh. The platform's API terms require a
//! source attribution on every post, which the client appends to the caption.
pub mod client;

pub use client::WeiboApi;
