//! Social network share clients used by Daybreak.
//!
//! The [`ShareClient`] trait is the capability surface the orchestrator
//! composes against; the `weibo` submodule is the only backend currently
//! implemented.
pub mod share;
pub mod weibo;

pub use share::ShareClient;
pub use weibo::WeiboApi;
