use anyhow::Result;
use async_trait::async_trait;
use daybreak_http::Body;

/// Capability surface for posting to a social feed.
///
/// Callers compose against this trait so an alternative backend can stand in
/// during tests without a live network dependency. Every posted caption
/// carries the backend's source-attribution suffix; callers never append it
/// themselves.
#[async_trait]
pub trait ShareClient: Send + Sync {
    /// Post a text-only status.
    async fn share_text(&self, text: &str) -> Result<()>;

    /// Post a status with an attached picture, streaming `image` into the
    /// upload without buffering it.
    async fn share_picture(&self, text: &str, image: Body) -> Result<()>;
}
