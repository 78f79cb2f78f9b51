//! Single-pass publish pipeline: fetch the daily image metadata, stream the
//! image bytes, and repost them with their caption.
//!
//! The image body flows straight from the download response into the upload
//! request, so memory stays bounded regardless of image size. The first error
//! propagates; there is no partial-failure recovery and no fallback to a
//! text-only share.
use anyhow::Result;
use daybreak_imagery::bing::BingApi;
use daybreak_social::ShareClient;

pub async fn publish_daily_image(images: &BingApi, share: &dyn ShareClient) -> Result<()> {
    let daily = images.latest_image().await?;
    tracing::info!(caption = %daily.caption, url = %daily.image_url, "fetched daily image");

    let stream = images.fetch_image(&daily.image_url).await?;
    if let Some(len) = stream.content_length() {
        tracing::debug!(bytes = len, "streaming image into share upload");
    }

    share.share_picture(&daily.caption, stream.into_body()).await?;
    Ok(())
}
