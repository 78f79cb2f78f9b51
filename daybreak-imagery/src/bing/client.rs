//! Minimal wrapper around the Bing homepage image archive with Daybreak
//! defaults.
//!
//! Handles request parameter shaping and relative-URL resolution before
//! delegating to the shared HTTP client. Workflow calls never retry; any
//! transport error propagates to the caller with call-site context.
use crate::bing::types::{ArchiveResponse, DailyImage};
use anyhow::{Context, Result};
use daybreak_http::{ByteStream, HttpClient, HttpError, RequestOpts};
use std::time::Duration;

pub const DEFAULT_ARCHIVE_BASE: &str = "https://cn.bing.com";
pub const DEFAULT_MARKET: &str = "zh-CN";

const ARCHIVE_PATH: &str = "HPImageArchive.aspx";

// Image bodies can be large; give downloads more room than the JSON call.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct BingApi {
    http: HttpClient,
    market: String,
}

impl BingApi {
    pub fn new(market: impl Into<String>) -> Self {
        let http = HttpClient::new(DEFAULT_ARCHIVE_BASE).expect("bing base url");
        Self {
            http,
            market: market.into(),
        }
    }

    /// Anchor the client at a different host, e.g. a stub server in tests.
    pub fn with_base(base: &str, market: impl Into<String>) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            market: market.into(),
        })
    }

    /// Fetch the most recent daily image for the configured market.
    ///
    /// Extraction is permissive: a document without a populated `images[0]`
    /// yields empty fields, and the resolved URL decays to the archive host
    /// itself. Malformed JSON is a hard failure.
    pub async fn latest_image(&self) -> Result<DailyImage> {
        let params = vec![
            ("format", "js".into()),
            ("idx", "0".into()),
            ("n", "1".into()),
            ("mkt", self.market.as_str().into()),
        ];

        let doc: ArchiveResponse = self
            .http
            .get_json(
                ARCHIVE_PATH,
                RequestOpts {
                    query: Some(params),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
            .context("image archive request failed")?;

        let first = doc.images.into_iter().next().unwrap_or_default();
        let image_url = self
            .http
            .join(&first.url)
            .context("image archive returned an unresolvable path")?;

        let daily = DailyImage {
            caption: first.copyright,
            image_url: image_url.into(),
        };
        tracing::debug!(caption = %daily.caption, url = %daily.image_url, "bing.latest_image");
        Ok(daily)
    }

    /// Stream the image bytes at `image_url` (absolute, as produced by
    /// [`BingApi::latest_image`]).
    pub async fn fetch_image(&self, image_url: &str) -> Result<ByteStream> {
        self.http
            .get_stream(
                image_url,
                RequestOpts {
                    allow_absolute: true,
                    timeout: Some(DOWNLOAD_TIMEOUT),
                    retries: Some(0),
                    ..Default::default()
                },
            )
            .await
            .context("image download failed")
    }
}
