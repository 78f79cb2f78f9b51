//! Minimal wrapper around the Weibo statuses API with Daybreak defaults.
//!
//! Handles auth and caption shaping before delegating to the shared HTTP
//! client. Share calls are single-shot: a failed upload surfaces the
//! platform's response body verbatim instead of retrying.
use crate::share::ShareClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use daybreak_http::{Auth, Body, Form, HttpClient, HttpError, Part, RequestOpts};
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.weibo.com";

const SHARE_PATH: &str = "2/statuses/share.json";
const STATUS_FIELD: &str = "status";
const PIC_FIELD: &str = "pic";

// Streamed uploads can be large; give them more room than a text post.
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(120);

pub struct WeiboApi {
    http: HttpClient,
    access_token: String,
    source: String,
}

impl WeiboApi {
    /// `source` is the application attribution the platform requires on every
    /// post; it is appended to each caption with no delimiter.
    pub fn new(access_token: impl Into<String>, source: impl Into<String>) -> Self {
        let http = HttpClient::new(DEFAULT_API_BASE).expect("weibo base url");
        Self {
            http,
            access_token: access_token.into(),
            source: source.into(),
        }
    }

    /// Anchor the client at a different host, e.g. a stub server in tests.
    pub fn with_base(
        base: &str,
        access_token: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, HttpError> {
        Ok(Self {
            http: HttpClient::new(base)?,
            access_token: access_token.into(),
            source: source.into(),
        })
    }

    fn composed_status(&self, text: &str) -> String {
        format!("{text}{}", self.source)
    }

    fn auth(&self) -> Auth<'_> {
        Auth::OAuth2(&self.access_token)
    }
}

#[async_trait]
impl ShareClient for WeiboApi {
    async fn share_text(&self, text: &str) -> Result<()> {
        let status = self.composed_status(text);
        self.http
            .post_form(
                SHARE_PATH,
                &[(STATUS_FIELD, status.as_str())],
                RequestOpts {
                    auth: Some(self.auth()),
                    ..Default::default()
                },
            )
            .await
            .context("share text request failed")?;
        tracing::info!(chars = status.chars().count(), "weibo.share_text.success");
        Ok(())
    }

    async fn share_picture(&self, text: &str, image: Body) -> Result<()> {
        let status = self.composed_status(text);
        let form = Form::new()
            .text(STATUS_FIELD, status.clone())
            .part(PIC_FIELD, Part::stream(image).file_name(PIC_FIELD));

        self.http
            .post_multipart(
                SHARE_PATH,
                form,
                RequestOpts {
                    auth: Some(self.auth()),
                    timeout: Some(UPLOAD_TIMEOUT),
                    ..Default::default()
                },
            )
            .await
            .context("share picture request failed")?;
        tracing::info!(chars = status.chars().count(), "weibo.share_picture.success");
        Ok(())
    }
}
