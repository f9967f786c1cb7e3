//! Remote post catalog adapter over the headless content store.
//!
//! The boundary is the `RemoteCatalog` trait; production uses the reqwest
//! adapter, tests inject in-memory fakes, and deployments without a content
//! store run the disabled adapter (always empty, never fails).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::posts::{Post, PostContent, SeoOverrides};
use crate::domain::rich_text::{self, RichTextBlock};

const EXCERPT_FALLBACK_CHARS: usize = 160;

#[derive(Debug, Error)]
pub enum RemoteCatalogError {
    #[error("remote catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("remote catalog returned status {status}")]
    Status { status: u16 },
    #[error("remote catalog payload invalid: {0}")]
    Payload(#[from] serde_json::Error),
}

#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    async fn fetch_posts(&self) -> Result<Vec<Post>, RemoteCatalogError>;
}

/// Wire shape of one post as delivered by the content store.
#[derive(Debug, Deserialize)]
pub struct RemotePostPayload {
    pub id: u32,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub date: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub detail_image: Option<String>,
    pub content: Vec<RichTextBlock>,
    #[serde(default)]
    pub seo: Option<SeoOverrides>,
}

impl RemotePostPayload {
    pub fn into_post(self) -> Post {
        let excerpt = self
            .excerpt
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| excerpt_from_blocks(&self.content));
        let image = self.image.unwrap_or_default();
        let detail_image = self.detail_image.unwrap_or_else(|| image.clone());

        Post {
            id: self.id,
            slug: self.slug,
            title: self.title,
            excerpt,
            date: self.date,
            category: self.category.unwrap_or_else(|| "Insights".to_string()),
            image,
            detail_image,
            content: PostContent::RichText(self.content),
            seo: self.seo,
        }
    }
}

/// First words of the body, cut at a word boundary.
fn excerpt_from_blocks(blocks: &[RichTextBlock]) -> String {
    let text = rich_text::collect_text(blocks);
    if text.len() <= EXCERPT_FALLBACK_CHARS {
        return text;
    }

    let mut excerpt = String::with_capacity(EXCERPT_FALLBACK_CHARS + 1);
    for word in text.split_whitespace() {
        if excerpt.len() + word.len() + 1 > EXCERPT_FALLBACK_CHARS {
            break;
        }
        if !excerpt.is_empty() {
            excerpt.push(' ');
        }
        excerpt.push_str(word);
    }
    excerpt.push('\u{2026}');
    excerpt
}

/// Production adapter: one GET against the configured JSON endpoint with a
/// request timeout; no retries.
pub struct HttpRemoteCatalog {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpRemoteCatalog {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, RemoteCatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl RemoteCatalog for HttpRemoteCatalog {
    async fn fetch_posts(&self) -> Result<Vec<Post>, RemoteCatalogError> {
        let response = self.client.get(self.endpoint.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteCatalogError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let payloads: Vec<RemotePostPayload> = serde_json::from_str(&body)?;
        Ok(payloads
            .into_iter()
            .map(RemotePostPayload::into_post)
            .collect())
    }
}

/// Adapter for deployments without a content store: the remote catalog is
/// simply empty.
pub struct DisabledRemoteCatalog;

#[async_trait]
impl RemoteCatalog for DisabledRemoteCatalog {
    async fn fetch_posts(&self) -> Result<Vec<Post>, RemoteCatalogError> {
        Ok(Vec::new())
    }
}
