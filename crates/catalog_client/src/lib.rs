//! HTTP catalog source: one GET per bucket under a common base URL.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared::{
    domain::{BucketKind, Item},
    error::{FetchError, FetchErrorKind},
};
use store_core::CatalogSource;
use thiserror::Error;
use tracing::debug;
use url::Url;

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum CatalogClientError {
    #[error("invalid catalog base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("catalog base url '{0}' cannot carry a path")]
    OpaqueBaseUrl(String),
    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Bucket payloads are bare arrays; some deployments wrap them in `{"games": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum BucketPayload {
    Items(Vec<Item>),
    Wrapped { games: Vec<Item> },
}

impl BucketPayload {
    fn into_items(self) -> Vec<Item> {
        match self {
            BucketPayload::Items(items) | BucketPayload::Wrapped { games: items } => items,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    http: Client,
    base_url: Url,
}

impl HttpCatalogSource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogClientError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn bucket_url(&self, bucket: BucketKind) -> Result<Url, FetchError> {
        self.base_url
            .join(bucket.as_str())
            .map_err(|err| FetchError::new(FetchErrorKind::Transport, bucket, err.to_string()))
    }

    async fn fetch(&self, bucket: BucketKind) -> Result<Vec<Item>, FetchError> {
        let url = self.bucket_url(bucket)?;
        debug!(%bucket, %url, "fetching catalog bucket");
        let body = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| classify(bucket, err))?
            .error_for_status()
            .map_err(|err| classify(bucket, err))?
            .bytes()
            .await
            .map_err(|err| classify(bucket, err))?;

        let payload: BucketPayload = serde_json::from_slice(&body)
            .map_err(|err| FetchError::new(FetchErrorKind::Decode, bucket, err.to_string()))?;
        let items = payload.into_items();
        debug!(%bucket, count = items.len(), "catalog bucket fetched");
        Ok(items)
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_carousel(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(BucketKind::Carousel).await
    }

    async fn fetch_trending(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(BucketKind::Trending).await
    }

    async fn fetch_upcoming(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(BucketKind::Upcoming).await
    }

    async fn fetch_latest(&self) -> Result<Vec<Item>, FetchError> {
        self.fetch(BucketKind::Latest).await
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, CatalogClientError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash).map_err(|source| CatalogClientError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(CatalogClientError::OpaqueBaseUrl(raw.to_string()));
    }
    Ok(url)
}

fn classify(bucket: BucketKind, err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FetchErrorKind::Timeout
    } else if err.is_status() {
        FetchErrorKind::Status
    } else if err.is_decode() {
        FetchErrorKind::Decode
    } else {
        FetchErrorKind::Transport
    };
    FetchError::new(kind, bucket, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
