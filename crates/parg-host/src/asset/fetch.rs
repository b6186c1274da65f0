use std::path::PathBuf;

use crate::error::HostError;

use super::pixels::decode_image;
use super::{AssetKind, AssetRequest};

/// Where asset bytes come from.
///
/// The location of an asset is always `base + identifier`; no path joining or
/// URL resolution is applied, so a base usually ends with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetSource {
    /// `http://` or `https://` prefix.
    Http { base: String },
    /// Local directory prefix, used when assets ship next to the executable.
    Directory { base: String },
}

impl AssetSource {
    /// Classifies a base string by its scheme.
    pub fn from_base(base: impl Into<String>) -> Self {
        let base = base.into();
        if base.starts_with("http://") || base.starts_with("https://") {
            AssetSource::Http { base }
        } else {
            AssetSource::Directory { base }
        }
    }

    pub fn location(&self, request: &AssetRequest) -> String {
        match self {
            AssetSource::Http { base } | AssetSource::Directory { base } => {
                format!("{base}{}", request.id)
            }
        }
    }
}

/// Performs one asynchronous fetch per asset.
///
/// Cheap to clone; clones share the HTTP connection pool.
#[derive(Debug, Clone)]
pub struct AssetFetcher {
    source: AssetSource,
    client: reqwest::Client,
}

impl AssetFetcher {
    pub fn new(source: AssetSource) -> Self {
        Self {
            source,
            client: reqwest::Client::new(),
        }
    }

    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    /// Fetches the request's bytes and prepares them for transfer.
    ///
    /// Binary assets come back untouched. Image assets come back as an
    /// annotated pixel buffer. Failures are logged with the failing location.
    pub async fn fetch(&self, request: &AssetRequest) -> Result<Vec<u8>, HostError> {
        let result = self.fetch_prepared(request).await;
        if let Err(e) = &result {
            log::error!("{e}");
        }
        result
    }

    async fn fetch_prepared(&self, request: &AssetRequest) -> Result<Vec<u8>, HostError> {
        let bytes = self.fetch_bytes(request).await?;

        match request.kind {
            AssetKind::Binary => Ok(bytes),
            AssetKind::Image => {
                let id = request.id.clone();
                let decoded = tokio::task::spawn_blocking(move || decode_image(&id, &bytes))
                    .await
                    .map_err(|e| HostError::Decode {
                        id: request.id.clone(),
                        reason: e.to_string(),
                    })??;
                Ok(decoded.into_bytes())
            }
        }
    }

    async fn fetch_bytes(&self, request: &AssetRequest) -> Result<Vec<u8>, HostError> {
        let url = self.source.location(request);
        log::debug!("fetching {url}");

        let bytes = match &self.source {
            AssetSource::Http { .. } => self.http_get(&url).await?,
            AssetSource::Directory { .. } => tokio::fs::read(PathBuf::from(&url))
                .await
                .map_err(|e| transport(&url, e))?,
        };

        if bytes.is_empty() {
            return Err(transport(&url, "empty response"));
        }
        Ok(bytes)
    }

    async fn http_get(&self, url: &str) -> Result<Vec<u8>, HostError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| transport(url, e))?;

        let body = response.bytes().await.map_err(|e| transport(url, e))?;
        Ok(body.to_vec())
    }
}

fn transport(url: &str, reason: impl ToString) -> HostError {
    HostError::Transport {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}
