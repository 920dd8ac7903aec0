use crate::adapters::html::extract_article;
use crate::config::toml_config::FetcherConfig;
use crate::core::{ContentFetcher, Source, SourceDocument, Storage};
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// Loads article pages over HTTP and text files through [`Storage`].
pub struct SourceFetcher<S: Storage> {
    storage: S,
    client: Client,
}

impl<S: Storage> SourceFetcher<S> {
    pub fn new(storage: S, config: &FetcherConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            storage,
            client: builder.build()?,
        })
    }

    async fn fetch_url(&self, url: &str) -> Result<SourceDocument> {
        tracing::debug!("📡 Downloading article: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AuditError::FetchError {
                location: url.to_string(),
                reason: e.to_string(),
            })?;
        tracing::debug!("📡 Article response status: {}", response.status());

        if !response.status().is_success() {
            return Err(AuditError::FetchError {
                location: url.to_string(),
                reason: format!("HTTP status {}", response.status()),
            });
        }

        let html = response.text().await.map_err(|e| AuditError::DecodeError {
            location: url.to_string(),
            reason: e.to_string(),
        })?;

        let article = extract_article(&html);
        tracing::debug!(
            "Extracted {} characters of article text",
            article.text.chars().count()
        );

        Ok(SourceDocument {
            title: article.title.unwrap_or_else(|| url.to_string()),
            raw_text: article.text,
            origin: Source::Url(url.to_string()),
        })
    }

    async fn fetch_file(&self, path: &Path) -> Result<SourceDocument> {
        let location = path.display().to_string();
        tracing::debug!("📂 Reading text file: {}", location);

        let bytes = self
            .storage
            .read_file(&location)
            .await
            .map_err(|e| AuditError::FetchError {
                location: location.clone(),
                reason: e.to_string(),
            })?;

        let raw_text = String::from_utf8(bytes).map_err(|e| AuditError::DecodeError {
            location: location.clone(),
            reason: e.to_string(),
        })?;

        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(location);

        Ok(SourceDocument {
            title,
            raw_text,
            origin: Source::File(path.to_path_buf()),
        })
    }
}

#[async_trait]
impl<S: Storage> ContentFetcher for SourceFetcher<S> {
    async fn fetch(&self, source: &Source) -> Result<SourceDocument> {
        match source {
            Source::Url(url) => self.fetch_url(url).await,
            Source::File(path) => self.fetch_file(path).await,
        }
    }
}
