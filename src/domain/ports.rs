use crate::domain::model::{AuditDocument, Finding, Ledger, Source, SourceDocument};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn open_viewer(&self) -> bool;
    fn viewer_command(&self) -> Option<&str>;
}

/// URL or file → title + raw text. Failures are fatal for the run.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn fetch(&self, source: &Source) -> Result<SourceDocument>;
}

/// Raw text → findings. Unparseable responses come back as an empty list.
#[async_trait]
pub trait FallacyClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<Finding>>;
}

/// Writes the assembled document and returns where it went.
#[async_trait]
pub trait DocumentSink: Send + Sync {
    async fn publish(&self, title: &str, document: &str) -> Result<String>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<AuditDocument>;
    async fn transform(&self, document: AuditDocument) -> Result<Ledger>;
    async fn load(&self, ledger: Ledger) -> Result<String>;
}
