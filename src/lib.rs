pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, LogFormat};

pub use config::cli::LocalStorage;

pub use adapters::{GeminiClassifier, HtmlLedgerSink, SourceFetcher};
pub use config::AuditConfig;
pub use crate::core::{
    etl::AuditEngine, ledger::assemble, normalize::normalize, pipeline::AuditPipeline,
    recover::recover, render::render, sentences::split_sentences,
};
pub use domain::model::{Finding, Ledger, QuoteOrigin, RenderedFinding, Source};
pub use utils::error::{AuditError, Result};
