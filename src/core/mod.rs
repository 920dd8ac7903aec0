pub mod etl;
pub mod ledger;
pub mod normalize;
pub mod pipeline;
pub mod recover;
pub mod render;
pub mod sentences;
pub mod similarity;

pub use crate::domain::model::{
    AuditDocument, Finding, Ledger, NormalizedText, QuoteOrigin, RenderedFinding, Source,
    SourceDocument,
};
pub use crate::domain::ports::{
    ConfigProvider, ContentFetcher, DocumentSink, FallacyClassifier, Pipeline, Storage,
};
pub use crate::utils::error::Result;
