// Adapters layer: concrete implementations of the domain ports (http, files, viewer).

pub mod classifier;
pub mod fetcher;
pub mod html;
pub mod sink;

pub use classifier::GeminiClassifier;
pub use fetcher::SourceFetcher;
pub use sink::HtmlLedgerSink;
