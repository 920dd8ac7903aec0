use crate::core::render::FindingRenderer;
use crate::core::{
    AuditDocument, ContentFetcher, DocumentSink, FallacyClassifier, Ledger, NormalizedText,
    Pipeline, Source,
};
use crate::core::normalize::normalize;
use crate::utils::error::Result;

/// Fetch → normalize → classify → render → assemble → publish, for one source.
pub struct AuditPipeline<F: ContentFetcher, C: FallacyClassifier, D: DocumentSink> {
    pub(crate) fetcher: F,
    pub(crate) classifier: C,
    pub(crate) sink: D,
    pub(crate) source: Source,
}

impl<F: ContentFetcher, C: FallacyClassifier, D: DocumentSink> AuditPipeline<F, C, D> {
    pub fn new(fetcher: F, classifier: C, sink: D, source: Source) -> Self {
        Self {
            fetcher,
            classifier,
            sink,
            source,
        }
    }
}

#[async_trait::async_trait]
impl<F: ContentFetcher, C: FallacyClassifier, D: DocumentSink> Pipeline
    for AuditPipeline<F, C, D>
{
    async fn extract(&self) -> Result<AuditDocument> {
        tracing::debug!("Fetching content from: {}", self.source);
        let fetched = self.fetcher.fetch(&self.source).await?;

        let text = NormalizedText::from_raw(&fetched.raw_text);
        let title = normalize(&fetched.title);
        tracing::debug!(
            "Normalized {} raw bytes into {} characters",
            fetched.raw_text.len(),
            text.char_count()
        );

        if text.is_empty() {
            tracing::warn!("⚠️ No text found in {}, the ledger will be empty", self.source);
        }

        Ok(AuditDocument {
            title,
            text,
            origin: fetched.origin,
        })
    }

    async fn transform(&self, document: AuditDocument) -> Result<Ledger> {
        let findings = if document.text.is_empty() {
            Vec::new()
        } else {
            self.classifier.classify(document.text.as_str()).await?
        };
        tracing::debug!("Classifier returned {} findings", findings.len());

        let renderer = FindingRenderer::new(&document.text);
        tracing::debug!("Indexed {} sentences", renderer.sentence_count());

        let items = renderer.render_all(&findings);
        let ledger = Ledger::new(document.title, items);

        let unverified = ledger.unverified_count();
        if unverified > 0 {
            tracing::info!(
                "{} of {} quotes could not be matched to the source and are marked unverified",
                unverified,
                ledger.items.len()
            );
        }

        Ok(ledger)
    }

    async fn load(&self, ledger: Ledger) -> Result<String> {
        let document = ledger.to_html();
        tracing::debug!(
            "Assembled ledger '{}' ({} bytes, {} findings)",
            ledger.title,
            document.len(),
            ledger.items.len()
        );

        self.sink.publish(&ledger.title, &document).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Finding, QuoteOrigin, SourceDocument};
    use crate::utils::error::AuditError;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    struct MockFetcher {
        title: String,
        raw_text: String,
    }

    #[async_trait]
    impl ContentFetcher for MockFetcher {
        async fn fetch(&self, source: &Source) -> Result<SourceDocument> {
            Ok(SourceDocument {
                title: self.title.clone(),
                raw_text: self.raw_text.clone(),
                origin: source.clone(),
            })
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ContentFetcher for FailingFetcher {
        async fn fetch(&self, source: &Source) -> Result<SourceDocument> {
            Err(AuditError::FetchError {
                location: source.to_string(),
                reason: "unreachable".to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct MockClassifier {
        findings: Vec<Finding>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl FallacyClassifier for MockClassifier {
        async fn classify(&self, text: &str) -> Result<Vec<Finding>> {
            self.seen.lock().await.push(text.to_string());
            Ok(self.findings.clone())
        }
    }

    #[derive(Clone, Default)]
    struct MockSink {
        published: Arc<Mutex<Vec<(String, String)>>>,
    }

    #[async_trait]
    impl DocumentSink for MockSink {
        async fn publish(&self, title: &str, document: &str) -> Result<String> {
            self.published
                .lock()
                .await
                .push((title.to_string(), document.to_string()));
            Ok(format!("memory://{}", title))
        }
    }

    fn syllogism_finding() -> Finding {
        Finding {
            quote: "mammals are dogs so bark".to_string(),
            fallacy: "Faulty Generalization".to_string(),
            explanation: "Invalid syllogism.".to_string(),
        }
    }

    fn source() -> Source {
        Source::File(PathBuf::from("essay.txt"))
    }

    #[tokio::test]
    async fn test_extract_normalizes_text_and_title() {
        let fetcher = MockFetcher {
            title: " Don\u{e2}\u{20ac}\u{2122}t panic ".to_string(),
            raw_text: "  It\u{e2}\u{20ac}\u{2122}s fine.  ".to_string(),
        };
        let pipeline = AuditPipeline::new(
            fetcher,
            MockClassifier::default(),
            MockSink::default(),
            source(),
        );

        let document = pipeline.extract().await.unwrap();

        assert_eq!(document.title, "Don't panic");
        assert_eq!(document.text.as_str(), "It's fine.");
        assert_eq!(document.origin, source());
    }

    #[tokio::test]
    async fn test_transform_recovers_literal_quote() {
        let classifier = MockClassifier {
            findings: vec![syllogism_finding()],
            ..Default::default()
        };
        let seen = classifier.seen.clone();
        let pipeline = AuditPipeline::new(
            MockFetcher {
                title: "Syllogisms".to_string(),
                raw_text: "Dogs bark. Cats purr. All mammals are dogs, so all mammals bark."
                    .to_string(),
            },
            classifier,
            MockSink::default(),
            source(),
        );

        let document = pipeline.extract().await.unwrap();
        let ledger = pipeline.transform(document).await.unwrap();

        assert_eq!(seen.lock().await.len(), 1);
        assert_eq!(ledger.title, "Syllogisms");
        assert_eq!(ledger.items.len(), 1);
        assert_eq!(
            ledger.items[0].literal_quote,
            "All mammals are dogs, so all mammals bark."
        );
        assert_eq!(ledger.items[0].quote_origin, QuoteOrigin::Verbatim);
    }

    #[tokio::test]
    async fn test_empty_text_skips_classifier() {
        let classifier = MockClassifier {
            findings: vec![syllogism_finding()],
            ..Default::default()
        };
        let seen = classifier.seen.clone();
        let pipeline = AuditPipeline::new(
            MockFetcher {
                title: "Blank".to_string(),
                raw_text: "   \n ".to_string(),
            },
            classifier,
            MockSink::default(),
            source(),
        );

        let document = pipeline.extract().await.unwrap();
        let ledger = pipeline.transform(document).await.unwrap();

        assert!(seen.lock().await.is_empty());
        assert!(ledger.items.is_empty());
    }

    #[tokio::test]
    async fn test_load_publishes_assembled_document() {
        let sink = MockSink::default();
        let published = sink.published.clone();
        let pipeline = AuditPipeline::new(
            MockFetcher {
                title: "T".to_string(),
                raw_text: "x".to_string(),
            },
            MockClassifier::default(),
            sink,
            source(),
        );

        let location = pipeline.load(Ledger::new("Test", vec![])).await.unwrap();

        assert_eq!(location, "memory://Test");
        let published = published.lock().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "Test");
        assert!(published[0].1.contains("<h1>Logic Audit Ledger: Test</h1>"));
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let pipeline = AuditPipeline::new(
            FailingFetcher,
            MockClassifier::default(),
            MockSink::default(),
            Source::Url("https://unreachable.invalid/".to_string()),
        );

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, AuditError::FetchError { .. }));
    }
}
