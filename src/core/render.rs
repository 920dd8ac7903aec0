use crate::core::normalize::normalize;
use crate::core::recover::{recover_match, Recovery};
use crate::core::sentences::SentenceIndex;
use crate::domain::model::{Finding, NormalizedText, QuoteOrigin, RenderedFinding};

/// Renders every finding of one document against the same sentence index.
#[derive(Debug, Clone)]
pub struct FindingRenderer {
    index: SentenceIndex,
}

impl FindingRenderer {
    pub fn new(source: &NormalizedText) -> Self {
        Self {
            index: SentenceIndex::build(source),
        }
    }

    pub fn sentence_count(&self) -> usize {
        self.index.len()
    }

    pub fn render(&self, finding: &Finding) -> RenderedFinding {
        let (quote, quote_origin) = match recover_match(&finding.quote, self.index.sentences()) {
            Recovery::Matched {
                index,
                ratio,
                sentence,
            } => {
                tracing::debug!(
                    "🔎 Quote for '{}' matched sentence #{} (ratio {:.3})",
                    finding.fallacy,
                    index,
                    ratio
                );
                (sentence, QuoteOrigin::Verbatim)
            }
            Recovery::Miss { best_ratio } => {
                tracing::debug!(
                    "🔎 No source sentence close enough for '{}' (best ratio {:?}), keeping paraphrase",
                    finding.fallacy,
                    best_ratio
                );
                (finding.quote.as_str(), QuoteOrigin::Paraphrase)
            }
        };

        // classifier 的輸出本身也可能帶亂碼，再正規化一次
        RenderedFinding {
            fallacy: finding.fallacy.clone(),
            literal_quote: normalize(quote),
            clean_explanation: normalize(&finding.explanation),
            quote_origin,
        }
    }

    pub fn render_all(&self, findings: &[Finding]) -> Vec<RenderedFinding> {
        findings.iter().map(|finding| self.render(finding)).collect()
    }
}

/// Render a single finding against the whole normalized source text.
pub fn render(finding: &Finding, normalized_source: &NormalizedText) -> RenderedFinding {
    FindingRenderer::new(normalized_source).render(finding)
}
