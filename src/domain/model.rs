use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// 使用者選擇的稽核來源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{}", url),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Content fetcher 的輸出，尚未正規化
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub title: String,
    pub raw_text: String,
    pub origin: Source,
}

/// Text that went through `core::normalize`. The only constructor is
/// [`NormalizedText::from_raw`], so holding one means the repair table and NFKC
/// have been applied and the ends are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn from_raw(raw: &str) -> Self {
        Self(crate::core::normalize::normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 正規化後的文件，transform 階段的輸入
#[derive(Debug, Clone)]
pub struct AuditDocument {
    pub title: String,
    pub text: NormalizedText,
    pub origin: Source,
}

/// One flagged passage as returned by the classifier. `quote` may be a paraphrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub quote: String,
    pub fallacy: String,
    pub explanation: String,
}

/// Whether the displayed quote was found verbatim in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteOrigin {
    Verbatim,
    Paraphrase,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedFinding {
    pub fallacy: String,
    pub literal_quote: String,
    pub clean_explanation: String,
    pub quote_origin: QuoteOrigin,
}

impl RenderedFinding {
    pub fn is_verified(&self) -> bool {
        self.quote_origin == QuoteOrigin::Verbatim
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    pub title: String,
    pub items: Vec<RenderedFinding>,
}

impl Ledger {
    pub fn new(title: impl Into<String>, items: Vec<RenderedFinding>) -> Self {
        Self {
            title: title.into(),
            items,
        }
    }

    pub fn unverified_count(&self) -> usize {
        self.items.iter().filter(|item| !item.is_verified()).count()
    }

    /// 組成 HTML 文件
    pub fn to_html(&self) -> String {
        crate::core::ledger::assemble(&self.title, &self.items)
    }
}
