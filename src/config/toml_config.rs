use crate::core::ConfigProvider;
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

/// 依序查找的 API key 環境變數，先找到的優先
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "GOOGLE_API_KEY"];

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_MAX_INPUT_CHARS: usize = 20_000;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub classifier: ClassifierConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_input_chars: usize,
    pub thinking_level: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: u32,
    pub retry_delay_seconds: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            thinking_level: Some("high".to_string()),
            timeout_seconds: Some(300),
            retry_attempts: 0,
            retry_delay_seconds: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub timeout_seconds: Option<u64>,
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: Some(30),
            user_agent: concat!("logic-ledger/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub open_viewer: bool,
    /// 覆寫預設的開啟程式 (open / xdg-open / start)
    pub viewer_command: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: ".".to_string(),
            open_viewer: true,
            viewer_command: None,
        }
    }
}

impl AuditConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AuditError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AuditError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("classifier.endpoint", &self.classifier.endpoint)?;
        validation::validate_non_empty_string("classifier.model", &self.classifier.model)?;
        validation::validate_positive_number(
            "classifier.max_input_chars",
            self.classifier.max_input_chars,
            1,
        )?;
        validation::validate_range("classifier.retry_attempts", self.classifier.retry_attempts, 0, 10)?;

        if let Some(level) = &self.classifier.thinking_level {
            let valid_levels = ["low", "medium", "high"];
            if !valid_levels.contains(&level.as_str()) {
                return Err(AuditError::InvalidConfigValueError {
                    field: "classifier.thinking_level".to_string(),
                    value: level.clone(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_non_empty_string("fetcher.user_agent", &self.fetcher.user_agent)?;

        Ok(())
    }
}

impl ClassifierConfig {
    /// 設定檔中的 key 優先，其次是環境變數
    pub fn resolve_api_key(&self) -> Result<String> {
        let configured = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !ENV_VAR_RE.is_match(key));

        configured
            .map(str::to_string)
            .or_else(|| api_key_from(|name| std::env::var(name).ok()))
            .ok_or_else(|| AuditError::MissingConfigError {
                field: "api_key".to_string(),
            })
    }
}

/// First non-empty value among [`API_KEY_ENV_VARS`].
pub fn api_key_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.trim().is_empty())
}

/// 替換環境變數 (例如 ${GEMINI_API_KEY})，找不到的保留原樣
fn substitute_env_vars(content: &str) -> String {
    ENV_VAR_RE
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}

impl ConfigProvider for AuditConfig {
    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn open_viewer(&self) -> bool {
        self.output.open_viewer
    }

    fn viewer_command(&self) -> Option<&str> {
        self.output.viewer_command.as_deref()
    }
}

impl Validate for AuditConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let config = AuditConfig::from_toml_str("").unwrap();

        assert_eq!(config.classifier.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.classifier.model, DEFAULT_MODEL);
        assert_eq!(config.classifier.max_input_chars, 20_000);
        assert_eq!(config.classifier.thinking_level.as_deref(), Some("high"));
        assert_eq!(config.output.output_path, ".");
        assert!(config.open_viewer());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[classifier]
model = "gemini-2.5-flash"
retry_attempts = 3
timeout_seconds = 60

[output]
output_path = "./ledgers"
open_viewer = false
"#;

        let config = AuditConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.classifier.model, "gemini-2.5-flash");
        assert_eq!(config.classifier.retry_attempts, 3);
        assert_eq!(config.classifier.timeout_seconds, Some(60));
        assert_eq!(config.classifier.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.output_path(), "./ledgers");
        assert!(!config.open_viewer());
        assert_eq!(config.fetcher.timeout_seconds, Some(30));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LOGIC_LEDGER_TEST_ENDPOINT", "https://llm.internal.example");

        let toml_content = r#"
[classifier]
endpoint = "${LOGIC_LEDGER_TEST_ENDPOINT}"
api_key = "${LOGIC_LEDGER_TEST_UNSET_KEY}"
"#;

        let config = AuditConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.classifier.endpoint, "https://llm.internal.example");
        assert_eq!(
            config.classifier.api_key.as_deref(),
            Some("${LOGIC_LEDGER_TEST_UNSET_KEY}")
        );

        std::env::remove_var("LOGIC_LEDGER_TEST_ENDPOINT");
    }

    #[test]
    fn test_configured_api_key_wins() {
        let config = ClassifierConfig {
            api_key: Some(" from-config ".to_string()),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key().unwrap(), "from-config");
    }

    #[test]
    fn test_api_key_lookup_order() {
        let both = |name: &str| match name {
            "GEMINI_API_KEY" => Some("gemini".to_string()),
            "GOOGLE_API_KEY" => Some("google".to_string()),
            _ => None,
        };
        assert_eq!(api_key_from(both).as_deref(), Some("gemini"));

        let google_only = |name: &str| match name {
            "GEMINI_API_KEY" => Some(String::new()),
            "GOOGLE_API_KEY" => Some("google".to_string()),
            _ => None,
        };
        assert_eq!(api_key_from(google_only).as_deref(), Some("google"));

        assert_eq!(api_key_from(|_| None), None);
    }

    #[test]
    fn test_config_validation() {
        let config = AuditConfig::from_toml_str(
            r#"
[classifier]
endpoint = "not-a-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AuditConfig::from_toml_str(
            r#"
[classifier]
thinking_level = "extreme"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.validate(),
            Err(AuditError::InvalidConfigValueError { ref field, .. }) if field == "classifier.thinking_level"
        ));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = AuditConfig::from_toml_str("[classifier\nmodel = 1").unwrap_err();
        assert!(matches!(err, AuditError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\noutput_path = \"./from-file\"\n")
            .unwrap();

        let config = AuditConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.output_path, "./from-file");
    }
}
