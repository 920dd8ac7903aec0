use crate::config::toml_config::ClassifierConfig;
use crate::core::{FallacyClassifier, Finding};
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Fallacy classifier backed by the Gemini `generateContent` REST API.
pub struct GeminiClassifier {
    client: Client,
    config: ClassifierConfig,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_level: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

impl GenerateContentResponse {
    fn text(&self) -> String {
        self.candidates
            .iter()
            .filter_map(|candidate| candidate.content.as_ref())
            .flat_map(|content| content.parts.iter())
            .filter_map(|part| part.text.as_deref())
            .collect()
    }
}

impl GeminiClassifier {
    pub fn new(config: &ClassifierConfig, api_key: String) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(timeout));
        }

        Ok(Self {
            client: builder.build()?,
            config: config.clone(),
            api_key,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, text: &str) -> GenerateContentRequest {
        let excerpt = truncate_chars(text, self.config.max_input_chars);

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(audit_prompt(excerpt)),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                thinking_config: self.config.thinking_level.clone().map(|thinking_level| {
                    ThinkingConfig { thinking_level }
                }),
            },
        }
    }

    /// POST with retries on transport errors, 429 and 5xx. Returns the raw body.
    async fn send_with_retry(&self, request: &GenerateContentRequest) -> Result<String> {
        let url = self.request_url();
        let max_attempts = self.config.retry_attempts + 1;
        let mut attempt = 0;

        loop {
            attempt += 1;
            tracing::debug!("📡 Classifier request {}/{} to {}", attempt, max_attempts, url);

            let failure = match self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(request)
                .send()
                .await
            {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text().await?);
                }
                Ok(response) => {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    let message = format!("HTTP status {}: {}", status, truncate_chars(&body, 200));
                    if !is_retryable(status) {
                        return Err(AuditError::ClassifierError { message });
                    }
                    message
                }
                Err(e) => e.to_string(),
            };

            if attempt >= max_attempts {
                return Err(AuditError::ClassifierError { message: failure });
            }

            tracing::warn!(
                "⚠️ Classifier attempt {}/{} failed: {}; retrying in {}s",
                attempt,
                max_attempts,
                failure,
                self.config.retry_delay_seconds
            );
            tokio::time::sleep(Duration::from_secs(self.config.retry_delay_seconds)).await;
        }
    }
}

#[async_trait]
impl FallacyClassifier for GeminiClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<Finding>> {
        let request = self.build_request(text);
        let body = self.send_with_retry(&request).await?;

        let envelope: GenerateContentResponse = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("⚠️ Unreadable classifier response ({}), no findings recorded", e);
                return Ok(Vec::new());
            }
        };

        Ok(extract_findings(&envelope.text()))
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn audit_prompt(text: &str) -> String {
    format!(
        r#"Act as a formal Logic Auditor. Analyze for logical fallacies.
Output ONLY JSON:
{{ "findings": [ {{ "quote": "literal sentence", "fallacy": "Name", "explanation": "Note" }} ] }}
Text: {}"#,
        text
    )
}

/// At most `max` characters (not bytes) from the start of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Findings from a model reply that may wrap the JSON in commentary or code fences.
///
/// Anything unparseable yields an empty list; individual findings missing a
/// string `quote`, `fallacy` or `explanation` are skipped.
pub fn extract_findings(response_text: &str) -> Vec<Finding> {
    let Some(object) = first_json_object(response_text) else {
        tracing::warn!("⚠️ No JSON object in classifier response, no findings recorded");
        return Vec::new();
    };

    let Some(items) = object.get("findings").and_then(Value::as_array) else {
        tracing::warn!("⚠️ Classifier response has no 'findings' array, no findings recorded");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match parse_finding(item) {
            Ok(finding) => Some(finding),
            Err(e) => {
                tracing::warn!("⚠️ Skipping finding #{}: {}", index, e);
                None
            }
        })
        .collect()
}

fn parse_finding(item: &Value) -> Result<Finding> {
    serde_json::from_value(item.clone()).map_err(|e| AuditError::MalformedFinding {
        message: e.to_string(),
    })
}

fn first_json_object(text: &str) -> Option<Value> {
    text.match_indices('{').find_map(|(idx, _)| {
        let mut deserializer = serde_json::Deserializer::from_str(&text[idx..]);
        match Value::deserialize(&mut deserializer) {
            Ok(value @ Value::Object(_)) => Some(value),
            _ => None,
        }
    })
}
