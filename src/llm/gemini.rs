//! Google Generative Language API client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::TextGenerator;
use crate::config::LlmConfig;
use crate::{Result, TravelPlanError};

/// Models tried in order when the configured one is not offered
pub const MODEL_CANDIDATES: [&str; 4] = [
    "gemini-2.5-flash",
    "gemini-2.0-flash",
    "gemini-1.5-flash",
    "gemini-pro",
];

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for the `generateContent` endpoint
#[derive(Debug)]
pub struct GeminiClient {
    client: Client,
    config: LlmConfig,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelInfo {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate, parts joined by newlines and trimmed
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default()
            .trim()
            .to_string()
    }

    fn empty_reason(&self) -> String {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return format!("prompt blocked ({reason})");
        }
        match self.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            Some(reason) => format!("model returned no text (finish reason {reason})"),
            None => "model returned no text".to_string(),
        }
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| body.trim().to_string())
}

/// Ranking used when listing models; lower is preferred
#[must_use]
pub fn model_priority(name: &str) -> u32 {
    let name = name.to_lowercase();
    if name.contains("embedding") || name.contains("aqa") {
        999
    } else if name.contains("2.5") && name.contains("flash") {
        0
    } else if name.contains("2.0") && name.contains("flash") {
        1
    } else if name.contains("1.5") && name.contains("flash") {
        2
    } else if name.contains("2.5") && name.contains("pro") {
        3
    } else if name.contains("1.5") && name.contains("pro") {
        4
    } else if name.contains("gemini") {
        5
    } else {
        999
    }
}

/// Pick a model from `available`: the configured one if offered, then the
/// first offered candidate, then whatever ranks best
#[must_use]
pub fn choose_model(configured: &str, available: &[String]) -> Option<String> {
    if available.iter().any(|m| m == configured) {
        return Some(configured.to_string());
    }
    MODEL_CANDIDATES
        .iter()
        .find(|candidate| available.iter().any(|m| m == *candidate))
        .map(|candidate| (*candidate).to_string())
        .or_else(|| available.first().cloned())
}

impl GeminiClient {
    /// Create a client for the configured model. Fails if no API key is set.
    pub fn new(config: LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TravelPlanError::config("Model API key is missing"))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("TravelPlan/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TravelPlanError::config(format!("Failed to create HTTP client: {e}")))?;

        let model = config.model.trim().to_string();
        Ok(Self {
            client,
            config,
            api_key,
            model,
        })
    }

    /// Use a different model for all subsequent requests
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn request_error(&self, error: reqwest::Error) -> TravelPlanError {
        if error.is_timeout() {
            TravelPlanError::model_unavailable(format!(
                "request timed out after {}s",
                self.config.timeout_seconds
            ))
        } else {
            TravelPlanError::model_unavailable(format!("network error ({})", error.without_url()))
        }
    }

    /// Models that support `generateContent`, best first
    #[instrument(skip(self))]
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models?pageSize=1000", self.base_url());
        let response = self
            .client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TravelPlanError::model_status(
                status.as_u16(),
                error_message(&body),
            ));
        }

        let list: ModelList = response.json().await.map_err(|e| {
            TravelPlanError::model_unavailable(format!(
                "invalid model list received ({})",
                e.without_url()
            ))
        })?;

        let mut models: Vec<String> = list
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|m| m.name.trim_start_matches("models/").to_string())
            .collect();
        models.sort_by(|a, b| model_priority(a).cmp(&model_priority(b)).then_with(|| a.cmp(b)));
        models.dedup();

        debug!("Found {} generateContent models", models.len());
        Ok(models)
    }

    /// Resolve the model to use with this API key
    pub async fn select_model(&self) -> Result<String> {
        let available = self.list_models().await?;
        let selected = choose_model(&self.model, &available).ok_or_else(|| {
            TravelPlanError::config("No generateContent models are available for this API key")
        })?;

        if selected == self.model {
            info!("Using configured model {}", selected);
        } else {
            warn!(
                "Configured model {} is not available, using {}",
                self.model, selected
            );
        }
        Ok(selected)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url(), self.model);
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        };

        let start_time = Instant::now();
        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            warn!(status = %status, message = %message, "Model request failed");
            return Err(TravelPlanError::model_status(status.as_u16(), message));
        }

        let payload: GenerateResponse = response.json().await.map_err(|e| {
            TravelPlanError::model_unavailable(format!(
                "invalid JSON received from model API ({})",
                e.without_url()
            ))
        })?;

        let text = payload.text();
        let elapsed = start_time.elapsed();
        if text.is_empty() {
            warn!("Empty completion after {:.3}s", elapsed.as_secs_f64());
            return Err(TravelPlanError::empty_completion(payload.empty_reason()));
        }

        debug!(
            "Completion of {} chars in {:.3}s",
            text.len(),
            elapsed.as_secs_f64()
        );
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
