//! Gemini `generateContent` client

use std::time::Duration;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::config::TutorConfig;
use crate::error::{GatewayError, Result};
use super::{prompts, AiGateway, AnalysisRequest, ChatRequest, QuizRequest};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    Inline { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// [`AiGateway`] backed by the Gemini REST API
pub struct GeminiGateway {
    api_key: String,
    model: String,
    api_base: String,
    language: String,
    client: reqwest::Client,
}

impl GeminiGateway {
    /// Build a client from configuration; fails without an API key
    pub fn new(config: &TutorConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(GatewayError::NotConfigured)?
            .to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            api_key,
            model: config.model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            client,
        })
    }

    /// Point the client at another base URL
    pub fn with_base_url(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    /// Model in use
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    fn chat_contents(&self, request: &ChatRequest) -> Vec<Content> {
        let mut contents: Vec<Content> = request
            .history
            .iter()
            .map(|turn| Content {
                role: Some(turn.role.as_str()),
                parts: vec![Part::Text { text: turn.text.clone() }],
            })
            .collect();

        let mut parts = vec![Part::Text {
            text: prompts::chat_user_turn(request, &self.language),
        }];
        if let Some(att) = &request.attachment {
            parts.push(Part::Inline {
                inline_data: InlineData {
                    mime_type: att.mime_type.clone(),
                    data: att.to_base64(),
                },
            });
        }
        contents.push(Content { role: Some("user"), parts });
        contents
    }

    fn single_prompt(text: String) -> Vec<Content> {
        vec![Content {
            role: None,
            parts: vec![Part::Text { text }],
        }]
    }

    async fn generate(&self, contents: Vec<Content>) -> Result<String> {
        tracing::debug!(model = %self.model, turns = contents.len(), "sending generateContent");

        let res = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateRequest { contents })
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = res.status();
        if status.as_u16() == 429 {
            tracing::warn!(model = %self.model, "rate limited");
            return Err(GatewayError::RateLimited.into());
        }
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|env| env.error)
                .and_then(|err| err.message)
                .unwrap_or(body);
            tracing::warn!(code = status.as_u16(), %message, "generateContent failed");
            return Err(GatewayError::Status { code: status.as_u16(), message }.into());
        }

        let parsed: GenerateResponse = res
            .json()
            .await
            .map_err(|e| GatewayError::Transport(format!("Unreadable response: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .find(|t| !t.trim().is_empty())
            .ok_or_else(|| GatewayError::EmptyResponse.into())
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    async fn complete_chat(&self, request: &ChatRequest) -> Result<String> {
        self.generate(self.chat_contents(request)).await
    }

    async fn generate_quiz(&self, request: &QuizRequest) -> Result<String> {
        self.generate(Self::single_prompt(prompts::quiz_prompt(request, &self.language)))
            .await
    }

    async fn analyze_report(&self, request: &AnalysisRequest) -> Result<String> {
        self.generate(Self::single_prompt(prompts::analysis_prompt(request, &self.language)))
            .await
    }
}
