#![doc = "Language-model integration for the CLI: bridges the core service traits to an OpenAI-compatible chat-completions API."]
//
//! # LLM client (CLI <-> Core)
//!
//! This module wires the [`Scorer`] and [`Synthesizer`] traits from
//! [`readmegen_core::contract`] to a real HTTP backend.
//!
//! - Construct [`LLMClient`] with [`LLMClient::new_from_env`] (`OPENAI_API_KEY`, optional
//!   `OPENAI_BASE_URL` and `READMEGEN_MODEL`) or explicitly with [`LLMClient::new`].
//! - Scoring requests ask for structured output against the assessment JSON schema;
//!   the returned message is validated by [`readmegen_core::assess::parse_assessment`].
//! - Synthesis sends the rendered README prompt and returns the message text untouched.

use async_trait::async_trait;
use readmegen_core::assess::{assessment_schema, parse_assessment};
use readmegen_core::contract::{AssessmentRequest, ScoreOutcome, Scorer, ServiceError, Synthesizer};
use readmegen_core::select::SelectedItem;
use readmegen_core::synthesize::render_prompt;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

use crate::load_config::ModelSection;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
/// Whole-request limit for README synthesis. Scoring requests carry no HTTP limit of
/// their own; the assessor bounds each one.
pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(600);

pub const ASSESS_SYSTEM: &str = "You are an expert technical writer generating an accurate, concise README.
Rate how useful a file is for onboarding (run/build/deploy), configuration (env/API keys), architecture,
key modules, and testing.

Scoring rubric:
5 = Critical entrypoint/config/architecture (main app, routing, app factory, Docker, docker-compose, package.json scripts, pyproject, env schema)
4 = Important integration (DB models, API handlers, routers, main pages, providers; CI that runs build/test)
3 = Helpful config/utilities (lint/format configs, Makefile targets, test config, core utils used across app)
2 = Minor helpers or generic UI atoms, usually summarize only
1-0 = Not helpful for README onboarding

NEVER paste large code. Summaries must explain purpose and how it affects run/config/deploy.
Return a JSON object that matches the schema exactly.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

pub struct LLMClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    synthesis_timeout: Duration,
}

impl LLMClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        synthesis_timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(LLMClient {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            synthesis_timeout,
        })
    }

    /// Build a client from the environment, with the config file's model section as fallback.
    pub fn new_from_env(
        model: &ModelSection,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let api_key = env::var("OPENAI_API_KEY").map_err(|e| {
            tracing::error!(error = ?e, "OPENAI_API_KEY missing in environment");
            format!("OPENAI_API_KEY missing in environment: {e}")
        })?;
        let base_url = env::var("OPENAI_BASE_URL")
            .ok()
            .or_else(|| model.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let model_name = env::var("READMEGEN_MODEL")
            .ok()
            .or_else(|| model.name.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let synthesis_timeout = model
            .synthesis_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SYNTHESIS_TIMEOUT);

        tracing::info!(
            api_key_set = !api_key.is_empty(),
            base_url = %base_url,
            model = %model_name,
            synthesis_timeout_secs = synthesis_timeout.as_secs(),
            "Initialized LLMClient from environment"
        );
        Ok(LLMClient::new(base_url, api_key, model_name, synthesis_timeout)?)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(
        &self,
        request: &ChatRequest<'_>,
        timeout: Option<Duration>,
    ) -> Result<ResponseMessage, ServiceError> {
        let url = format!("{}/chat/completions", self.base_url);
        let mut builder = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = ?e, url = %url, "Chat completion request failed");
                ServiceError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<Failed to decode response body>"));
            tracing::error!(status = %status, url = %url, "Chat completion returned error. Response body: {body}");
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            tracing::error!(error = ?e, url = %url, "Failed to parse chat completion JSON");
            ServiceError::Decode(e.to_string())
        })?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| ServiceError::Decode("response contained no choices".into()))
    }
}

pub fn assess_user_prompt(request: &AssessmentRequest) -> String {
    format!(
        "Assess this repository file for README relevance.\nPath: {}\nExt: {}\nSize: {} bytes\n\nSample:\n---\n{}\n---",
        request.path, request.extension, request.size, request.sample
    )
}

#[async_trait]
impl Scorer for LLMClient {
    async fn score(&self, request: &AssessmentRequest) -> Result<ScoreOutcome, ServiceError> {
        tracing::debug!(path = %request.path, model = %self.model, "Requesting assessment");
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: ASSESS_SYSTEM.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: assess_user_prompt(request),
                },
            ],
            response_format: Some(serde_json::json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "file_assessment",
                    "strict": true,
                    "schema": assessment_schema(),
                }
            })),
        };

        let message = self.chat(&body, None).await?;
        match (message.content, message.refusal) {
            (Some(content), _) => Ok(parse_assessment(&content)),
            (None, Some(refusal)) => Ok(ScoreOutcome::SchemaViolation {
                reason: "model refused to produce an assessment".into(),
                raw: refusal,
            }),
            (None, None) => Ok(ScoreOutcome::SchemaViolation {
                raw: String::new(),
                reason: "empty message content".into(),
            }),
        }
    }
}

#[async_trait]
impl Synthesizer for LLMClient {
    async fn synthesize(
        &self,
        items: &[SelectedItem],
        question: &str,
    ) -> Result<String, ServiceError> {
        tracing::info!(items = items.len(), model = %self.model, "Requesting README synthesis");
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: render_prompt(items, question),
            }],
            response_format: None,
        };
        let message = self.chat(&body, Some(self.synthesis_timeout)).await?;
        Ok(message.content.unwrap_or_default())
    }
}
