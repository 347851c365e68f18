// file: src/analyzer/openai.rs
// description: OpenAI-compatible chat completions client used as the analysis service
// reference: https://platform.openai.com/docs/api-reference/chat

use crate::analyzer::Analyzer;
use crate::analyzer::prompt::{SYSTEM_PROMPT, build_user_prompt};
use crate::analyzer::response::parse_report;
use crate::config::AnalyzerConfig;
use crate::error::{AnalysisError, PipelineError, Result};
use crate::models::{AnalysisReport, TargetSpec};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct ChatCompletionAnalyzer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(&config.api_base_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request<'a>(&'a self, text: &str, target: &TargetSpec) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_user_prompt(text, target),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[async_trait]
impl Analyzer for ChatCompletionAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        target: &TargetSpec,
    ) -> std::result::Result<AnalysisReport, AnalysisError> {
        // Checked per call so the rest of the pipeline can run without a key.
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AnalysisError::Configuration(
                "OPENAI_API_KEY environment variable is not set. \
                 Please set it in the .env file or the analyzer config"
                    .to_string(),
            )
        })?;

        let request = self.build_request(text, target);

        debug!(
            "Requesting analysis from {} ({} chars of CV text)",
            self.model,
            text.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnalysisError::BadStatus { status, body });
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Request(format!("Failed to decode response: {}", e)))?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AnalysisError::EmptyResponse)?;

        debug!("Received {} chars of analysis", content.len());

        Ok(parse_report(&content))
    }
}
