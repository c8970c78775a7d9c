//! OpenAI-style chat-completions pipeline
//!
//! Talks to any server exposing the `/v1/chat/completions` shape
//! (llama.cpp, vLLM, Ollama, the hosted APIs). The conversation history
//! maps straight onto the request's message list.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::error::{LlmError, LlmResult};
use crate::history::{ChatHistory, ChatMessage};
use crate::pipeline::{GenerationParams, InferencePipeline};

/// Connection settings for the chat-completions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpPipelineConfig {
    /// Server base URL, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Model identifier sent with each request
    pub model: String,
    /// Bearer token, if the server requires one
    pub api_key: Option<String>,
    /// Per-request timeout (default: 30000ms)
    pub timeout_ms: u64,
    /// Sampling parameters
    pub params: GenerationParams,
}

impl Default for HttpPipelineConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            model: "tinyllama-1.1b-chat".to_string(),
            api_key: None,
            timeout_ms: 30_000,
            params: GenerationParams::default(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Chat-completions client implementing [`InferencePipeline`]
pub struct HttpPipeline {
    config: HttpPipelineConfig,
    client: reqwest::Client,
}

impl HttpPipeline {
    pub fn new(config: HttpPipelineConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl InferencePipeline for HttpPipeline {
    async fn generate(&self, history: &ChatHistory) -> LlmResult<String> {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: history.messages(),
            max_tokens: self.config.params.max_new_tokens,
            temperature: self.config.params.temperature,
            top_p: self.config.params.top_p,
        };

        debug!(
            target: "llm",
            url = %self.completions_url(),
            messages = history.messages().len(),
            "Requesting completion"
        );

        let mut builder = self.client.post(self.completions_url()).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?.error_for_status()?;
        let completion: ChatCompletionResponse = response.json().await?;

        let reply = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                LlmError::MalformedResponse("completion carried no choices".to_string())
            })?;

        Ok(reply)
    }

    async fn is_ready(&self) -> bool {
        let url = format!("{}/v1/models", self.config.base_url.trim_end_matches('/'));
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_payload_shape() {
        let mut history = ChatHistory::default();
        history.push_user("hello robot");

        let request = ChatCompletionRequest {
            model: "tinyllama-1.1b-chat",
            messages: history.messages(),
            max_tokens: 80,
            temperature: 0.6,
            top_p: 0.9,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "tinyllama-1.1b-chat");
        assert_eq!(json["max_tokens"], 80);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hello robot");
    }

    #[test]
    fn test_completions_url_tolerates_trailing_slash() {
        let pipeline = HttpPipeline::new(HttpPipelineConfig {
            base_url: "http://localhost:8080/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            pipeline.completions_url(),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"Hi there."}}]}"#;
        let parsed: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "Hi there.");
    }
}
