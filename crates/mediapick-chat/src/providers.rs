//! External LLM provider completions.
//!
//! OpenAI and Groq share the chat-completions format. Anthropic uses the
//! Messages API with the system prompt as a top-level field.

use async_trait::async_trait;
use mediapick_core::{Error, Result};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::types::{ChatMessage, GenerationRequest, LLMProvider};

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Produces text for a prompt. Implementations may fail; callers decide
/// how to degrade.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;
}

/// [`TextGenerator`] backed by a provider's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpGenerator {
    client: Client,
    provider: LLMProvider,
}

impl HttpGenerator {
    pub fn new(provider: LLMProvider) -> Self {
        Self {
            client: Client::new(),
            provider,
        }
    }

    pub fn provider(&self) -> LLMProvider {
        self.provider
    }
}

#[async_trait]
impl TextGenerator for HttpGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        match self.provider {
            LLMProvider::OpenAI => complete_openai_compat(&self.client, OPENAI_URL, request).await,
            LLMProvider::Groq => complete_openai_compat(&self.client, GROQ_URL, request).await,
            LLMProvider::Anthropic => complete_anthropic(&self.client, request).await,
        }
    }
}

/// Complete against an OpenAI-compatible API (OpenAI, Groq).
async fn complete_openai_compat(
    client: &Client,
    url: &str,
    request: &GenerationRequest,
) -> Result<String> {
    let msgs: Vec<Value> = request
        .messages()
        .iter()
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    let body = json!({
        "model": request.model,
        "messages": msgs,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    });

    debug!("Requesting completion from {} with model {}", url, request.model);

    let response = client
        .post(url)
        .header("Authorization", format!("Bearer {}", request.api_key))
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let parsed = read_json(response).await?;
    openai_text(&parsed)
}

/// Complete against Anthropic's Messages API.
async fn complete_anthropic(client: &Client, request: &GenerationRequest) -> Result<String> {
    let messages = request.messages();
    let system_msg: Option<&ChatMessage> = messages.iter().find(|m| m.role == "system");
    let conv_msgs: Vec<Value> = messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| json!({"role": m.role, "content": m.content}))
        .collect();

    let mut body = json!({
        "model": request.model,
        "messages": conv_msgs,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    });
    if let Some(sys) = system_msg {
        body["system"] = json!(sys.content);
    }

    debug!("Requesting completion from Anthropic with model {}", request.model);

    let response = client
        .post(ANTHROPIC_URL)
        .header("x-api-key", &request.api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
        .header("Content-Type", "application/json")
        .json(&body)
        .send()
        .await
        .map_err(|e| Error::Http(format!("Request failed: {}", e)))?;

    let parsed = read_json(response).await?;
    anthropic_text(&parsed)
}

async fn read_json(response: reqwest::Response) -> Result<Value> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("Provider returned {}", status);
        return Err(Error::Generation(format!("API error {}: {}", status, body)));
    }
    response
        .json::<Value>()
        .await
        .map_err(|e| Error::Generation(format!("Unreadable response body: {}", e)))
}

/// Extract the assistant text from a chat-completions body.
fn openai_text(body: &Value) -> Result<String> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| Error::Generation("Response has no message content".into()))
}

/// Concatenate the text blocks of a Messages API body.
fn anthropic_text(body: &Value) -> Result<String> {
    if body["type"].as_str() == Some("error") {
        let msg = body["error"]["message"].as_str().unwrap_or("Unknown error");
        return Err(Error::Generation(msg.to_string()));
    }

    let blocks = body["content"]
        .as_array()
        .ok_or_else(|| Error::Generation("Response has no content blocks".into()))?;
    let text: String = blocks
        .iter()
        .filter(|b| b["type"].as_str() == Some("text"))
        .filter_map(|b| b["text"].as_str())
        .collect();

    if text.is_empty() {
        return Err(Error::Generation("Response has no text".into()));
    }
    Ok(text)
}
