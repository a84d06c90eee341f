use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;

use crate::error::Error;
use crate::types::ChatCompletionRequest;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

/// An issued completion request. Owned by the session loop while in flight;
/// dropping it abandons the request.
pub type PendingRequest = Pin<Box<dyn Future<Output = Result<String, Error>> + Send>>;

/// Seam between the dispatcher and the completion service. The credential is
/// per-call because it belongs to the end user, not to this process.
pub trait CompletionClient: Send + Sync {
    fn complete(&self, api_key: String, request: ChatCompletionRequest) -> PendingRequest;
}

/// OpenAI-compatible chat-completion client.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_base: String,
}

impl OpenAiClient {
    pub fn builder() -> OpenAiClientBuilder {
        OpenAiClientBuilder::default()
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Default)]
pub struct OpenAiClientBuilder {
    http: Option<reqwest::Client>,
    api_base: Option<String>,
}

impl OpenAiClientBuilder {
    pub fn api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = Some(api_base.into());
        self
    }

    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> OpenAiClient {
        OpenAiClient {
            http: self.http.unwrap_or_default(),
            api_base: self.api_base.unwrap_or_else(|| OPENAI_API_BASE.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl CompletionClient for OpenAiClient {
    fn complete(&self, api_key: String, request: ChatCompletionRequest) -> PendingRequest {
        let http = self.http.clone();
        let url = format!(
            "{}/chat/completions",
            self.api_base.trim_end_matches('/')
        );

        Box::pin(async move {
            let response = http
                .post(&url)
                .bearer_auth(&api_key)
                .json(&request)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::Upstream {
                    status: status.as_u16(),
                    message: upstream_message(&body),
                });
            }

            let completion: ChatCompletionResponse = response.json().await?;
            completion
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content)
                .ok_or(Error::MissingAnswer)
        })
    }
}

fn upstream_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: ErrorDetail,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: String,
    }

    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.is_empty() => "upstream request failed".to_string(),
        Err(_) => body.to_string(),
    }
}
