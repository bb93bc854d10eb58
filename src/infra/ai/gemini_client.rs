// =============================================================================
// GEMINI CLIENT - Google AI Studio streaming API
// =============================================================================
//
// Implements `AiProvider` on top of `streamGenerateContent` with `alt=sse`, so
// the model's answer arrives as a series of server-sent events, each carrying
// a partial `GenerateContentResponse`.
//
// **Environment Variables:**
// - `GEMINI_API_KEY` - Your API key from https://aistudio.google.com/apikey
// - `GEMINI_MODEL`   - Model name, e.g. `gemma-3-27b-it`

use super::sse::SseDecoder;
use crate::core::ai::{AiError, AiProvider, TextStream};
use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// =============================================================================
// GEMINI API DATA STRUCTURES
// =============================================================================
//
// See: https://ai.google.dev/api/generate-content

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Candidate {
    content: Option<Content>,
}

/// Errors can also arrive inside the stream instead of as an HTTP status.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ApiErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StreamChunk {
    candidates: Vec<Candidate>,
    error: Option<ApiErrorBody>,
}

/// Text carried by one SSE `data:` payload. Only the first candidate is used.
fn chunk_text(payload: &str) -> Result<String, AiError> {
    let chunk: StreamChunk = serde_json::from_str(payload)?;
    if let Some(error) = chunk.error {
        return Err(AiError::Api {
            status: error.code,
            body: error.message,
        });
    }

    Ok(chunk
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default())
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: BASE_URL.to_string(),
        }
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl AiProvider for GeminiClient {
    async fn stream_prompt(&self, prompt: &str) -> Result<TextStream, AiError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        tracing::debug!(model = %self.model, "Sending streamed prompt to Gemini");

        let response = self
            .client
            .post(self.stream_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut decoder = SseDecoder::new();
        let texts = response.bytes_stream().flat_map(move |chunk| {
            let items: Vec<Result<String, AiError>> = match chunk {
                Ok(bytes) => decoder
                    .feed(&bytes)
                    .iter()
                    .map(|payload| chunk_text(payload))
                    .collect(),
                Err(e) => vec![Err(AiError::Http(e.to_string()))],
            };
            stream::iter(items)
        });

        Ok(texts.boxed())
    }
}
