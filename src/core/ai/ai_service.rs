use async_trait::async_trait;
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};
use thiserror::Error;

/// Chunks of generated text, in arrival order.
pub type TextStream = BoxStream<'static, Result<String, AiError>>;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("AI API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Malformed stream event: {0}")]
    Decode(#[from] serde_json::Error),
}

#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Sends `prompt` to the model and returns the response as it is generated.
    async fn stream_prompt(&self, prompt: &str) -> Result<TextStream, AiError>;
}

pub struct AiService<P: AiProvider> {
    provider: P,
}

impl<P: AiProvider> AiService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Streams the answer to `prompt`, dropping empty chunks.
    pub async fn stream(&self, prompt: &str) -> Result<TextStream, AiError> {
        let stream = self.provider.stream_prompt(prompt).await?;
        Ok(stream
            .try_filter(|chunk| futures_util::future::ready(!chunk.is_empty()))
            .boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;

    struct ScriptedProvider(Vec<&'static str>);

    #[async_trait]
    impl AiProvider for ScriptedProvider {
        async fn stream_prompt(&self, _prompt: &str) -> Result<TextStream, AiError> {
            let chunks: Vec<Result<String, AiError>> =
                self.0.iter().map(|c| Ok(c.to_string())).collect();
            Ok(stream::iter(chunks).boxed())
        }
    }

    #[tokio::test]
    async fn test_stream_yields_chunks_in_order() {
        let service = AiService::new(ScriptedProvider(vec!["Hello", " ", "world!"]));
        let chunks: Vec<String> = service.stream("hi").await.unwrap().try_collect().await.unwrap();
        assert_eq!(chunks, vec!["Hello", " ", "world!"]);
    }

    #[tokio::test]
    async fn test_stream_skips_empty_chunks() {
        let service = AiService::new(ScriptedProvider(vec!["Hello", "", "world!"]));
        let chunks: Vec<String> = service.stream("hi").await.unwrap().try_collect().await.unwrap();
        assert_eq!(chunks, vec!["Hello", "world!"]);
    }
}
