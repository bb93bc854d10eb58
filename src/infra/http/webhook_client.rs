use crate::core::webhooks::{is_image_content_type, WebhookError, WebhookMessage, WebhookTransport};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use std::time::Duration;

const IMAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(3);

/// reqwest-backed webhook calls plus the avatar image check.
pub struct ReqwestWebhookClient {
    client: Client,
}

impl ReqwestWebhookClient {
    pub fn new() -> Result<Self, WebhookError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| WebhookError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

fn transport(err: reqwest::Error) -> WebhookError {
    WebhookError::Transport(err.to_string())
}

#[async_trait]
impl WebhookTransport for ReqwestWebhookClient {
    async fn probe(&self, url: &str) -> Result<u16, WebhookError> {
        let response = self.client.get(url).send().await.map_err(transport)?;
        Ok(response.status().as_u16())
    }

    async fn execute(&self, url: &str, message: &WebhookMessage) -> Result<u16, WebhookError> {
        let response = self
            .client
            .post(url)
            .json(message)
            .send()
            .await
            .map_err(transport)?;
        Ok(response.status().as_u16())
    }

    async fn delete(&self, url: &str) -> Result<u16, WebhookError> {
        let response = self.client.delete(url).send().await.map_err(transport)?;
        Ok(response.status().as_u16())
    }

    async fn is_image(&self, link: &str) -> bool {
        let response = match self
            .client
            .head(link)
            .timeout(IMAGE_CHECK_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(link, "Image check failed: {}", err);
                return false;
            }
        };

        if response.status() != StatusCode::OK {
            return false;
        }

        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(is_image_content_type)
            .unwrap_or(false)
    }
}
