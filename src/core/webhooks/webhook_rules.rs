// Rules for user-supplied webhook URLs and how to read the API's answers.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

const IMAGE_CONTENT_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/svg+xml",
];

const ACCEPTED_PREFIXES: [&str; 3] = [
    "https://discord.com/api/webhooks/",
    "http://discord.com/api/webhooks/",
    "discord.com/api/webhooks/",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebhookError {
    #[error("Invalid webhook URL.")]
    InvalidUrl,

    #[error("Incorrect avatar URL.")]
    IncorrectAvatar,

    #[error("Webhook request failed: {0}")]
    Transport(String),
}

/// Body of an "execute webhook" call. Unset fields fall back to the webhook's defaults.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WebhookMessage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    RateLimited,
    Unexpected(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Missing,
    Unexpected(u16),
}

/// Accepts only Discord webhook links and always returns an https URL.
pub fn normalize_webhook_url(raw: &str) -> Result<String, WebhookError> {
    let raw = raw.trim();
    if !ACCEPTED_PREFIXES.iter().any(|prefix| raw.starts_with(prefix)) {
        return Err(WebhookError::InvalidUrl);
    }

    if let Some(rest) = raw.strip_prefix("http://") {
        Ok(format!("https://{}", rest))
    } else if raw.starts_with("discord.com") {
        Ok(format!("https://{}", raw))
    } else {
        Ok(raw.to_string())
    }
}

pub fn classify_send(status: u16) -> SendOutcome {
    match status {
        200 | 204 => SendOutcome::Sent,
        429 => SendOutcome::RateLimited,
        other => SendOutcome::Unexpected(other),
    }
}

pub fn classify_delete(status: u16) -> DeleteOutcome {
    match status {
        200 | 204 => DeleteOutcome::Deleted,
        401 | 404 => DeleteOutcome::Missing,
        other => DeleteOutcome::Unexpected(other),
    }
}

pub fn send_reply(outcome: SendOutcome) -> String {
    match outcome {
        SendOutcome::Sent => "Message sent successfully.".to_string(),
        SendOutcome::RateLimited => {
            "Rate-limit has been hit. Message hasn't been sent.".to_string()
        }
        SendOutcome::Unexpected(status) => format!("Webhook responded with status {}.", status),
    }
}

pub fn delete_reply(outcome: DeleteOutcome) -> String {
    match outcome {
        DeleteOutcome::Deleted => "Removed webhook successfully".to_string(),
        DeleteOutcome::Missing => {
            "This webhook does not exist. You may have already deleted it.".to_string()
        }
        DeleteOutcome::Unexpected(status) => format!(
            "Webhook may not have been deleted. Response code is {}.",
            status
        ),
    }
}

/// Whether a `Content-Type` header names an image format Discord can show as an avatar.
pub fn is_image_content_type(content_type: &str) -> bool {
    let content_type = content_type.trim().to_ascii_lowercase();
    IMAGE_CONTENT_TYPES
        .iter()
        .any(|image| content_type.starts_with(image))
}

/// HTTP side of webhooks. Methods return raw status codes; the rules above interpret them.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn probe(&self, url: &str) -> Result<u16, WebhookError>;

    async fn execute(&self, url: &str, message: &WebhookMessage) -> Result<u16, WebhookError>;

    async fn delete(&self, url: &str) -> Result<u16, WebhookError>;

    /// Never fails: anything unreachable or non-image is simply `false`.
    async fn is_image(&self, link: &str) -> bool;
}

pub struct WebhookService<T: WebhookTransport> {
    transport: T,
}

impl<T: WebhookTransport> WebhookService<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Posts `message` through a user-supplied webhook and returns the reply to show.
    pub async fn relay(
        &self,
        raw_url: &str,
        message: WebhookMessage,
    ) -> Result<String, WebhookError> {
        let url = normalize_webhook_url(raw_url)?;

        if self.transport.probe(&url).await? == 401 {
            return Err(WebhookError::InvalidUrl);
        }

        if let Some(avatar) = message.avatar_url.as_deref() {
            if !self.is_image(avatar).await {
                return Err(WebhookError::IncorrectAvatar);
            }
        }

        let outcome = classify_send(self.transport.execute(&url, &message).await?);
        match outcome {
            SendOutcome::Sent => {
                tracing::info!(content = %message.content, "Sent message to webhook")
            }
            SendOutcome::RateLimited => tracing::warn!("Webhook rate limit hit, message dropped"),
            SendOutcome::Unexpected(status) => {
                tracing::warn!(status, "Webhook answered unexpectedly")
            }
        }
        Ok(send_reply(outcome))
    }

    pub async fn delete(&self, raw_url: &str) -> Result<String, WebhookError> {
        let url = normalize_webhook_url(raw_url)?;
        let outcome = classify_delete(self.transport.delete(&url).await?);
        tracing::info!(?outcome, "Webhook delete finished");
        Ok(delete_reply(outcome))
    }

    async fn is_image(&self, link: &str) -> bool {
        !link.trim().is_empty() && self.transport.is_image(link).await
    }
}
