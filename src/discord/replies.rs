// Reply helpers shared by commands, checks and the error handler.
//
// Slash replies can be ephemeral. Prefix replies can't, so short-lived notices
// are deleted a few seconds later together with the message that caused them.

use crate::discord::{Context, Error};
use std::time::Duration;

pub const VANISH_AFTER: Duration = Duration::from_secs(3);

/// Visible only to the caller on slash commands; on prefix commands, removed after a moment.
pub async fn notice(ctx: Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    match ctx {
        poise::Context::Application(_) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(text)
                    .ephemeral(true),
            )
            .await?;
        }
        poise::Context::Prefix(prefix) => {
            let reply = ctx.say(text).await?;
            tokio::time::sleep(VANISH_AFTER).await;
            // Either message may already be gone, or we may lack Manage Messages.
            if let Err(e) = reply.delete(ctx).await {
                tracing::debug!("Could not delete notice: {}", e);
            }
            if let Err(e) = prefix.msg.delete(ctx).await {
                tracing::debug!("Could not delete invoking message: {}", e);
            }
        }
    }
    Ok(())
}

/// Ephemeral on slash commands, a normal message otherwise.
pub async fn private(ctx: Context<'_>, text: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(text)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

pub fn is_slash(ctx: Context<'_>) -> bool {
    matches!(ctx, poise::Context::Application(_))
}
