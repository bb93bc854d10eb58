// Utility commands: webhooks, relaying messages and the AI prompt.
//
// Same pattern as the other command files: pull primitives out of Discord
// types, call the core service, turn the result into a reply.

use crate::core::ai::{FinalReply, StreamingReply};
use crate::core::ai::streaming_reply::FILE_FAILED_NOTICE;
use crate::core::fun::texts::blank_wall;
use crate::core::webhooks::{WebhookError, WebhookMessage};
use crate::discord::replies;
use crate::discord::{Context, Error};
use futures_util::StreamExt;
use poise::serenity_prelude as serenity;
use rand::Rng;
use std::time::Duration;

const AI_DISABLED: &str = "AI responses are not configured on this bot.";
const AI_FAILED: &str = "The AI did not answer. Please try again later.";
const AI_EMPTY: &str = "The AI returned an empty response.";

/// Sends a message to a Discord webhook
#[poise::command(slash_command)]
pub async fn webhook(
    ctx: Context<'_>,
    #[description = "URL of the webhook"] webhook: String,
    #[description = "Message that you want to send from the webhook"] message: String,
    #[description = "The name how webhook will appear"] name: Option<String>,
    #[description = "The avatar URL for the webhook"] avatar_url: Option<String>,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;

    let outgoing = WebhookMessage {
        content: message,
        username: name,
        avatar_url,
    };

    let reply = match ctx.data().webhooks.relay(&webhook, outgoing).await {
        Ok(reply) => reply,
        Err(e @ (WebhookError::InvalidUrl | WebhookError::IncorrectAvatar)) => {
            tracing::info!(user = %ctx.author().name, "Webhook request refused: {}", e);
            e.to_string()
        }
        Err(e) => {
            tracing::warn!("Webhook request failed: {}", e);
            "Could not reach the webhook. Message hasn't been sent.".to_string()
        }
    };

    replies::private(ctx, reply).await
}

/// Send a message to a channel
#[poise::command(slash_command, guild_only)]
pub async fn say(
    ctx: Context<'_>,
    #[description = "Message to send"] message: String,
    #[description = "How many seconds after sending should it be deleted."]
    #[min = 1]
    #[max = 600]
    delete_after: Option<u16>,
) -> Result<(), Error> {
    let channel_id = ctx.channel_id();
    let sent = channel_id.say(ctx, &message).await?;
    tracing::info!(
        user = %ctx.author().name,
        channel_id = channel_id.get(),
        %message,
        "Relayed message"
    );

    let confirmation = format!("Message sent to <#{}>", channel_id);
    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content(&confirmation)
                .ephemeral(true),
        )
        .await?;

    let Some(seconds) = delete_after else {
        return Ok(());
    };

    tokio::time::sleep(Duration::from_secs(seconds.into())).await;
    sent.delete(ctx).await?;
    reply
        .edit(
            ctx,
            poise::CreateReply::default().content(format!(
                "{}, was removed due to request to remove it after {} seconds.",
                confirmation, seconds
            )),
        )
        .await?;
    tracing::info!(seconds, "Removed relayed message after its delay");
    Ok(())
}

/// Checks is the message sent in the DM or a server
#[poise::command(slash_command, prefix_command)]
pub async fn dm_or_not(ctx: Context<'_>) -> Result<(), Error> {
    let answer = if ctx.guild_id().is_some() {
        "It is a server"
    } else {
        "It is a DM"
    };
    ctx.say(answer).await?;
    Ok(())
}

/// AI that will (maybe) respond to your questions.
#[poise::command(slash_command, user_cooldown = 10)]
pub async fn ai(
    ctx: Context<'_>,
    #[description = "Message to the AI"] prompt: String,
) -> Result<(), Error> {
    let Some(ai) = ctx.data().ai.clone() else {
        replies::private(ctx, AI_DISABLED).await?;
        return Ok(());
    };

    ctx.defer().await?;
    tracing::info!(user = %ctx.author().name, %prompt, "AI prompt");

    let reply = ctx.say(StreamingReply::placeholder()).await?;
    let mut stream = match ai.stream(&prompt).await {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!("AI request failed: {}", e);
            reply
                .edit(ctx, poise::CreateReply::default().content(AI_FAILED))
                .await?;
            return Ok(());
        }
    };

    let mut state = StreamingReply::new();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(text) => {
                if let Some(content) = state.push(&text) {
                    reply
                        .edit(ctx, poise::CreateReply::default().content(content))
                        .await?;
                }
            }
            Err(e) => {
                // Keep what already arrived.
                tracing::warn!("AI stream interrupted: {}", e);
                break;
            }
        }
    }

    match state.finish() {
        FinalReply::Text(text) => {
            let text = if text.trim().is_empty() {
                AI_EMPTY.to_string()
            } else {
                text
            };
            reply
                .edit(ctx, poise::CreateReply::default().content(text))
                .await?;
        }
        FinalReply::File(text) => send_as_file(ctx, reply, &text).await?,
    }
    Ok(())
}

async fn send_as_file(
    ctx: Context<'_>,
    placeholder: poise::ReplyHandle<'_>,
    text: &str,
) -> Result<(), Error> {
    let file_name = format!("{}.txt", rand::thread_rng().gen_range(100_000..=999_999));

    let path = match ctx.data().counters.write_scratch_file(&file_name, text).await {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Could not write AI response file: {}", e);
            placeholder
                .edit(ctx, poise::CreateReply::default().content(FILE_FAILED_NOTICE))
                .await?;
            return Ok(());
        }
    };

    placeholder.delete(ctx).await?;
    let attachment = serenity::CreateAttachment::path(&path).await?;
    ctx.send(
        poise::CreateReply::default()
            .content("Here is the file with the full response:")
            .attachment(attachment),
    )
    .await?;

    if let Err(e) = tokio::fs::remove_file(&path).await {
        tracing::warn!(path = %path.display(), "Could not remove AI response file: {}", e);
    }
    Ok(())
}

/// Hides the conversation
#[poise::command(slash_command, prefix_command, guild_only)]
pub async fn hide_conversation(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say(blank_wall()).await?;
    Ok(())
}
