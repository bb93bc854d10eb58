// Owner-only administration commands.
//
// Every command here carries the `owner_only` check, which answers refused
// callers itself.

use crate::core::webhooks::WebhookError;
use crate::discord::checks::owner_only;
use crate::discord::commands::presence;
use crate::discord::replies;
use crate::discord::{Context, Error};
use crate::infra::host::POWEROFF_DISABLED_MESSAGE;
use poise::serenity_prelude as serenity;
use std::time::Duration;

/// Status code of a failed Discord API call, if it got that far.
pub(crate) fn http_status(err: &serenity::Error) -> Option<u16> {
    match err {
        serenity::Error::Http(serenity::HttpError::UnsuccessfulRequest(response)) => {
            Some(response.status_code.as_u16())
        }
        _ => None,
    }
}

/// Discord refuses to bulk delete messages older than two weeks. A minute of
/// slack covers clock drift between us and the API.
const BULK_DELETE_MAX_AGE_SECS: i64 = 14 * 24 * 60 * 60 - 60;

/// Splits `(id, unix timestamp)` pairs into those young enough for a bulk
/// delete and those that have to go one at a time.
fn split_by_age<T: Copy>(messages: &[(T, i64)], now: i64) -> (Vec<T>, Vec<T>) {
    let (recent, old): (Vec<&(T, i64)>, Vec<&(T, i64)>) = messages
        .iter()
        .partition(|(_, sent)| now - sent < BULK_DELETE_MAX_AGE_SECS);
    (
        recent.into_iter().map(|(id, _)| *id).collect(),
        old.into_iter().map(|(id, _)| *id).collect(),
    )
}

/// [OWNER ONLY] Turns off the bot
#[poise::command(slash_command, prefix_command, check = "owner_only")]
pub async fn shutdown(ctx: Context<'_>) -> Result<(), Error> {
    ctx.say("Shutting down the bot...").await?;
    tracing::info!(user = %ctx.author().name, "Shutting down the bot...");
    ctx.framework().shard_manager().shutdown_all().await;
    Ok(())
}

/// Removes messages in a chat.
#[poise::command(
    slash_command,
    prefix_command,
    guild_only,
    required_permissions = "MANAGE_MESSAGES",
    required_bot_permissions = "MANAGE_MESSAGES",
    check = "owner_only"
)]
pub async fn purge(
    ctx: Context<'_>,
    #[description = "How many messages you want to delete (max: 100)"]
    #[min = 1]
    #[max = 100]
    range: u8,
) -> Result<(), Error> {
    match ctx {
        poise::Context::Application(_) => ctx.defer_ephemeral().await?,
        poise::Context::Prefix(prefix) => {
            if let Err(e) = prefix.msg.delete(ctx).await {
                tracing::debug!("Could not delete purge command message: {}", e);
            }
        }
    }

    let channel = ctx.channel_id();
    let messages = channel
        .messages(ctx, serenity::GetMessages::new().limit(range))
        .await?;
    let stamped: Vec<(serenity::MessageId, i64)> = messages
        .iter()
        .map(|m| (m.id, m.timestamp.unix_timestamp()))
        .collect();
    let (recent, old) = split_by_age(&stamped, chrono::Utc::now().timestamp());

    let mut deleted = 0;
    match recent.as_slice() {
        [] => {}
        [single] => {
            channel.delete_message(ctx, *single).await?;
            deleted += 1;
        }
        many => {
            channel.delete_messages(ctx, many).await?;
            deleted += many.len();
        }
    }
    for id in old {
        match channel.delete_message(ctx, id).await {
            Ok(()) => deleted += 1,
            Err(e) => tracing::warn!(message_id = id.get(), "Could not delete old message: {}", e),
        }
    }

    tracing::info!(
        user = %ctx.author().name,
        channel_id = channel.get(),
        requested = range,
        deleted,
        "Purged messages"
    );
    replies::notice(ctx, format!("Deleted {} messages successfully.", deleted)).await
}

/// Changes the status of the bot
#[poise::command(slash_command, check = "owner_only")]
pub async fn change_status(ctx: Context<'_>) -> Result<(), Error> {
    let buttons = presence::STATUS_CHOICES
        .iter()
        .map(|(id, label, style, _)| serenity::CreateButton::new(*id).label(*label).style(*style))
        .collect();

    let reply = ctx
        .send(
            poise::CreateReply::default()
                .content("Select the status:")
                .components(vec![serenity::CreateActionRow::Buttons(buttons)])
                .ephemeral(true),
        )
        .await?;
    let msg_id = reply.message().await?.id;

    while let Some(mci) = serenity::ComponentInteractionCollector::new(ctx)
        .author_id(ctx.author().id)
        .channel_id(ctx.channel_id())
        .timeout(Duration::from_secs(60 * 2))
        .filter(move |mci| mci.message.id == msg_id)
        .await
    {
        let Some((_, _, _, status)) = presence::STATUS_CHOICES
            .iter()
            .find(|(id, ..)| *id == mci.data.custom_id)
        else {
            continue;
        };

        presence::set_status(ctx.serenity_context(), *status);
        let name = presence::status_name(*status);
        tracing::info!("Status set to {}", name);

        if let Err(e) = mci
            .create_response(
                &ctx,
                serenity::CreateInteractionResponse::Message(
                    serenity::CreateInteractionResponseMessage::new()
                        .content(format!("Status set to {}", name))
                        .ephemeral(true),
                ),
            )
            .await
        {
            tracing::warn!("Error answering status button: {:?}", e);
        }
    }

    Ok(())
}

/// Creates a webhook.
#[poise::command(slash_command, prefix_command, guild_only, check = "owner_only")]
pub async fn create_webhook(ctx: Context<'_>) -> Result<(), Error> {
    let created = ctx
        .channel_id()
        .create_webhook(ctx, serenity::CreateWebhook::new("Test webhook"))
        .await;

    let webhook = match created {
        Ok(webhook) => webhook,
        Err(e) if http_status(&e) == Some(403) => {
            ctx.say(
                "I am forbidden to create a webhook in this channel (I don't have permissions).",
            )
            .await?;
            return Ok(());
        }
        Err(e) => {
            tracing::warn!("Failed to create webhook: {}", e);
            ctx.say("Failed to create webhook.").await?;
            return Ok(());
        }
    };

    match webhook.url() {
        Ok(url) => replies::private(ctx, url).await,
        Err(e) => {
            tracing::warn!("Created webhook has no URL: {}", e);
            ctx.say("Failed to create webhook.").await?;
            Ok(())
        }
    }
}

/// Deletes a webhook
#[poise::command(slash_command, prefix_command, check = "owner_only")]
pub async fn delete_webhook(
    ctx: Context<'_>,
    #[description = "Webhook link."] webhook: String,
) -> Result<(), Error> {
    let reply = match ctx.data().webhooks.delete(&webhook).await {
        Ok(reply) => reply,
        Err(e @ WebhookError::InvalidUrl) => e.to_string(),
        Err(e) => {
            tracing::warn!("Webhook delete failed: {}", e);
            "Webhook may not have been deleted. The request failed.".to_string()
        }
    };
    ctx.say(reply).await?;
    Ok(())
}

/// [OWNER ONLY] Turns off the computer hosting the bot
#[poise::command(slash_command, check = "owner_only")]
pub async fn turn_off_pc(ctx: Context<'_>) -> Result<(), Error> {
    let host = &ctx.data().host;
    if !host.poweroff_enabled() {
        ctx.say(POWEROFF_DISABLED_MESSAGE).await?;
        return Ok(());
    }

    ctx.say("Turning off the PC...").await?;
    if let Err(e) = host.poweroff().await {
        tracing::error!("Poweroff failed: {}", e);
        ctx.say("Failed to turn off the PC.").await?;
    }
    Ok(())
}

/// Sends numbered messages
#[poise::command(slash_command, prefix_command, check = "owner_only")]
pub async fn send_messages(
    ctx: Context<'_>,
    #[description = "How many messages to send (max: 100)"]
    #[min = 1]
    #[max = 100]
    count: u8,
) -> Result<(), Error> {
    for i in 1..=count {
        ctx.say(i.to_string()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 24 * 60 * 60;

    #[test]
    fn test_split_by_age_keeps_recent_for_bulk() {
        let now = 100 * DAY;
        let messages = [
            (1, now - 60),
            (2, now - 13 * DAY),
            (3, now - 15 * DAY),
            (4, now - 90 * DAY),
        ];

        let (recent, old) = split_by_age(&messages, now);
        assert_eq!(recent, vec![1, 2]);
        assert_eq!(old, vec![3, 4]);
    }

    #[test]
    fn test_split_by_age_edge_of_window_goes_single() {
        let now = 100 * DAY;
        let (recent, old) = split_by_age(&[(7, now - 14 * DAY)], now);
        assert!(recent.is_empty());
        assert_eq!(old, vec![7]);
    }

    #[test]
    fn test_split_by_age_empty() {
        let (recent, old) = split_by_age::<u64>(&[], 0);
        assert!(recent.is_empty() && old.is_empty());
    }
}
