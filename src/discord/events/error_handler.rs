// Framework error hook.
//
// Refused owner checks answer the caller themselves, so check failures are
// silent here. Everything unexpected is logged and the caller gets a short
// generic reply.

use crate::core::access::DENIED_MESSAGE;
use crate::discord::replies;
use crate::discord::{Data, Error};
use std::time::Duration;

const MISSING_BOT_PERMISSIONS: &str = "I don't have necessary permissions to do that.";
const GUILD_ONLY: &str = "This command only works in servers.";
const GENERIC_FAILURE: &str = "Something went wrong while running that command.";

pub fn cooldown_message(remaining: Duration) -> String {
    format!(
        "You are on cooldown. Please try again in {:.2} seconds.",
        remaining.as_secs_f64()
    )
}

pub fn usage_message(command: &str, prefix: &str) -> String {
    format!(
        "Those arguments don't fit `{}{}`. Check its options and try again.",
        prefix, command
    )
}

pub async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    let outcome = match error {
        poise::FrameworkError::Setup { error, .. } => {
            tracing::error!("Failed to start bot: {}", error);
            Ok(())
        }
        poise::FrameworkError::CommandCheckFailed { error, ctx, .. } => {
            if let Some(error) = error {
                tracing::error!(
                    command = %ctx.command().qualified_name,
                    "Check errored: {}",
                    error
                );
            }
            Ok(())
        }
        poise::FrameworkError::CooldownHit {
            remaining_cooldown,
            ctx,
            ..
        } => replies::notice(ctx, cooldown_message(remaining_cooldown)).await,
        poise::FrameworkError::ArgumentParse { error, input, ctx, .. } => {
            tracing::info!(
                command = %ctx.command().qualified_name,
                input = ?input,
                "Argument parse failed: {}",
                error
            );
            let prefix = match ctx {
                poise::Context::Prefix(prefix) => prefix.prefix.to_string(),
                poise::Context::Application(_) => "/".to_string(),
            };
            replies::notice(ctx, usage_message(&ctx.command().qualified_name, &prefix)).await
        }
        poise::FrameworkError::MissingBotPermissions {
            missing_permissions,
            ctx,
            ..
        } => {
            tracing::warn!(
                command = %ctx.command().qualified_name,
                missing = %missing_permissions,
                "Bot lacks permissions"
            );
            replies::notice(ctx, MISSING_BOT_PERMISSIONS).await
        }
        poise::FrameworkError::MissingUserPermissions { ctx, .. } => {
            replies::notice(ctx, DENIED_MESSAGE).await
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => replies::notice(ctx, GUILD_ONLY).await,
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                user = %ctx.author().name,
                "Command failed: {}",
                error
            );
            replies::private(ctx, GENERIC_FAILURE).await
        }
        other => poise::builtins::on_error(other).await.map_err(Error::from),
    };

    if let Err(e) = outcome {
        tracing::error!("Error while handling error: {}", e);
    }
}
