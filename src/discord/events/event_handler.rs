// Gateway events that aren't commands.

use crate::discord::commands::presence;
use crate::discord::{Data, Error};
use poise::serenity_prelude as serenity;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            if new_message.author.id == ctx.cache.current_user().id {
                return Ok(());
            }
            tracing::debug!(
                author = %new_message.author.name,
                guild_id = ?new_message.guild_id.map(|id| id.get()),
                content = %new_message.content,
                "Message"
            );
        }
        serenity::FullEvent::VoiceStateUpdate { old, new } => {
            let bot_id = ctx.cache.current_user().id;
            let was_connected = old.as_ref().and_then(|state| state.channel_id).is_some();
            if new.user_id != bot_id || new.channel_id.is_some() || !was_connected {
                return Ok(());
            }

            // Kicked or disconnected from voice by someone else.
            if let Some(guild_id) = new.guild_id {
                let dropped = data.songs.clear(guild_id.get());
                presence::reset_status(ctx, &data.songs);
                tracing::info!(guild_id = guild_id.get(), dropped, "Disconnected from voice");
            }
        }
        _ => {}
    }

    Ok(())
}
