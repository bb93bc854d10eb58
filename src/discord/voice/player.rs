// Voice playback glue between songbird and the per-guild `SongQueue`.
//
// Every track we start gets a `TrackEndNotifier`. When the track ends (or
// fails to play) the notifier advances the queue and starts the next track,
// which gets its own notifier, and so on until the queue is empty.

use crate::core::music::{QueuedTrack, SongQueue};
use crate::discord::commands::presence;
use crate::discord::Error;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use songbird::events::{Event, EventContext, EventHandler as VoiceEventHandler, TrackEvent};
use songbird::input::File as AudioFile;
use songbird::Songbird;
use std::sync::Arc;

pub async fn manager(ctx: &serenity::Context) -> Result<Arc<Songbird>, Error> {
    songbird::get(ctx)
        .await
        .ok_or_else(|| "Voice client was not registered with the gateway client".into())
}

/// Joins (or moves to) `channel_id` in `guild_id`.
pub async fn join(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    channel_id: serenity::ChannelId,
) -> Result<(), Error> {
    let manager = manager(ctx).await?;
    manager.join(guild_id, channel_id).await?;
    tracing::info!(
        guild_id = guild_id.get(),
        channel_id = channel_id.get(),
        "Joined voice channel"
    );
    Ok(())
}

pub async fn is_connected(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
) -> Result<bool, Error> {
    Ok(manager(ctx).await?.get(guild_id).is_some())
}

/// Leaves voice in `guild_id`. Returns false when the bot wasn't connected.
pub async fn leave(
    ctx: &serenity::Context,
    songs: &SongQueue,
    guild_id: serenity::GuildId,
) -> Result<bool, Error> {
    let manager = manager(ctx).await?;
    if manager.get(guild_id).is_none() {
        return Ok(false);
    }

    // Forget the queue first so the end notifier has nothing left to start.
    songs.clear(guild_id.get());
    manager.remove(guild_id).await?;
    presence::reset_status(ctx, songs);
    Ok(true)
}

/// Stops whatever is playing. With a non-empty queue the end notifier moves on.
pub async fn stop_current(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
) -> Result<(), Error> {
    if let Some(call) = manager(ctx).await?.get(guild_id) {
        call.lock().await.stop();
    }
    Ok(())
}

/// Starts `track` on the guild's current voice connection.
pub async fn play(
    ctx: &serenity::Context,
    songs: Arc<SongQueue>,
    guild_id: serenity::GuildId,
    track: &QueuedTrack,
) -> Result<(), Error> {
    let manager = manager(ctx).await?;
    let call = manager
        .get(guild_id)
        .ok_or("I'm not in a voice channel.")?;

    let mut handler = call.lock().await;
    let handle = handler.play_input(AudioFile::new(track.path.clone()).into());

    let notifier = TrackEndNotifier {
        ctx: ctx.clone(),
        songs,
        guild_id,
    };
    handle.add_event(Event::Track(TrackEvent::End), notifier.clone())?;
    handle.add_event(Event::Track(TrackEvent::Error), notifier)?;

    presence::show_now_playing(ctx, &track.title);
    tracing::info!(guild_id = guild_id.get(), title = %track.title, "Playing track");
    Ok(())
}

#[derive(Clone)]
struct TrackEndNotifier {
    ctx: serenity::Context,
    songs: Arc<SongQueue>,
    guild_id: serenity::GuildId,
}

#[async_trait]
impl VoiceEventHandler for TrackEndNotifier {
    async fn act(&self, event: &EventContext<'_>) -> Option<Event> {
        if let EventContext::Track(states) = event {
            for (state, _) in states.iter() {
                if let songbird::tracks::PlayMode::Errored(err) = &state.playing {
                    tracing::warn!(guild_id = self.guild_id.get(), "Track failed: {:?}", err);
                }
            }
        }

        match self.songs.advance(self.guild_id.get()) {
            Some(next) => {
                let started = play(&self.ctx, Arc::clone(&self.songs), self.guild_id, &next).await;
                if let Err(e) = started {
                    tracing::error!(
                        guild_id = self.guild_id.get(),
                        "Could not start next track: {}",
                        e
                    );
                    self.songs.clear(self.guild_id.get());
                    presence::reset_status(&self.ctx, &self.songs);
                }
            }
            None => {
                tracing::debug!(guild_id = self.guild_id.get(), "Queue finished");
                presence::reset_status(&self.ctx, &self.songs);
            }
        }
        None
    }
}
