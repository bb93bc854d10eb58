// Voice commands. Playback itself lives in `discord::voice::player`; these
// commands only decide what to queue and what to tell the user.

use crate::core::media::{MediaDownloader, MediaError};
use crate::core::music::{Enqueued, QueuedTrack};
use crate::discord::replies;
use crate::discord::voice::player;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use std::sync::Arc;

const NOT_IN_VOICE: &str = "You are not in a voice channel.";
const BOT_NOT_IN_VOICE: &str = "I'm not in a voice channel.";
const NOTHING_PLAYING: &str = "Nothing is playing.";

/// The voice channel the caller is sitting in, according to the cache.
fn caller_voice_channel(ctx: Context<'_>) -> Option<serenity::ChannelId> {
    let guild = ctx.guild()?;
    guild
        .voice_states
        .get(&ctx.author().id)
        .and_then(|state| state.channel_id)
}

fn guild_id(ctx: Context<'_>) -> Result<serenity::GuildId, Error> {
    Ok(ctx.guild_id().ok_or("This command only works in servers")?)
}

/// Plays music on a voice channel
#[poise::command(slash_command, guild_only)]
pub async fn play(
    ctx: Context<'_>,
    #[description = "Channel to play music on"]
    #[channel_types("Voice", "Stage")]
    channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    if caller_voice_channel(ctx).is_none() {
        tracing::info!(user = %ctx.author().name, "Play refused, caller not in voice");
        ctx.say(NOT_IN_VOICE).await?;
        return Ok(());
    }

    let audio = ctx.data().example_audio.clone();
    if !audio.exists() {
        tracing::error!(path = %audio.display(), "Example audio file is missing");
        ctx.say("The example audio file is missing on the host.").await?;
        return Ok(());
    }

    ctx.defer().await?;
    player::join(ctx.serenity_context(), guild_id, channel.id).await?;

    let songs = Arc::clone(&ctx.data().songs);
    let track = QueuedTrack {
        title: "Example audio".to_string(),
        path: audio,
        duration: None,
        requested_by: ctx.author().id.get(),
    };
    if !songs.start_if_idle(guild_id.get(), track.clone()) {
        ctx.say("Already playing audio.").await?;
        return Ok(());
    }

    if let Err(e) =
        player::play(ctx.serenity_context(), Arc::clone(&songs), guild_id, &track).await
    {
        songs.clear(guild_id.get());
        return Err(e);
    }
    ctx.say(format!("Playing audio on <#{}>", channel.id)).await?;
    Ok(())
}

/// Plays the audio of a YouTube video, or queues it if something is playing
#[poise::command(slash_command, guild_only)]
pub async fn play_youtube(
    ctx: Context<'_>,
    #[description = "Link to the YouTube video"] url: String,
) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    let Some(voice_channel) = caller_voice_channel(ctx) else {
        ctx.say(NOT_IN_VOICE).await?;
        return Ok(());
    };

    ctx.defer().await?;
    if !player::is_connected(ctx.serenity_context(), guild_id).await? {
        player::join(ctx.serenity_context(), guild_id, voice_channel).await?;
    }

    let download = match ctx.data().media.download(&url).await {
        Ok(download) => download,
        Err(MediaError::UnsupportedUrl(_)) => {
            ctx.say("That is not a YouTube video link.").await?;
            return Ok(());
        }
        Err(e) => {
            tracing::error!(%url, "Download failed: {}", e);
            ctx.say("Could not download that video.").await?;
            return Ok(());
        }
    };

    let track = QueuedTrack {
        title: download.title,
        path: download.path,
        duration: Some(download.duration),
        requested_by: ctx.author().id.get(),
    };

    let songs = Arc::clone(&ctx.data().songs);
    match songs.enqueue(guild_id.get(), track.clone()) {
        Enqueued::StartNow => {
            if let Err(e) =
                player::play(ctx.serenity_context(), Arc::clone(&songs), guild_id, &track).await
            {
                songs.clear(guild_id.get());
                return Err(e);
            }
            ctx.say(format!(
                "Now playing: **{}** ({})",
                track.title,
                track.duration.as_deref().unwrap_or_default()
            ))
            .await?;
        }
        Enqueued::Position(position) => {
            ctx.say(format!("Queued **{}** at position {}.", track.title, position))
                .await?;
        }
    }
    Ok(())
}

/// Shows what is playing and what comes next
#[poise::command(slash_command, guild_only)]
pub async fn queue(ctx: Context<'_>) -> Result<(), Error> {
    let snapshot = ctx.data().songs.snapshot(guild_id(ctx)?.get());
    ctx.say(snapshot.render()).await?;
    Ok(())
}

/// Skips the current track
#[poise::command(slash_command, guild_only)]
pub async fn skip(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    let Some(current) = ctx.data().songs.now_playing(guild_id.get()) else {
        replies::private(ctx, NOTHING_PLAYING).await?;
        return Ok(());
    };

    // The end-of-track notifier starts whatever is next.
    player::stop_current(ctx.serenity_context(), guild_id).await?;
    ctx.say(format!("Skipped **{}**.", current.title)).await?;
    Ok(())
}

/// Stops playback and clears the queue
#[poise::command(slash_command, guild_only)]
pub async fn stop(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    let songs = &ctx.data().songs;
    if !songs.is_playing(guild_id.get()) {
        replies::private(ctx, NOTHING_PLAYING).await?;
        return Ok(());
    }

    let dropped = songs.clear(guild_id.get());
    player::stop_current(ctx.serenity_context(), guild_id).await?;
    ctx.say(format!(
        "Stopped playback and cleared {} queued track(s).",
        dropped
    ))
    .await?;
    Ok(())
}

/// Joins a voice channel
#[poise::command(slash_command, guild_only)]
pub async fn join_vc(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    let Some(channel_id) = caller_voice_channel(ctx) else {
        replies::private(ctx, NOT_IN_VOICE).await?;
        return Ok(());
    };

    player::join(ctx.serenity_context(), guild_id, channel_id).await?;
    replies::private(ctx, format!("Joined <#{}>", channel_id)).await
}

/// Leaves a voice channel.
#[poise::command(slash_command, guild_only)]
pub async fn leave_vc(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = guild_id(ctx)?;
    if player::leave(ctx.serenity_context(), &ctx.data().songs, guild_id).await? {
        tracing::info!(user = %ctx.author().name, "Left voice on request");
        ctx.say("Left the voice channel.").await?;
    } else {
        replies::private(ctx, BOT_NOT_IN_VOICE).await?;
    }
    Ok(())
}

const UPLOAD_LIMIT: u64 = 25 * 1024 * 1024;

/// Downloads the audio of a YouTube video and sends it as a file
#[poise::command(slash_command)]
pub async fn youtube_audio(
    ctx: Context<'_>,
    #[description = "Link to the YouTube video"] url: String,
) -> Result<(), Error> {
    ctx.defer().await?;

    let download = match ctx.data().media.download(&url).await {
        Ok(download) => download,
        Err(MediaError::UnsupportedUrl(_)) => {
            ctx.say("That is not a YouTube video link.").await?;
            return Ok(());
        }
        Err(e) => {
            tracing::error!(%url, "Download failed: {}", e);
            ctx.say("Could not download that video.").await?;
            return Ok(());
        }
    };

    let size = tokio::fs::metadata(&download.path).await?.len();
    if size > UPLOAD_LIMIT {
        tracing::info!(video_id = %download.video_id, size, "Audio too large to upload");
        ctx.say(format!(
            "**{}** is too large to upload to Discord.",
            download.title
        ))
        .await?;
        return Ok(());
    }

    let mut embed = serenity::CreateEmbed::new()
        .title(&download.title)
        .field("Duration", &download.duration, true);
    if let Some(thumbnail) = &download.thumbnail {
        embed = embed.thumbnail(thumbnail);
    }

    let attachment = serenity::CreateAttachment::path(&download.path).await?;
    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .attachment(attachment),
    )
    .await?;
    Ok(())
}
