// Bot presence: the startup status, the "Listening to" activity while music
// plays, and the status buttons of `/change_status`.
//
// Only the activity changes while music plays; the online status picked by an
// owner stays as it is.

use crate::core::music::SongQueue;
use poise::serenity_prelude as serenity;

/// Shows the track being played in the member list. Discord already prefixes
/// the activity with "Listening to".
pub fn show_now_playing(ctx: &serenity::Context, title: &str) {
    ctx.set_activity(Some(serenity::ActivityData::listening(title)));
}

/// Clears the activity, unless some guild still has a track playing.
pub fn reset_status(ctx: &serenity::Context, songs: &SongQueue) {
    if songs.any_playing() {
        return;
    }
    ctx.set_activity(None);
}

/// Called once the bot is ready. Starts out as Do Not Disturb with no activity.
pub fn on_ready(ctx: &serenity::Context) {
    ctx.set_presence(None, serenity::OnlineStatus::DoNotDisturb);
}

/// Button id, label, style and status for `/change_status`.
pub const STATUS_CHOICES: [(&str, &str, serenity::ButtonStyle, serenity::OnlineStatus); 4] = [
    (
        "status_online",
        "Online",
        serenity::ButtonStyle::Success,
        serenity::OnlineStatus::Online,
    ),
    (
        "status_dnd",
        "Do Not Disturb",
        serenity::ButtonStyle::Danger,
        serenity::OnlineStatus::DoNotDisturb,
    ),
    (
        "status_idle",
        "Idle",
        serenity::ButtonStyle::Secondary,
        serenity::OnlineStatus::Idle,
    ),
    (
        "status_invisible",
        "Invisible (offline)",
        serenity::ButtonStyle::Primary,
        serenity::OnlineStatus::Invisible,
    ),
];

pub fn status_name(status: serenity::OnlineStatus) -> &'static str {
    match status {
        serenity::OnlineStatus::Online => "Online",
        serenity::OnlineStatus::DoNotDisturb => "Do Not Disturb",
        serenity::OnlineStatus::Idle => "Idle",
        serenity::OnlineStatus::Invisible | serenity::OnlineStatus::Offline => "Invisible",
        _ => "Unknown",
    }
}

/// Sets only the online status, keeping whatever activity is shown.
pub fn set_status(ctx: &serenity::Context, status: serenity::OnlineStatus) {
    match status {
        serenity::OnlineStatus::Online => ctx.online(),
        serenity::OnlineStatus::DoNotDisturb => ctx.dnd(),
        serenity::OnlineStatus::Idle => ctx.idle(),
        _ => ctx.invisible(),
    }
}
