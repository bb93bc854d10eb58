// Discord layer - commands, checks, event handlers and voice glue.

#[path = "bot_data.rs"]
pub mod bot_data;

#[path = "replies.rs"]
pub mod replies;

#[path = "checks/owner_check.rs"]
pub mod checks;

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "events/mod.rs"]
pub mod events;

#[path = "voice/mod.rs"]
pub mod voice;

pub use bot_data::{Context, Data, Error};
