// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "access/owner_list.rs"]
pub mod access;

#[path = "counters/counter_service.rs"]
pub mod counters;

#[path = "fun/mod.rs"]
pub mod fun;

#[path = "f1/mod.rs"]
pub mod f1;

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "media/mod.rs"]
pub mod media;

#[path = "music/song_queue.rs"]
pub mod music;

#[path = "webhooks/webhook_rules.rs"]
pub mod webhooks;

#[path = "about/about_texts.rs"]
pub mod about;
