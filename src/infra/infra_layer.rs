// The infra module contains implementations of core traits.
// Each feature implementation goes in its own submodule.

#[path = "config/env_config.rs"]
pub mod config;

#[path = "counters/file_counter_store.rs"]
pub mod counters;

#[path = "f1/jolpica_client.rs"]
pub mod f1;

#[path = "ai/mod.rs"]
pub mod ai;

#[path = "media/mod.rs"]
pub mod media;

#[path = "http/mod.rs"]
pub mod http;

#[path = "host/host_control.rs"]
pub mod host;
