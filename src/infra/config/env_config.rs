// Startup configuration read from the process environment (and `.env`).
//
// `BotConfig::from_lookup` takes any key -> value function so the parsing can be
// tested without touching the real environment.

use crate::core::access::OwnerList;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PREFIX: &str = "!";
pub const DEFAULT_GEMINI_MODEL: &str = "gemma-3-27b-it";
pub const DEFAULT_DATA_DIR: &str = "tmp";
pub const DEFAULT_MEDIA_CACHE_DIR: &str = "/tmp";
pub const DEFAULT_EXAMPLE_AUDIO: &str = "assets/audio/example.mp3";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing DISCORD_BOT_TOKEN environment variable! Create a .env file with your bot token.")]
    MissingToken,

    #[error("{key} contains an invalid user id: {value:?}")]
    InvalidUserId { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    pub owners: OwnerList,
    pub prefix: String,
    pub poweroff_enabled: bool,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub data_dir: PathBuf,
    pub media_cache_dir: PathBuf,
    pub example_audio: PathBuf,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset.
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let token = get("DISCORD_BOT_TOKEN")
            .or_else(|| get("DISCORD_TOKEN"))
            .ok_or(ConfigError::MissingToken)?;

        let mut owner_ids = match get("DISCORD_ADMIN_IDS") {
            Some(raw) => parse_id_list("DISCORD_ADMIN_IDS", &raw)?,
            None => Vec::new(),
        };
        if let Some(raw) = get("DISCORD_OWNER_ID") {
            owner_ids.push(parse_id("DISCORD_OWNER_ID", &raw)?);
        }

        Ok(Self {
            token,
            owners: OwnerList::new(owner_ids),
            prefix: get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string()),
            // Anything other than the exact string keeps the command locked.
            poweroff_enabled: lookup("POWEROFF_COMMAND").as_deref() == Some("True"),
            gemini_api_key: get("GEMINI_API_KEY"),
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            data_dir: get("BOT_DATA_DIR")
                .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string())
                .into(),
            media_cache_dir: get("MEDIA_CACHE_DIR")
                .unwrap_or_else(|| DEFAULT_MEDIA_CACHE_DIR.to_string())
                .into(),
            example_audio: get("EXAMPLE_AUDIO_PATH")
                .unwrap_or_else(|| DEFAULT_EXAMPLE_AUDIO.to_string())
                .into(),
        })
    }
}

fn parse_id(key: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::InvalidUserId {
            key,
            value: raw.trim().to_string(),
        })
}

fn parse_id_list(key: &'static str, raw: &str) -> Result<Vec<u64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| parse_id(key, part))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<BotConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BotConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("DISCORD_BOT_TOKEN", "abc")]).unwrap();
        assert_eq!(cfg.token, "abc");
        assert_eq!(cfg.prefix, "!");
        assert!(cfg.owners.is_empty());
        assert!(!cfg.poweroff_enabled);
        assert_eq!(cfg.gemini_api_key, None);
        assert_eq!(cfg.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(cfg.data_dir, PathBuf::from("tmp"));
        assert_eq!(cfg.media_cache_dir, PathBuf::from("/tmp"));
        assert_eq!(cfg.example_audio, PathBuf::from(DEFAULT_EXAMPLE_AUDIO));
    }

    #[test]
    fn test_missing_token() {
        assert_eq!(config(&[]).unwrap_err(), ConfigError::MissingToken);
        assert_eq!(
            config(&[("DISCORD_BOT_TOKEN", "  ")]).unwrap_err(),
            ConfigError::MissingToken
        );
    }

    #[test]
    fn test_legacy_token_name() {
        let cfg = config(&[("DISCORD_TOKEN", "legacy")]).unwrap();
        assert_eq!(cfg.token, "legacy");
    }

    #[test]
    fn test_owner_ids_are_merged() {
        let cfg = config(&[
            ("DISCORD_BOT_TOKEN", "abc"),
            ("DISCORD_ADMIN_IDS", " 11, 22 ,,"),
            ("DISCORD_OWNER_ID", "33"),
        ])
        .unwrap();
        assert_eq!(cfg.owners.len(), 3);
        assert!(cfg.owners.is_owner(11));
        assert!(cfg.owners.is_owner(22));
        assert!(cfg.owners.is_owner(33));
    }

    #[test]
    fn test_invalid_owner_id_is_rejected() {
        let err = config(&[
            ("DISCORD_BOT_TOKEN", "abc"),
            ("DISCORD_ADMIN_IDS", "11,not-a-number"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidUserId {
                key: "DISCORD_ADMIN_IDS",
                value: "not-a-number".to_string()
            }
        );
    }

    #[test]
    fn test_poweroff_needs_exact_value() {
        let on = config(&[("DISCORD_BOT_TOKEN", "a"), ("POWEROFF_COMMAND", "True")]).unwrap();
        let off = config(&[("DISCORD_BOT_TOKEN", "a"), ("POWEROFF_COMMAND", "true")]).unwrap();
        assert!(on.poweroff_enabled);
        assert!(!off.poweroff_enabled);
    }
}
