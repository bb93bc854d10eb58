// This is the entry point of the Discord bot.
//
// **Architecture Overview:**
// - `core/` = Business logic (platform-agnostic)
// - `infra/` = Implementations of core traits (files, HTTP APIs, subprocesses)
// - `discord/` = Discord-specific adapters (commands, events, voice)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::core::about::startup_banner;
use crate::core::ai::AiService;
use crate::core::counters::CounterService;
use crate::core::f1::F1Service;
use crate::core::fun::BeepGate;
use crate::core::music::SongQueue;
use crate::core::webhooks::WebhookService;
use crate::discord::commands::presence;
use crate::discord::Data;
use crate::infra::ai::GeminiClient;
use crate::infra::config::BotConfig;
use crate::infra::counters::FileCounterStore;
use crate::infra::f1::JolpicaClient;
use crate::infra::host::HostControl;
use crate::infra::http::ReqwestWebhookClient;
use crate::infra::media::YtDlpDownloader;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use songbird::SerenityInit;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = BotConfig::from_env()?;
    if config.owners.is_empty() {
        tracing::warn!("No owner ids configured, admin commands are disabled");
    } else {
        tracing::info!(owners = config.owners.len(), "Admin commands enabled");
    }

    tokio::fs::create_dir_all(&config.data_dir)
        .await
        .with_context(|| format!("creating data directory {}", config.data_dir.display()))?;
    tokio::fs::create_dir_all(&config.media_cache_dir)
        .await
        .with_context(|| format!("creating media cache {}", config.media_cache_dir.display()))?;
    if !config.example_audio.exists() {
        tracing::warn!(
            path = %config.example_audio.display(),
            "Example audio is missing, /play will refuse"
        );
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================
    // This is the "composition root" where we wire everything together.

    let counters = Arc::new(CounterService::new(FileCounterStore::new(&config.data_dir)));
    let f1 = Arc::new(F1Service::new(JolpicaClient::new()?));
    let webhooks = Arc::new(WebhookService::new(ReqwestWebhookClient::new()?));

    let ai = match &config.gemini_api_key {
        Some(key) => {
            tracing::info!(model = %config.gemini_model, "AI responses enabled");
            let client = GeminiClient::new(key.clone(), config.gemini_model.clone());
            Some(Arc::new(AiService::new(client)))
        }
        None => {
            tracing::info!("GEMINI_API_KEY not set, /ai is disabled");
            None
        }
    };

    let data = Data {
        owners: config.owners.clone(),
        counters,
        f1,
        ai,
        media: Arc::new(YtDlpDownloader::new(&config.media_cache_dir)),
        webhooks,
        host: Arc::new(HostControl::new(config.poweroff_enabled)),
        beep: Arc::new(BeepGate::new()),
        songs: Arc::new(SongQueue::new()),
        example_audio: config.example_audio.clone(),
    };

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT // Required to read message content
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::DIRECT_MESSAGES;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(config.prefix.clone()),
                ..Default::default()
            },
            on_error: |error| Box::pin(discord::events::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(discord::events::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                // Global registration can take a while to show up in clients.
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                tracing::info!(count = framework.options().commands.len(), "Commands registered");

                for line in startup_banner(&ready.user.tag()) {
                    tracing::info!("{}", line);
                }
                presence::on_ready(ctx);

                Ok(data)
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .register_songbird()
        .await
        .context("creating Discord client")?;

    client.start().await.context("running Discord client")?;
    Ok(())
}
