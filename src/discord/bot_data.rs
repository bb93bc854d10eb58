// Shared state handed to every command through `ctx.data()`.

use crate::core::access::OwnerList;
use crate::core::ai::AiService;
use crate::core::counters::CounterService;
use crate::core::f1::F1Service;
use crate::core::fun::BeepGate;
use crate::core::music::SongQueue;
use crate::core::webhooks::WebhookService;
use crate::infra::ai::GeminiClient;
use crate::infra::counters::FileCounterStore;
use crate::infra::f1::JolpicaClient;
use crate::infra::host::HostControl;
use crate::infra::http::ReqwestWebhookClient;
use crate::infra::media::YtDlpDownloader;
use std::path::PathBuf;
use std::sync::Arc;

pub struct Data {
    pub owners: OwnerList,
    pub counters: Arc<CounterService<FileCounterStore>>,
    pub f1: Arc<F1Service<JolpicaClient>>,
    /// `None` when no API key is configured.
    pub ai: Option<Arc<AiService<GeminiClient>>>,
    pub media: Arc<YtDlpDownloader>,
    pub webhooks: Arc<WebhookService<ReqwestWebhookClient>>,
    pub host: Arc<HostControl>,
    pub beep: Arc<BeepGate>,
    pub songs: Arc<SongQueue>,
    pub example_audio: PathBuf,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
