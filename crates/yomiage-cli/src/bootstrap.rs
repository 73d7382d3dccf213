//! Server bootstrap - the composition root.
//!
//! This is the ONLY place where infrastructure is wired together: the
//! profile library, the VOICEVOX client, the local audio sink, the playback
//! controller, and the intake server.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use yomiage_axum::{AxumContext, CorsConfig, ServerConfig, serve};
use yomiage_core::Settings;
use yomiage_core::events::AppEvent;
use yomiage_core::ports::{AppEventEmitter, ProfileStorePort, SpeechPort};
use yomiage_profiles::ProfileLibrary;
use yomiage_voice::{AudioSink, LocalAudioSink, SpeechService, SynthesisEngine, VoicevoxClient};

use crate::parser::Cli;

/// Event emitter that forwards controller events to the log.
struct LogEmitter;

impl AppEventEmitter for LogEmitter {
    fn emit(&self, event: AppEvent) {
        match &event {
            AppEvent::SpeakFailed { speaker, error } => {
                tracing::warn!(speaker = %speaker, error = %error, "speak failed");
            }
            _ => tracing::debug!(?event, "app event"),
        }
    }
}

/// Initialise tracing from `RUST_LOG`, defaulting to info (debug with
/// `--verbose`).
pub fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Fold CLI flags into the shared settings shape.
fn settings_from(cli: &Cli) -> Settings {
    Settings {
        engine_url: Some(cli.engine_url.clone()),
        intake_host: Some(cli.host.clone()),
        intake_port: Some(cli.port),
        name_mode: Some(cli.name_mode.into()),
        dedup_enabled: Some(!cli.no_dedup),
    }
}

/// Wire everything together and serve until stopped.
pub async fn run(cli: Cli) -> Result<()> {
    let settings = settings_from(&cli);

    let profiles: Arc<dyn ProfileStorePort> = Arc::new(
        ProfileLibrary::open(&cli.profiles_dir, &cli.profile)
            .context("failed to open profile library")?,
    );

    let engine = Arc::new(
        VoicevoxClient::new(settings.effective_engine_url())
            .context("failed to build engine client")?,
    );

    let sink: Arc<dyn AudioSink> = Arc::new(
        LocalAudioSink::new().context("failed to initialise audio output")?,
    );

    let emitter: Arc<dyn AppEventEmitter> = Arc::new(LogEmitter);

    let speech: Arc<dyn SpeechPort> = Arc::new(SpeechService::spawn(
        Arc::clone(&engine) as Arc<dyn SynthesisEngine>,
        sink,
        Arc::clone(&profiles),
        Arc::clone(&emitter),
        settings.effective_dedup_enabled(),
    ));

    let context = Arc::new(AxumContext {
        speech,
        profiles,
        engine,
        emitter,
        name_mode: settings.effective_name_mode(),
    });

    info!(
        profile = %cli.profile,
        engine_url = %settings.effective_engine_url(),
        "yomiage starting"
    );

    serve(
        ServerConfig {
            host: settings.effective_intake_host().to_string(),
            port: settings.effective_intake_port(),
            cors: CorsConfig::AllowAll,
        },
        context,
    )
    .await
}
