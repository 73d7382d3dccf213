//! Axum server bootstrap.
//!
//! Holds the context struct handlers read from and the serve loop. Wiring
//! of concrete implementations happens in the CLI composition root, not
//! here.

use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tracing::info;

use yomiage_core::ports::{AppEventEmitter, ProfileStorePort, SpeechPort};
use yomiage_core::text::NameMode;
use yomiage_voice::VoicevoxClient;

use crate::routes::build_router;
use crate::state::AppState;

/// CORS configuration for the intake server.
#[derive(Debug, Clone, Default)]
pub enum CorsConfig {
    /// Allow all origins. The server binds to loopback; the permissive
    /// default lets browser-hosted game clients post to it.
    #[default]
    AllowAll,
    /// Allow specific origins.
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// CORS configuration.
    pub cors: CorsConfig,
}

/// Application context for the Axum adapter.
///
/// Everything a handler can reach: the playback controller, the profile
/// library, the engine catalog, the event emitter, and the configured name
/// mode applied by the intake text pipeline.
pub struct AxumContext {
    pub speech: Arc<dyn SpeechPort>,
    pub profiles: Arc<dyn ProfileStorePort>,
    pub engine: Arc<VoicevoxClient>,
    pub emitter: Arc<dyn AppEventEmitter>,
    pub name_mode: NameMode,
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ServerConfig, context: AppState) -> Result<()> {
    let app = build_router(context, &config.cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Intake server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
