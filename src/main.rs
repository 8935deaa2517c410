use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sweep_report::assets::load_branding;
use sweep_report::config::ServerConfig;
use sweep_report::server::{router, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sweep_report=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        error!(error = %err, "report engine stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;

    // Resolved once, shared by every request.
    let (branding, diagnostics) = load_branding(&config.engine).await;
    for diagnostic in &diagnostics {
        warn!(%diagnostic, "branding degraded");
    }

    let app = router(AppState {
        branding: Arc::new(branding),
    });

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("report engine listening on http://{}", config.addr);

    axum::serve(listener, app).await?;
    Ok(())
}
