use anyhow::{Context, Result};
use aula_live::{
    create_router, AppState, Config, HttpAttendanceApi, MediaKind, MediaSourceFactory,
    SessionConfig, SessionController, StubDetector, TraceOverlaySink,
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "aula-live", about = "Live attendance-capture session service")]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "config/aula-live")]
    config: String,

    /// Use the synthetic test-pattern source instead of a camera
    #[arg(long)]
    test_pattern: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("attendance API at {}", cfg.api.base_url);

    let api = Arc::new(HttpAttendanceApi::new(
        &cfg.api.base_url,
        Duration::from_secs(cfg.api.timeout_secs),
    )?);

    let kind = if args.test_pattern {
        MediaKind::TestPattern
    } else {
        MediaKind::Camera
    };
    let media = MediaSourceFactory::create(kind).context("Failed to create media source")?;

    let session_config = SessionConfig::from(&cfg);
    let overlay = Arc::new(TraceOverlaySink::new(
        cfg.capture.width,
        cfg.capture.height,
    ));
    let controller = Arc::new(SessionController::new(
        session_config,
        api.clone(),
        media,
        Arc::new(StubDetector),
        overlay,
    ));

    let state = AppState::new(controller.clone(), api);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    info!("HTTP server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown(controller))
        .await?;

    Ok(())
}

/// Wait for ctrl-c, then tear down any live session so the camera is
/// released before the process exits.
async fn shutdown(controller: Arc<SessionController>) {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
    controller.stop().await;
}
