use merry_avatar::{
    logger::{self, LoggerConfig},
    AppConfig, CharSurface, GeminiClient, ImageClient, Platform, Snowfall, UploadFile, Viewport,
    WorkflowController, WorkflowState,
};
use std::env;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::development().with_env_level())?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = AppConfig::from_env();
    logger::log_config_info(&config);

    log::info!("🖼️  Available image models:");
    for (id, name, provider) in ImageClient::supported_models() {
        log::info!("  {} - {} ({})", id, name, provider);
    }

    let path = match env::args().nth(1) {
        Some(path) => path,
        None => {
            log::error!("❌ Usage: merry-avatar <photo> [output-dir]");
            return Ok(());
        }
    };
    let output_dir = env::args().nth(2).unwrap_or_else(|| ".".to_string());

    let gemini = GeminiClient::new(config.gemini.clone())?;
    let platform = Platform::headless(&output_dir);
    let controller = WorkflowController::new(gemini.generator(), platform, config.workflow.clone());

    // Snow keeps falling in the background while the workflow runs.
    let (viewport_tx, viewport_rx) = watch::channel(Viewport::new(640.0, 256.0));
    let snowfall = Snowfall::new(config.snowfall.clone())
        .start(CharSurface::new(640, 256, 8.0, 16.0), viewport_rx);

    let bytes = tokio::fs::read(&path).await?;
    let file = UploadFile::new(path.clone(), UploadFile::mime_from_extension(&path), bytes);

    match controller.submit_upload(file) {
        Ok(pending) => pending.await?,
        Err(e) => {
            log::error!("❌ Upload rejected: {}", e);
            snowfall.stop().await;
            return Ok(());
        }
    }

    if let Some(pending) = controller.request_generation()? {
        let (joined, _) = futures::future::join(pending, async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            // Terminal got wider while we waited.
            let _ = viewport_tx.send(Viewport::new(800.0, 256.0));
        })
        .await;
        joined?;
    }

    match controller.state() {
        WorkflowState::Success => {
            if let Some(filename) = controller.download().await? {
                log::info!("🎉 Festive avatar saved as {}", filename);
            }
            controller.share().await;
        }
        WorkflowState::Error => {
            log::error!("❌ Oh no! The elves are confused. Try a different photo.");
        }
        state => log::warn!("Unexpected final state: {}", state),
    }

    log::info!("❄️  Snowfall rendered {} frames", snowfall.frames_rendered());
    if let Some(surface) = snowfall.stop().await {
        println!("{}", surface.render());
    }

    Ok(())
}
