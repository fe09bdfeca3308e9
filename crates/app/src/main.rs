//! Headless generation runner.
//!
//! Submits one generation request to a local backend, logs streamed
//! progress, and exports the downloaded asset:
//!
//! ```text
//! aetherforge "<prompt>" [character|asset|environment]
//! ```

use std::path::Path;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aetherforge_client::{GenerationEvent, GenerationSession};
use aetherforge_core::generation::{GenerationRequest, SubjectType};

use config::AppConfig;

mod config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aetherforge=info,aetherforge_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = AppConfig::from_env();
    tracing::info!(backend_url = %config.backend_url, "Loaded configuration");

    // --- Arguments ---
    let mut args = std::env::args().skip(1);
    let prompt = args.next().unwrap_or_default();
    let subject_type = match args.next() {
        Some(s) => SubjectType::parse(&s)?,
        None => SubjectType::Asset,
    };
    let request = GenerationRequest::new(prompt, subject_type);

    // --- Session ---
    let session = GenerationSession::new(config.backend_url.clone());

    let mut events = session.subscribe();
    let event_logger = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                GenerationEvent::Progress { percent, message } => {
                    tracing::info!(percent, message = %message, "Progress");
                }
                GenerationEvent::Completed {
                    filename,
                    size_bytes,
                } => {
                    tracing::info!(filename = %filename, size_bytes, "Generation complete");
                }
                GenerationEvent::Failed { error } => {
                    tracing::error!(error = %error, "Generation failed");
                }
            }
        }
    });

    let outcome = session.generate(&request).await?;

    match outcome {
        Some(asset) => {
            let path = asset.save_to(Path::new(&config.output_dir)).await?;
            tracing::info!(path = %path.display(), "Asset exported");
        }
        None => {
            tracing::warn!("Stream ended without producing an asset");
        }
    }

    drop(session);
    let _ = event_logger.await;
    Ok(())
}
