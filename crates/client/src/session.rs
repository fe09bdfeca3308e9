//! Generation session: drives one request from submit to downloaded
//! asset.
//!
//! [`GenerationSession`] owns the observable state for generation runs:
//! a [`watch`] channel carrying the current [`GenerationStatus`] and a
//! [`broadcast`] channel of [`GenerationEvent`]s. [`generate`]
//! consumes the backend's progress stream line by line and resolves to
//! a [`GeneratedAsset`] on completion.
//!
//! [`generate`]: GenerationSession::generate

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::sync::{broadcast, watch};

use aetherforge_core::generation::{GenerationRequest, SubjectType};
use aetherforge_core::naming::export_filename;
use aetherforge_core::types::Timestamp;
use aetherforge_core::CoreError;

use crate::api::{ForgeApi, ForgeApiError};
use crate::events::GenerationEvent;
use crate::messages::{file_basename, parse_line, ProgressEvent};
use crate::stream::LineDecoder;

/// Broadcast channel capacity for generation events.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Observable state of the current generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationStatus {
    /// Whether a run is currently in flight.
    pub generating: bool,
    /// Latest progress percentage received (0-100).
    pub percent: u8,
    /// Latest status message received.
    pub message: String,
}

impl Default for GenerationStatus {
    fn default() -> Self {
        Self {
            generating: false,
            percent: 0,
            message: String::new(),
        }
    }
}

/// A successfully generated and downloaded asset.
///
/// Created only when a `complete` event arrives and the download
/// succeeds; replaced wholesale on the next run.
#[derive(Debug, Clone)]
pub struct GeneratedAsset {
    pub subject_type: SubjectType,
    pub prompt: String,
    /// Bare filename the asset was downloaded under.
    pub filename: String,
    /// Raw GLB bytes.
    pub data: Vec<u8>,
    pub created_at: Timestamp,
}

impl GeneratedAsset {
    /// Write the asset into `dir` under the export naming convention
    /// (`aetherforge_{type}_{epoch_ms}.glb`). Returns the full path.
    pub async fn save_to(&self, dir: &Path) -> Result<PathBuf, std::io::Error> {
        let name = export_filename(self.subject_type, self.created_at.timestamp_millis());
        let path = dir.join(name);
        tokio::fs::write(&path, &self.data).await?;
        Ok(path)
    }
}

/// Errors from a generation run.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The request failed local validation before submission.
    #[error("Invalid request: {0}")]
    Invalid(#[from] CoreError),

    /// Submitting the request or reading the stream failed at the
    /// HTTP level.
    #[error("{0}")]
    Api(#[from] ForgeApiError),

    /// The backend reported an explicit `error` stage.
    #[error("Generation failed: {0}")]
    Backend(String),

    /// The asset download after a `complete` event failed.
    #[error("Failed to download generated asset: {0}")]
    Download(ForgeApiError),
}

/// Drives generation runs against one backend.
pub struct GenerationSession {
    api: ForgeApi,
    status_tx: watch::Sender<GenerationStatus>,
    event_tx: broadcast::Sender<GenerationEvent>,
}

impl GenerationSession {
    /// Create a session for the backend at `base_url`.
    pub fn new(base_url: String) -> Self {
        Self::with_api(ForgeApi::new(base_url))
    }

    /// Create a session around an existing [`ForgeApi`].
    pub fn with_api(api: ForgeApi) -> Self {
        let (status_tx, _) = watch::channel(GenerationStatus::default());
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            status_tx,
            event_tx,
        }
    }

    /// Subscribe to generation events.
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.event_tx.subscribe()
    }

    /// Watch the observable generation status.
    pub fn status(&self) -> watch::Receiver<GenerationStatus> {
        self.status_tx.subscribe()
    }

    /// Run one generation to completion.
    ///
    /// Returns `Ok(Some(asset))` when the stream reached a `complete`
    /// event and the asset downloaded, `Ok(None)` when the stream
    /// ended without a terminal event, and `Err` on validation,
    /// transport, backend, or download failure. The status always
    /// resets to idle afterwards, whatever the outcome.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<GeneratedAsset>, GenerateError> {
        request.validate()?;

        self.set_status(true, 0, "Initializing...");
        let result = self.run(request).await;
        self.set_status(false, 0, "");

        if let Err(e) = &result {
            tracing::error!(error = %e, "Generation run failed");
            let _ = self.event_tx.send(GenerationEvent::Failed {
                error: e.to_string(),
            });
        }
        result
    }

    // ---- private helpers ----

    async fn run(
        &self,
        request: &GenerationRequest,
    ) -> Result<Option<GeneratedAsset>, GenerateError> {
        tracing::info!(
            subject_type = %request.subject_type,
            prompt = %request.prompt,
            "Submitting generation request",
        );

        let response = self.api.submit_generation(request).await?;
        let mut stream = response.bytes_stream();
        let mut decoder = LineDecoder::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ForgeApiError::from)?;
            for line in decoder.push(&chunk) {
                if let Some(asset) = self.handle_line(&line, request).await? {
                    // Terminal event reached; any remaining stream
                    // bytes are ignored.
                    return Ok(Some(asset));
                }
            }
        }

        if let Some(line) = decoder.finish() {
            if let Some(asset) = self.handle_line(&line, request).await? {
                return Ok(Some(asset));
            }
        }

        tracing::warn!("Stream ended without a terminal event");
        Ok(None)
    }

    /// Dispatch a single stream line. Returns the asset once a
    /// `complete` event has been handled.
    async fn handle_line(
        &self,
        line: &str,
        request: &GenerationRequest,
    ) -> Result<Option<GeneratedAsset>, GenerateError> {
        let event = match parse_line(line) {
            Ok(Some(event)) => event,
            Ok(None) => return Ok(None),
            Err(e) => {
                // Partial or malformed lines must not abort the run.
                tracing::warn!(error = %e, raw_line = %line, "Skipping unparseable stream line");
                return Ok(None);
            }
        };

        match event {
            ProgressEvent::Progress { percent, message } => {
                tracing::debug!(percent, message = %message, "Generation progress");
                self.set_status(true, percent, &message);
                let _ = self
                    .event_tx
                    .send(GenerationEvent::Progress { percent, message });
                Ok(None)
            }
            ProgressEvent::Error { message } => Err(GenerateError::Backend(message)),
            ProgressEvent::Complete { file, percent } => {
                if let Some(percent) = percent {
                    self.set_status(true, percent, "Downloading asset...");
                }

                let filename = file_basename(&file);
                tracing::info!(filename, "Generation complete, downloading asset");

                let data = self
                    .api
                    .download_asset(filename)
                    .await
                    .map_err(GenerateError::Download)?;

                let asset = GeneratedAsset {
                    subject_type: request.subject_type,
                    prompt: request.prompt.clone(),
                    filename: filename.to_string(),
                    data,
                    created_at: chrono::Utc::now(),
                };

                tracing::info!(
                    filename = %asset.filename,
                    size_bytes = asset.data.len(),
                    "Asset downloaded",
                );
                let _ = self.event_tx.send(GenerationEvent::Completed {
                    filename: asset.filename.clone(),
                    size_bytes: asset.data.len(),
                });
                Ok(Some(asset))
            }
        }
    }

    fn set_status(&self, generating: bool, percent: u8, message: &str) {
        self.status_tx.send_replace(GenerationStatus {
            generating,
            percent,
            message: message.to_string(),
        });
    }
}
