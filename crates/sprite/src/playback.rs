//! Animation playback loop.
//!
//! [`Player`] owns a repeating timer task that advances the frame
//! cursor `(i + 1) % frame_count` each tick and publishes it on a
//! [`watch`] channel. The task holds a [`CancellationToken`]: stopping
//! playback, or dropping the player, cancels the timer so it can never
//! fire after its owner is gone. Changing the fps takes effect on the
//! next tick.

use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::error::SpriteError;

/// Default playback rate.
pub const DEFAULT_FPS: u32 = 10;

/// Minimum allowed playback rate.
pub const MIN_FPS: u32 = 1;

/// Maximum allowed playback rate.
pub const MAX_FPS: u32 = 30;

/// Validate that a playback rate is within allowed bounds.
pub fn validate_fps(fps: u32) -> Result<(), SpriteError> {
    if !(MIN_FPS..=MAX_FPS).contains(&fps) {
        return Err(SpriteError::Validation(format!(
            "fps {fps} is outside the allowed range [{MIN_FPS}, {MAX_FPS}]"
        )));
    }
    Ok(())
}

/// Time between cursor advances at a given rate.
pub fn tick_interval(fps: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(fps.max(1)))
}

/// Parameters for starting playback.
#[derive(Debug, Clone, Copy)]
pub struct PlayerConfig {
    pub fps: u32,
    /// Number of frames to cycle through. Playback wraps indefinitely;
    /// a frame-count change requires stop + restart.
    pub frame_count: usize,
    /// Cursor position to start from.
    pub start_index: usize,
}

/// A running playback loop with an owned cancellation handle.
pub struct Player {
    cursor_rx: watch::Receiver<usize>,
    fps_tx: watch::Sender<u32>,
    cancel: CancellationToken,
    task: Option<tokio::task::JoinHandle<()>>,
}

impl Player {
    /// Start the playback timer task.
    pub fn start(config: PlayerConfig) -> Result<Self, SpriteError> {
        validate_fps(config.fps)?;
        if config.frame_count == 0 {
            return Err(SpriteError::Validation(
                "Playback requires at least one frame".to_string(),
            ));
        }
        if config.start_index >= config.frame_count {
            return Err(SpriteError::Validation(format!(
                "Start index {} out of range ({} frames)",
                config.start_index, config.frame_count
            )));
        }

        let (cursor_tx, cursor_rx) = watch::channel(config.start_index);
        let (fps_tx, fps_rx) = watch::channel(config.fps);
        let cancel = CancellationToken::new();
        let task_cancel = cancel.child_token();

        let frame_count = config.frame_count;
        let mut index = config.start_index;
        let task = tokio::spawn(async move {
            loop {
                // Re-read the rate each iteration: an fps change takes
                // effect on the next tick, not retroactively.
                let tick = tick_interval(*fps_rx.borrow());
                tokio::select! {
                    _ = task_cancel.cancelled() => return,
                    _ = tokio::time::sleep(tick) => {
                        index = (index + 1) % frame_count;
                        cursor_tx.send_replace(index);
                    }
                }
            }
        });

        Ok(Self {
            cursor_rx,
            fps_tx,
            cancel,
            task: Some(task),
        })
    }

    /// Watch the advancing cursor.
    pub fn cursor(&self) -> watch::Receiver<usize> {
        self.cursor_rx.clone()
    }

    /// Change the playback rate; applies from the next tick.
    pub fn set_fps(&self, fps: u32) -> Result<(), SpriteError> {
        validate_fps(fps)?;
        self.fps_tx.send_replace(fps);
        Ok(())
    }

    /// Stop playback: cancels the timer task and waits for it to
    /// exit. Returns the cursor position playback stopped at.
    pub async fn stop(mut self) -> usize {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        *self.cursor_rx.borrow()
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        // Teardown must always release the timer.
        self.cancel.cancel();
    }
}
