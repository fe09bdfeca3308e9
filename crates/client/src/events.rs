//! Client-level events emitted during a generation run.
//!
//! These represent the state changes a consumer (UI shell, CLI) cares
//! about, produced by the session after interpreting raw stream lines.

use serde::Serialize;

/// A high-level event from one generation run.
#[derive(Debug, Clone, Serialize)]
pub enum GenerationEvent {
    /// The pipeline reported progress.
    Progress {
        /// Completion percentage (0-100), latest value received.
        percent: u8,
        /// Status message accompanying the update.
        message: String,
    },

    /// The run completed and the asset was downloaded.
    Completed {
        /// Bare filename of the downloaded asset.
        filename: String,
        /// Downloaded size in bytes.
        size_bytes: usize,
    },

    /// The run failed.
    Failed {
        /// Human-readable error description.
        error: String,
    },
}
