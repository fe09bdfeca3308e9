//! Streaming client for the AetherForge generation backend.
//!
//! Provides the REST API wrapper, newline-delimited JSON progress
//! decoding, the generation session reducer, and downloaded-asset
//! export for driving one generation run end to end.

pub mod api;
pub mod events;
pub mod messages;
pub mod session;
pub mod stream;

pub use api::{ForgeApi, ForgeApiError};
pub use events::GenerationEvent;
pub use messages::ProgressEvent;
pub use session::{GeneratedAsset, GenerateError, GenerationSession, GenerationStatus};
