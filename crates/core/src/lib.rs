//! Shared domain types for the AetherForge workspace.
//!
//! Pure logic only: the generation request model, the export naming
//! convention, the workspace error type, and common type aliases. No
//! I/O lives here so both the stream client and the sprite engine can
//! depend on this crate without pulling in a runtime.

pub mod error;
pub mod generation;
pub mod naming;
pub mod types;

pub use error::CoreError;
