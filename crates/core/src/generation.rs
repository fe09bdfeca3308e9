//! Generation request model and validation.
//!
//! A [`GenerationRequest`] is built once per submit and serializes
//! directly into the wire shape the backend expects:
//! `{"prompt": ..., "type": ..., "features": {...}}`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Subject types
// ---------------------------------------------------------------------------

/// What kind of 3D model a generation run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    Character,
    Asset,
    Environment,
}

impl SubjectType {
    /// All subject types, in UI tab order.
    pub const ALL: &'static [SubjectType] = &[
        SubjectType::Character,
        SubjectType::Asset,
        SubjectType::Environment,
    ];

    /// Lowercase wire name (`"character"`, `"asset"`, `"environment"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Character => "character",
            SubjectType::Asset => "asset",
            SubjectType::Environment => "environment",
        }
    }

    /// Parse a wire name back into a subject type.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "character" => Ok(SubjectType::Character),
            "asset" => Ok(SubjectType::Asset),
            "environment" => Ok(SubjectType::Environment),
            other => Err(CoreError::Validation(format!(
                "Unknown subject type '{other}'. Must be one of: character, asset, environment"
            ))),
        }
    }
}

impl std::fmt::Display for SubjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Feature flags
// ---------------------------------------------------------------------------

/// Pipeline capability flags sent with every generation request.
///
/// Serialized as an object of booleans (`pbr_textures`, `auto_rigging`,
/// `retopology`, `watertight`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub pbr_textures: bool,
    pub auto_rigging: bool,
    pub retopology: bool,
    pub watertight: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            pbr_textures: true,
            auto_rigging: false,
            retopology: true,
            watertight: true,
        }
    }
}

impl FeatureFlags {
    /// Flags appropriate for a subject type. Auto-rigging only applies
    /// to characters; everything else is always requested.
    pub fn for_subject(subject_type: SubjectType) -> Self {
        Self {
            auto_rigging: subject_type == SubjectType::Character,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Generation request
// ---------------------------------------------------------------------------

/// A single generation request. Constructed once per submit; immutable
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    pub features: FeatureFlags,
}

impl GenerationRequest {
    /// Build a request for `subject_type`.
    ///
    /// A blank prompt is substituted with `"A high-quality {type}"` so a
    /// submit with an empty prompt box still produces something usable.
    pub fn new(prompt: impl Into<String>, subject_type: SubjectType) -> Self {
        let prompt = prompt.into();
        let prompt = if prompt.trim().is_empty() {
            format!("A high-quality {subject_type}")
        } else {
            prompt
        };

        Self {
            prompt,
            subject_type,
            features: FeatureFlags::for_subject(subject_type),
        }
    }

    /// Check the request is submittable (non-blank prompt).
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.prompt.trim().is_empty() {
            return Err(CoreError::Validation(
                "Generation prompt must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
