//! Export filename convention for generated assets.
//!
//! Exported GLB files are named deterministically from the subject type
//! and the moment of export so repeated exports never collide.

use crate::generation::SubjectType;

/// Generate the export filename for a downloaded asset.
///
/// Convention: `aetherforge_{subject_type}_{epoch_ms}.glb`
///
/// # Examples
///
/// ```
/// use aetherforge_core::generation::SubjectType;
/// use aetherforge_core::naming::export_filename;
///
/// assert_eq!(
///     export_filename(SubjectType::Character, 1700000000000),
///     "aetherforge_character_1700000000000.glb"
/// );
/// ```
pub fn export_filename(subject_type: SubjectType, epoch_ms: i64) -> String {
    format!("aetherforge_{}_{epoch_ms}.glb", subject_type.as_str())
}
