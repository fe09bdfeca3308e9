//! Progress stream line types and parser.
//!
//! The backend streams one JSON object per line. Intermediate events
//! are tagged with pipeline stage names (`"multiview"`,
//! `"reconstruction"`, ...); only `"complete"` and `"error"` act as
//! terminal discriminators. This module deserializes a raw line and
//! classifies it into a strongly-typed [`ProgressEvent`].

use serde::Deserialize;

/// A classified progress stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A progress update (0-100) with an optional status message.
    Progress { percent: u8, message: String },

    /// The pipeline finished and produced an output file. `file` is a
    /// server-side path; download it by basename. Carries the final
    /// progress value when the backend sends one.
    Complete { file: String, percent: Option<u8> },

    /// The pipeline failed with an error message.
    Error { message: String },
}

/// Raw wire shape of one stream line. All fields are optional; the
/// classifier decides what the line means.
#[derive(Debug, Deserialize)]
struct RawLine {
    stage: Option<String>,
    progress: Option<u64>,
    message: Option<String>,
    file: Option<String>,
}

/// Parse one non-blank stream line into a [`ProgressEvent`].
///
/// Classification order matches the client reducer: an `error` stage
/// wins, then a `complete` stage with a file, then any line carrying a
/// `progress` value. A well-formed line matching none of these returns
/// `Ok(None)` and should be ignored. Malformed JSON returns `Err`;
/// callers should log and continue, since partial lines at chunk
/// boundaries are expected.
pub fn parse_line(text: &str) -> Result<Option<ProgressEvent>, serde_json::Error> {
    let raw: RawLine = serde_json::from_str(text)?;

    let percent = raw.progress.map(|p| p.min(100) as u8);

    match raw.stage.as_deref() {
        Some("error") => Ok(Some(ProgressEvent::Error {
            message: raw
                .message
                .unwrap_or_else(|| "Generation failed".to_string()),
        })),
        Some("complete") if raw.file.is_some() => Ok(Some(ProgressEvent::Complete {
            file: raw.file.unwrap(),
            percent,
        })),
        _ => match percent {
            Some(percent) => Ok(Some(ProgressEvent::Progress {
                percent,
                message: raw.message.unwrap_or_default(),
            })),
            None => Ok(None),
        },
    }
}

/// Final path component of a server-side file path.
///
/// The download endpoint takes a bare filename, but `complete` events
/// carry the server's own output path.
pub fn file_basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
