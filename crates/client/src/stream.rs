//! Incremental newline-delimited line decoding.
//!
//! The progress stream arrives as arbitrary byte chunks; a JSON line
//! may straddle a chunk boundary. [`LineDecoder`] re-buffers partial
//! lines across [`push`](LineDecoder::push) calls so each returned
//! line is always complete.

/// Splits a byte stream into complete, non-blank lines.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk and return every line completed by it.
    ///
    /// Bytes after the last newline stay buffered until a later chunk
    /// terminates them. Lines are decoded as lossy UTF-8; blank lines
    /// are discarded.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            // Drop the terminator (and a preceding \r if present).
            let end = line.len() - 1;
            let end = if end > 0 && line[end - 1] == b'\r' {
                end - 1
            } else {
                end
            };
            let text = String::from_utf8_lossy(&line[..end]);
            if !text.trim().is_empty() {
                lines.push(text.into_owned());
            }
        }
        lines
    }

    /// Drain a trailing unterminated line, if any.
    ///
    /// Call once after the stream ends; some backends do not terminate
    /// the final line.
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = String::from_utf8_lossy(&self.buffer).into_owned();
        self.buffer.clear();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
