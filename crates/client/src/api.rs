//! REST API client for the generation backend HTTP endpoints.
//!
//! Wraps the backend HTTP API (generation submission, asset download)
//! using [`reqwest`]. Submission responses are returned unconsumed so
//! the caller can read the progress stream incrementally.

use aetherforge_core::generation::GenerationRequest;

/// HTTP client for a single generation backend.
pub struct ForgeApi {
    client: reqwest::Client,
    base_url: String,
}

/// Errors from the backend REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ForgeApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    /// The backend is most likely not running.
    #[error("HTTP request failed (is the backend running?): {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("Backend API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ForgeApi {
    /// Create a new API client for a backend instance.
    ///
    /// * `base_url` - Base HTTP URL, e.g. `http://localhost:8000`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling).
    pub fn with_client(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Base HTTP URL of the backend.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a generation request.
    ///
    /// Sends a `POST /api/generate` request with the JSON-encoded
    /// request body. The returned response body is a chunked stream of
    /// newline-delimited JSON progress events; read it with
    /// [`reqwest::Response::bytes_stream`].
    pub async fn submit_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<reqwest::Response, ForgeApiError> {
        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(request)
            .send()
            .await?;

        Self::ensure_success(response).await
    }

    /// Download a generated asset by filename.
    ///
    /// Sends a `GET /api/download/{filename}` request and returns the
    /// binary body. The filename must be a bare name, not a server-side
    /// path (see [`crate::messages::file_basename`]).
    pub async fn download_asset(&self, filename: &str) -> Result<Vec<u8>, ForgeApiError> {
        let response = self
            .client
            .get(format!("{}/api/download/{filename}", self.base_url))
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ForgeApiError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ForgeApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ForgeApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
