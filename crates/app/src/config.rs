/// Runtime configuration loaded from environment variables.
///
/// All fields have defaults suitable for a local backend.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the generation backend.
    pub backend_url: String,
    /// Directory exported assets are written to.
    pub output_dir: String,
}

impl AppConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `AETHERFORGE_BACKEND_URL` | `http://localhost:8000` |
    /// | `AETHERFORGE_OUTPUT_DIR`  | `.`                     |
    pub fn from_env() -> Self {
        let backend_url = std::env::var("AETHERFORGE_BACKEND_URL")
            .unwrap_or_else(|_| "http://localhost:8000".into());
        let output_dir = std::env::var("AETHERFORGE_OUTPUT_DIR").unwrap_or_else(|_| ".".into());

        Self {
            backend_url,
            output_dir,
        }
    }
}
