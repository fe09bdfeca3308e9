#[derive(Debug, thiserror::Error)]
pub enum SpriteError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Image encoding failed: {0}")]
    Encode(String),
}
