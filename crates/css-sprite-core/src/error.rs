use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Nothing to pack")]
    Empty,
    #[error("Sprite sheet of {width}x{height} pixels exceeds the supported canvas size")]
    CanvasTooLarge { width: u64, height: u64 },
}

pub type Result<T> = std::result::Result<T, SpriteError>;
