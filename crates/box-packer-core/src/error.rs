use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoxPackerError {
    #[error("Container {width}x{height} exceeds the maximum grid dimension {max}")]
    DimensionsTooLarge { width: u32, height: u32, max: u32 },
    #[error("Invalid size: {0}")]
    InvalidSize(String),
}

pub type Result<T> = std::result::Result<T, BoxPackerError>;
