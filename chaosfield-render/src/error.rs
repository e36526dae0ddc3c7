use thiserror::Error;

/// Errors originating from colorizing, density rendering and export.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid image dimensions: {width}×{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    #[error("trajectory has no finite points to render")]
    EmptyTrajectory,

    #[error("pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Png(#[from] png::EncodingError),

    #[error(transparent)]
    Core(#[from] chaosfield_core::CoreError),
}
