pub mod buffer;
pub mod density;
pub mod error;
pub mod export;
pub mod frames;
pub mod palette;
pub mod renderer;

pub use buffer::RenderBuffer;
pub use density::{DensityCanvas, DensityScale};
pub use error::RenderError;
pub use export::{export_png, ExportConfig, ExportMetadata};
pub use frames::{frame_file_name, list_frames, natural_sort_key, sort_naturally};
pub use palette::{builtin_palettes, Palette};
pub use renderer::{
    colorize_newton, render_newton, render_zoom, GridMode, NewtonFrame, NewtonShading,
};

/// Convenience result type for the render crate.
pub type Result<T> = std::result::Result<T, RenderError>;
