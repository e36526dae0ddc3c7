pub mod attractor;
pub mod classify;
pub mod complex;
pub mod error;
pub mod explore;
pub mod grid;
pub mod newton;
pub mod polynomial;
pub mod roots;
pub mod viewport;
pub mod zoom;

// Re-export primary types for convenience.
pub use attractor::{Attractor, Trajectory};
pub use classify::{classify, closest_root, normalized_index};
pub use complex::Complex;
pub use error::CoreError;
pub use explore::ExploreKind;
pub use grid::{even_point_counts, ComplexGrid};
pub use newton::{iterate, NewtonEngine, NewtonOutput, NewtonParams};
pub use polynomial::Polynomial;
pub use viewport::Viewport;
pub use zoom::{zoom_frames, ZoomMode};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
