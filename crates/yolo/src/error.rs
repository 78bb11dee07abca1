//! See [`Error`].

use miette::Diagnostic;
use thiserror::Error;

/// Error types for this crate.
///
/// All variants except [`Error::Io`] and [`Error::Deserialize`] describe a misconfigured decoder,
/// and are returned before any boxes are produced.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Output has {channels} channels, which is not divisible by {num_boxes} anchor boxes")]
    #[diagnostic(help("the output layout should be `num_boxes * (4 + 1 + num_classes)` channels"))]
    ChannelCount { channels: usize, num_boxes: usize },

    #[error("Expected {expected} anchor values (2 per anchor box), got {actual}")]
    AnchorCount { expected: usize, actual: usize },

    #[error("At least one anchor box is required per cell")]
    NoAnchorBoxes,

    #[error(
        "Each anchor box has {channels} channels, expected at least 6 (x, y, w, h, objectness \
            and one or more classes)"
    )]
    BoxLayout { channels: usize },

    #[error("Network input resolution must be non-zero, got {width}x{height}")]
    Resolution { width: u32, height: u32 },

    #[error("Objectness threshold must be a number, got {0}")]
    Threshold(f32),

    #[error("Expected {expected} detection scales, got {actual}")]
    ScaleCount { expected: usize, actual: usize },

    #[error("No detection scale with index {index}, the decoder has {num_scales} scales")]
    ScaleIndex { index: usize, num_scales: usize },

    #[error("Failed to reshape network output")]
    Shape(#[from] ndarray::ShapeError),

    #[error("Failed to read decoder configuration")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse decoder configuration")]
    Deserialize(#[from] toml::de::Error),
}

/// Type alias for [`Result<T, Error>`].
pub type Result<T> = std::result::Result<T, Error>;
