use thiserror::Error;

/// Errors raised while configuring transforms or reducing image batches.
#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Degenerate {which} range ({min}, {max}): bounds and width must be finite, bounds distinct")]
    DegenerateRange {
        which: &'static str,
        min: f32,
        max: f32,
    },

    #[error("Standard deviation for channel {channel} must be finite and non-zero (got {value})")]
    ZeroStd { channel: usize, value: f32 },

    #[error("Per-channel {name} cannot be empty")]
    EmptyStatistic { name: &'static str },

    #[error("The mean has {mean} channels but the std has {std}")]
    StatLengthMismatch { mean: usize, std: usize },

    #[error("Channel count mismatch: input has {actual} channels but the {name} has {expected}")]
    ChannelMismatch {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Empty batch: cannot reduce over zero images or pixels (shape {shape:?})")]
    EmptyBatch { shape: Vec<usize> },

    #[error("Image batch has no channels (shape {shape:?})")]
    NoChannels { shape: Vec<usize> },

    #[error("Invalid batch shape: expected {expected}, got {actual:?}")]
    InvalidShape {
        expected: String,
        actual: Vec<usize>,
    },

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, TransformError>;
