//! src/batch.rs
//!
//! The numeric array every transform works on.
//!
//! An [`ImageBatch`] is a rank-4 `f32` array with semantic axes `(N, H, W, C)`:
//! `N` images of spatial size `H x W` with `C` channels. The channel is always
//! the last axis, which is also the only axis the per-channel transforms look
//! at, so they accept arrays of any rank whose last axis holds channels.
//!
//! ```ignore
//! let raw: Vec<u8> = decode_somewhere();
//! let batch = batch::from_u8((1, 32, 32, 3), &raw)?;
//! assert_eq!(batch::num_channels(&batch)?, 3);
//! ```

use crate::error::{Result, TransformError};
use ndarray::{Array, Array4, ArrayBase, Axis, Data, Dimension, Ix3, Ix4, IxDyn};

/// A batch of images laid out as `(N, H, W, C)`.
pub type ImageBatch = Array4<f32>;

/// Builds a batch from values in row-major `(N, H, W, C)` order.
pub fn from_vec(shape: (usize, usize, usize, usize), data: Vec<f32>) -> Result<ImageBatch> {
    Ok(Array4::from_shape_vec(shape, data)?)
}

/// Builds a batch from raw 8-bit pixels, keeping their `0..=255` values.
pub fn from_u8(shape: (usize, usize, usize, usize), data: &[u8]) -> Result<ImageBatch> {
    from_vec(shape, data.iter().map(|&v| f32::from(v)).collect())
}

/// Reshapes an array into a batch.
///
/// Rank-4 arrays are taken as they are and a single `(H, W, C)` image gains a
/// leading batch axis of length 1. Any other rank is rejected.
pub fn into_batch<D: Dimension>(array: Array<f32, D>) -> Result<ImageBatch> {
    let array = array.into_dimensionality::<IxDyn>()?;
    match array.ndim() {
        4 => Ok(array.into_dimensionality::<Ix4>()?),
        3 => Ok(array.into_dimensionality::<Ix3>()?.insert_axis(Axis(0))),
        _ => Err(TransformError::InvalidShape {
            expected: "[N, H, W, C] or [H, W, C]".into(),
            actual: array.shape().to_vec(),
        }),
    }
}

/// Length of the last (channel) axis.
pub fn num_channels<S, D>(array: &ArrayBase<S, D>) -> Result<usize>
where
    S: Data<Elem = f32>,
    D: Dimension,
{
    array
        .shape()
        .last()
        .copied()
        .ok_or_else(|| TransformError::InvalidShape {
            expected: "an array with a channel axis".into(),
            actual: Vec::new(),
        })
}

/// Checks that a batch can be reduced per channel: at least one pixel and at
/// least one channel. Returns the channel count.
pub fn ensure_reducible<S>(batch: &ArrayBase<S, Ix4>) -> Result<usize>
where
    S: Data<Elem = f32>,
{
    let (n, h, w, c) = batch.dim();
    if c == 0 {
        return Err(TransformError::NoChannels {
            shape: batch.shape().to_vec(),
        });
    }
    if n * h * w == 0 {
        return Err(TransformError::EmptyBatch {
            shape: batch.shape().to_vec(),
        });
    }
    Ok(c)
}
