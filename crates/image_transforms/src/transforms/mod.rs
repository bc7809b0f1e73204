//! src/transforms/mod.rs
//!
//! Preprocessing transforms over channel-last image batches.
//!
//! ```text
//! transforms/
//! ├── core.rs        → `Transform` trait and static `.then(...)` chaining
//! ├── compose.rs     → Runtime pipeline of boxed transforms
//! ├── rescale.rs     → Affine remap between value ranges
//! ├── normalize.rs   → Per-channel (or global) standardization
//! ├── conversion.rs  → Decoded images → `(N, H, W, C)` batch
//! └── tensor.rs      → `tch::Tensor` impls (feature `tch`)
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use image_transforms::transforms::{ImagesToBatch, NormalizeTransform, RescaleTransform, Transform};
//!
//! let pipeline = ImagesToBatch::rgb()
//!     .then(RescaleTransform::default())
//!     .then(NormalizeTransform::imagenet());
//! let batch = pipeline.apply(images)?;
//! ```

pub mod compose;
pub mod conversion;
pub mod core;
pub mod normalize;
pub mod rescale;
#[cfg(feature = "tch")]
pub mod tensor;

pub use compose::ComposeTransform;
pub use conversion::{ColorMode, ImagesToBatch};
pub use self::core::{Chain, Transform};
pub use normalize::{ChannelStat, NormalizeTransform};
pub use rescale::{RescaleTransform, RescaleTransformBuilder, ValueRange};
