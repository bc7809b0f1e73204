use crate::batch::{self, ImageBatch};
use crate::transforms::Transform;
use anyhow::{ensure, Context, Result};
use image::{DynamicImage, GenericImageView};

// ============================================================================
// ImagesToBatch
// ============================================================================

/// Channel layout of the produced batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// 3 channels
    #[default]
    Rgb,
    /// 1 channel
    Luma,
}

impl ColorMode {
    pub fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Luma => 1,
        }
    }
}

/// Stacks decoded images into a channel-last `(N, H, W, C)` batch.
///
/// Pixel values are kept in their raw `[0, 255]` range; follow with a
/// [`RescaleTransform`](super::RescaleTransform) to map them elsewhere.
/// Every image is converted to the requested [`ColorMode`] first, so mixed
/// source formats are fine, but all images must share one size.
///
/// # Example
/// ```ignore
/// let pipeline = ImagesToBatch::rgb().then(RescaleTransform::default());
/// let batch = pipeline.apply(images)?;
/// ```
#[derive(Debug, Default)]
pub struct ImagesToBatch {
    mode: ColorMode,
}

impl ImagesToBatch {
    pub fn new(mode: ColorMode) -> Self {
        Self { mode }
    }

    pub fn rgb() -> Self {
        Self::new(ColorMode::Rgb)
    }

    pub fn luma() -> Self {
        Self::new(ColorMode::Luma)
    }
}

impl Transform<Vec<DynamicImage>, ImageBatch> for ImagesToBatch {
    fn apply(&self, images: Vec<DynamicImage>) -> Result<ImageBatch> {
        ensure!(!images.is_empty(), "Cannot build a batch from zero images");

        let (width, height) = images[0].dimensions();
        ensure!(
            width > 0 && height > 0,
            "Image dimensions must be positive (got {}x{})",
            width,
            height
        );

        let channels = self.mode.channels();
        let (h, w) = (height as usize, width as usize);
        let mut data = Vec::with_capacity(images.len() * h * w * channels);

        for (i, img) in images.iter().enumerate() {
            ensure!(
                img.dimensions() == (width, height),
                "Image {} is {}x{} but the batch is {}x{}",
                i,
                img.width(),
                img.height(),
                width,
                height
            );
            match self.mode {
                ColorMode::Rgb => data.extend(img.to_rgb8().as_raw().iter().map(|&v| f32::from(v))),
                ColorMode::Luma => {
                    data.extend(img.to_luma8().as_raw().iter().map(|&v| f32::from(v)))
                }
            }
        }

        batch::from_vec((images.len(), h, w, channels), data)
            .context("Failed to assemble image batch")
    }
}
