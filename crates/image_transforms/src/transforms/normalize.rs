use crate::batch;
use crate::error::{Result, TransformError};
use crate::stats::ChannelStats;
use crate::transforms::Transform;
use ndarray::{Array, ArrayBase, Axis, Data, DataMut, Dimension, RemoveAxis};
use std::borrow::Cow;
use tracing::{debug, trace};

/// A normalization statistic: one value shared by every channel, or one
/// value per channel aligned with the last axis.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelStat {
    Scalar(f32),
    PerChannel(Vec<f32>),
}

impl ChannelStat {
    /// Number of channels this statistic is tied to, `None` for a scalar.
    pub fn num_channels(&self) -> Option<usize> {
        match self {
            ChannelStat::Scalar(_) => None,
            ChannelStat::PerChannel(values) => Some(values.len()),
        }
    }

    fn values(&self) -> &[f32] {
        match self {
            ChannelStat::Scalar(value) => std::slice::from_ref(value),
            ChannelStat::PerChannel(values) => values,
        }
    }

    /// One value per channel for an input with `channels` channels.
    pub(crate) fn resolve(&self, name: &'static str, channels: usize) -> Result<Cow<'_, [f32]>> {
        match self {
            ChannelStat::Scalar(value) => Ok(Cow::Owned(vec![*value; channels])),
            ChannelStat::PerChannel(values) if values.len() == channels => {
                Ok(Cow::Borrowed(values.as_slice()))
            }
            ChannelStat::PerChannel(values) => Err(TransformError::ChannelMismatch {
                name,
                expected: values.len(),
                actual: channels,
            }),
        }
    }
}

/// Standardizes values with channel-wise statistics.
///
/// # Arguments:
/// - `mean`: one mean, or a mean per channel.
/// - `std`: one standard deviation, or one per channel.
///
/// Channels are read from the **last** axis, so `(N, H, W, C)` batches,
/// single `(H, W, C)` images and flat `(pixels, C)` tables all work. A scalar
/// statistic applies to every channel; a per-channel one must have as many
/// entries as the input has channels.
///
/// # Mathematical Operation:
/// ```text
/// output[..., c] = (input[..., c] - mean[c]) / std[c]
/// ```
///
/// # Example
/// ```ignore
/// let stats = compute_image_mean_and_std(&train_images)?;
/// let normalize = NormalizeTransform::from_stats(stats)?;
/// let normalized = normalize.apply(batch)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizeTransform {
    mean: ChannelStat,
    std: ChannelStat,
}

impl NormalizeTransform {
    /// Creates new normalization parameters.
    ///
    /// Every standard deviation must be finite and non-zero, per-channel
    /// lists must not be empty, and two per-channel lists must agree in length.
    pub fn new(mean: ChannelStat, std: ChannelStat) -> Result<Self> {
        for (name, stat) in [("mean", &mean), ("std", &std)] {
            if stat.num_channels() == Some(0) {
                return Err(TransformError::EmptyStatistic { name });
            }
        }
        if let (Some(mean_len), Some(std_len)) = (mean.num_channels(), std.num_channels()) {
            if mean_len != std_len {
                return Err(TransformError::StatLengthMismatch {
                    mean: mean_len,
                    std: std_len,
                });
            }
        }
        if let Some((channel, &value)) = std
            .values()
            .iter()
            .enumerate()
            .find(|(_, v)| **v == 0.0 || !v.is_finite())
        {
            return Err(TransformError::ZeroStd { channel, value });
        }

        debug!(?mean, ?std, "Built normalize transform");
        Ok(Self { mean, std })
    }

    /// Normalizes every channel with the same mean and std.
    pub fn scalar(mean: f32, std: f32) -> Result<Self> {
        Self::new(ChannelStat::Scalar(mean), ChannelStat::Scalar(std))
    }

    /// Normalizes each channel with its own mean and std.
    pub fn per_channel(mean: &[f32], std: &[f32]) -> Result<Self> {
        Self::new(
            ChannelStat::PerChannel(mean.to_vec()),
            ChannelStat::PerChannel(std.to_vec()),
        )
    }

    /// Uses statistics computed from a dataset.
    pub fn from_stats(stats: ChannelStats) -> Result<Self> {
        Self::new(
            ChannelStat::PerChannel(stats.mean),
            ChannelStat::PerChannel(stats.std),
        )
    }

    /// ImageNet standard normalization (RGB, values in `[0, 1]`)
    pub fn imagenet() -> Self {
        Self {
            mean: ChannelStat::PerChannel(vec![0.485, 0.456, 0.406]),
            std: ChannelStat::PerChannel(vec![0.229, 0.224, 0.225]),
        }
    }

    pub fn mean(&self) -> &ChannelStat {
        &self.mean
    }

    pub fn std(&self) -> &ChannelStat {
        &self.std
    }

    /// Returns a normalized copy, leaving `images` untouched.
    pub fn normalize<S, D>(&self, images: &ArrayBase<S, D>) -> Result<Array<f32, D>>
    where
        S: Data<Elem = f32>,
        D: Dimension + RemoveAxis,
    {
        let mut output = images.to_owned();
        self.normalize_inplace(&mut output)?;
        Ok(output)
    }

    /// Normalizes `images` in place.
    ///
    /// The channel count is checked before anything is written, so on error
    /// the input is left as it was.
    pub fn normalize_inplace<S, D>(&self, images: &mut ArrayBase<S, D>) -> Result<()>
    where
        S: DataMut<Elem = f32>,
        D: Dimension + RemoveAxis,
    {
        let channels = batch::num_channels(images)?;
        let mean = self.mean.resolve("mean", channels)?;
        let std = self.std.resolve("std", channels)?;

        let channel_axis = Axis(images.ndim() - 1);
        for (c, mut plane) in images.axis_iter_mut(channel_axis).enumerate() {
            let (m, s) = (mean[c], std[c]);
            plane.mapv_inplace(|x| (x - m) / s);
        }
        Ok(())
    }
}

impl<D: Dimension + RemoveAxis> Transform<Array<f32, D>, Array<f32, D>> for NormalizeTransform {
    fn apply(&self, mut images: Array<f32, D>) -> anyhow::Result<Array<f32, D>> {
        trace!(shape = ?images.shape(), "Normalizing");
        self.normalize_inplace(&mut images)?;
        Ok(images)
    }
}
