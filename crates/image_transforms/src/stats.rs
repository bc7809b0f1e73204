//! src/stats.rs
//!
//! Per-channel dataset statistics for [`NormalizeTransform`].
//!
//! [`compute_image_mean_and_std`] reduces one `(N, H, W, C)` batch over its
//! `N`, `H` and `W` axes. [`RunningStats`] does the same over a dataset fed
//! batch by batch, for data that does not fit in a single array.
//!
//! Both report the *population* standard deviation (divide by the count, not
//! the count minus one) and accumulate in `f64`.
//!
//! ```ignore
//! let stats = compute_image_mean_and_std(&train_images)?;
//! let normalize = NormalizeTransform::from_stats(stats)?;
//! ```
//!
//! [`NormalizeTransform`]: crate::transforms::NormalizeTransform

use crate::batch;
use crate::error::{Result, TransformError};
use ndarray::{ArrayBase, Axis, Data, Ix3, Ix4};
use tracing::debug;

/// Per-channel mean and standard deviation, aligned with the channel axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelStats {
    pub mean: Vec<f32>,
    pub std: Vec<f32>,
}

impl ChannelStats {
    pub fn num_channels(&self) -> usize {
        self.mean.len()
    }
}

/// Computes the per-channel mean and population standard deviation of a
/// batch of shape `(N, H, W, C)`.
///
/// Fails on a batch without pixels or without channels.
pub fn compute_image_mean_and_std<S>(images: &ArrayBase<S, Ix4>) -> Result<ChannelStats>
where
    S: Data<Elem = f32>,
{
    let channels = batch::ensure_reducible(images)?;
    let (mean, std): (Vec<f32>, Vec<f32>) = images
        .axis_iter(Axis(3))
        .map(|plane| {
            let (mean, m2) = moments(&plane);
            let variance = m2 / plane.len() as f64;
            (mean as f32, variance.sqrt() as f32)
        })
        .unzip();

    debug!(channels, shape = ?images.shape(), ?mean, ?std, "Computed image statistics");
    Ok(ChannelStats { mean, std })
}

/// Mean and sum of squared deviations of one channel plane, two-pass in f64.
fn moments<S>(plane: &ArrayBase<S, Ix3>) -> (f64, f64)
where
    S: Data<Elem = f32>,
{
    let count = plane.len() as f64;
    let mean = plane.iter().map(|&v| f64::from(v)).sum::<f64>() / count;
    let m2 = plane
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>();
    (mean, m2)
}

/// Accumulates per-channel statistics across batches.
///
/// Each batch is reduced on its own and merged into the running totals with
/// the pairwise update of Chan et al., so the result matches
/// [`compute_image_mean_and_std`] on all batches concatenated along `N`.
///
/// # Example
/// ```ignore
/// let mut running = RunningStats::new();
/// for batch in batches {
///     running.update(&batch)?;
/// }
/// let stats = running.finalize()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: Vec<f64>,
    m2: Vec<f64>,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values seen so far in each channel.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Folds one batch into the running statistics.
    ///
    /// The channel count is fixed by the first batch; later batches must match.
    pub fn update<S>(&mut self, images: &ArrayBase<S, Ix4>) -> Result<()>
    where
        S: Data<Elem = f32>,
    {
        let channels = batch::ensure_reducible(images)?;
        if self.count > 0 && channels != self.mean.len() {
            return Err(TransformError::ChannelMismatch {
                name: "running statistics",
                expected: self.mean.len(),
                actual: channels,
            });
        }
        if self.count == 0 {
            self.mean = vec![0.0; channels];
            self.m2 = vec![0.0; channels];
        }

        let (n, h, w, _) = images.dim();
        let batch_count = (n * h * w) as u64;
        let total = self.count + batch_count;
        let (na, nb, nt) = (self.count as f64, batch_count as f64, total as f64);

        for (c, plane) in images.axis_iter(Axis(3)).enumerate() {
            let (batch_mean, batch_m2) = moments(&plane);
            let delta = batch_mean - self.mean[c];
            self.mean[c] += delta * nb / nt;
            self.m2[c] += batch_m2 + delta * delta * na * nb / nt;
        }
        self.count = total;
        Ok(())
    }

    /// Returns the statistics of everything accumulated so far.
    pub fn finalize(&self) -> Result<ChannelStats> {
        if self.count == 0 {
            return Err(TransformError::EmptyBatch { shape: Vec::new() });
        }
        let count = self.count as f64;
        Ok(ChannelStats {
            mean: self.mean.iter().map(|&m| m as f32).collect(),
            std: self
                .m2
                .iter()
                .map(|&m2| (m2 / count).sqrt() as f32)
                .collect(),
        })
    }
}
