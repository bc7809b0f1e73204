//! `tch::Tensor` implementations of the array transforms.
//!
//! Enabled with the `tch` feature. Tensors follow the same channel-last
//! convention as [`ImageBatch`](crate::batch::ImageBatch): per-channel
//! statistics are shaped `[C]` and broadcast against the last dimension.
//! Integer tensors are promoted to `Kind::Float` first.

use crate::transforms::{NormalizeTransform, RescaleTransform, Transform};
use anyhow::{Context, Result};
use tch::{Kind, Tensor};

fn to_floating(tensor: Tensor) -> Tensor {
    match tensor.kind() {
        Kind::Float | Kind::Double | Kind::Half | Kind::BFloat16 => tensor,
        _ => tensor.to_kind(Kind::Float),
    }
}

impl Transform<Tensor, Tensor> for RescaleTransform {
    fn apply(&self, tensor: Tensor) -> Result<Tensor> {
        let (in_range, out_range) = (self.in_range(), self.out_range());
        to_floating(tensor)
            .f_sub_scalar(f64::from(in_range.min))?
            .f_div_scalar(f64::from(in_range.width()))?
            .f_mul_scalar(f64::from(out_range.width()))?
            .f_add_scalar(f64::from(out_range.min))
            .context("Failed to rescale tensor values")
    }
}

impl Transform<Tensor, Tensor> for NormalizeTransform {
    fn apply(&self, tensor: Tensor) -> Result<Tensor> {
        let channels = tensor
            .size()
            .last()
            .copied()
            .context("Input tensor needs a channel dimension")?;

        let tensor = to_floating(tensor);
        let mean = self.mean().resolve("mean", channels as usize)?;
        let std = self.std().resolve("std", channels as usize)?;

        let mean_t = Tensor::from_slice(&mean[..])
            .to_kind(tensor.kind())
            .to_device(tensor.device());
        let std_t = Tensor::from_slice(&std[..])
            .to_kind(tensor.kind())
            .to_device(tensor.device());

        tensor
            .f_sub(&mean_t)?
            .f_div(&std_t)
            .context("Failed to normalize tensor values")
    }
}
