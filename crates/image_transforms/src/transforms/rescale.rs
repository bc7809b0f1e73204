use crate::error::{Result, TransformError};
use crate::transforms::Transform;
use ndarray::{Array, ArrayBase, Data, DataMut, Dimension};
use tracing::{debug, trace};

/// A closed interval of values, `(min, max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Raw 8-bit pixel values.
    pub const fn u8_pixels() -> Self {
        Self::new(0.0, 255.0)
    }

    pub const fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    /// Both bounds and the distance between them fit in an `f32`.
    fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.width().is_finite()
    }
}

impl From<(f32, f32)> for ValueRange {
    fn from((min, max): (f32, f32)) -> Self {
        Self::new(min, max)
    }
}

/// Remaps every value from one range into another.
///
/// # Mathematical Operation:
/// ```text
/// x_std = (x - in.min) / (in.max - in.min)
/// x_out = x_std * (out.max - out.min) + out.min
/// ```
/// The same affine map is applied to every element, whatever its position
/// or channel. Defaults map raw pixels `(0, 255)` onto `(0, 1)`.
///
/// # Example
/// ```ignore
/// let rescale = RescaleTransform::builder()
///     .out_range((-1.0, 1.0))
///     .build()?;
/// let batch = rescale.apply(batch)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RescaleTransform {
    out_range: ValueRange,
    in_range: ValueRange,
}

impl Default for RescaleTransform {
    fn default() -> Self {
        Self {
            out_range: ValueRange::unit(),
            in_range: ValueRange::u8_pixels(),
        }
    }
}

impl RescaleTransform {
    /// Creates a transform mapping `in_range` onto `out_range`.
    ///
    /// Fails when the input range is empty (`min == max`), since every value
    /// would be divided by zero, or when any bound or range width is not
    /// finite (`(-f32::MAX, f32::MAX)` overflows). An empty
    /// output range is accepted and collapses all values onto its `min`.
    pub fn new(out_range: (f32, f32), in_range: (f32, f32)) -> Result<Self> {
        let out_range = ValueRange::from(out_range);
        let in_range = ValueRange::from(in_range);

        if !in_range.is_finite() || in_range.width() == 0.0 {
            return Err(TransformError::DegenerateRange {
                which: "input",
                min: in_range.min,
                max: in_range.max,
            });
        }
        if !out_range.is_finite() {
            return Err(TransformError::DegenerateRange {
                which: "output",
                min: out_range.min,
                max: out_range.max,
            });
        }

        debug!(?in_range, ?out_range, "Built rescale transform");
        Ok(Self {
            out_range,
            in_range,
        })
    }

    pub fn builder() -> RescaleTransformBuilder {
        RescaleTransformBuilder::default()
    }

    pub fn out_range(&self) -> ValueRange {
        self.out_range
    }

    pub fn in_range(&self) -> ValueRange {
        self.in_range
    }

    /// The transform mapping `out_range` back onto `in_range`.
    pub fn inverse(&self) -> Result<Self> {
        Self::new(self.in_range.bounds(), self.out_range.bounds())
    }

    /// Rescales a single value.
    #[inline]
    pub fn map_value(&self, x: f32) -> f32 {
        let x_std = (x - self.in_range.min) / self.in_range.width();
        x_std * self.out_range.width() + self.out_range.min
    }

    /// Returns a rescaled copy, leaving `images` untouched.
    pub fn rescale<S, D>(&self, images: &ArrayBase<S, D>) -> Array<f32, D>
    where
        S: Data<Elem = f32>,
        D: Dimension,
    {
        images.mapv(|x| self.map_value(x))
    }

    /// Rescales `images` in place.
    pub fn rescale_inplace<S, D>(&self, images: &mut ArrayBase<S, D>)
    where
        S: DataMut<Elem = f32>,
        D: Dimension,
    {
        images.mapv_inplace(|x| self.map_value(x));
    }
}

impl<D: Dimension> Transform<Array<f32, D>, Array<f32, D>> for RescaleTransform {
    fn apply(&self, mut images: Array<f32, D>) -> anyhow::Result<Array<f32, D>> {
        trace!(shape = ?images.shape(), "Rescaling");
        self.rescale_inplace(&mut images);
        Ok(images)
    }
}

/// Builder for [`RescaleTransform`]; unset ranges keep their defaults.
#[derive(Debug, Default)]
pub struct RescaleTransformBuilder {
    config: RescaleTransform,
}

impl RescaleTransformBuilder {
    /// Set the range values are mapped onto (default `(0, 1)`)
    pub fn out_range(mut self, range: (f32, f32)) -> Self {
        self.config.out_range = range.into();
        self
    }

    /// Set the range the input values live in (default `(0, 255)`)
    pub fn in_range(mut self, range: (f32, f32)) -> Self {
        self.config.in_range = range.into();
        self
    }

    /// Validate the ranges and build the transform.
    pub fn build(self) -> Result<RescaleTransform> {
        RescaleTransform::new(self.config.out_range.bounds(), self.config.in_range.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array4};

    #[test]
    fn test_rescale_defaults_map_pixel_range_to_unit() -> anyhow::Result<()> {
        let images = Array4::from_shape_vec((1, 2, 2, 1), vec![0.0_f32, 127.5, 255.0, 63.75])?;
        let rescaled = RescaleTransform::default().apply(images)?;

        let expected = [0.0, 0.5, 1.0, 0.25];
        for (value, expected) in rescaled.iter().zip(expected) {
            assert!((value - expected).abs() < 1e-6);
        }
        assert_eq!(rescaled.shape(), &[1, 2, 2, 1]);
        Ok(())
    }

    #[test]
    fn test_rescale_custom_ranges() -> Result<()> {
        let rescale = RescaleTransform::new((-1.0, 1.0), (0.0, 10.0))?;
        assert_eq!(rescale.map_value(0.0), -1.0);
        assert_eq!(rescale.map_value(5.0), 0.0);
        assert_eq!(rescale.map_value(10.0), 1.0);
        // values outside the input range are extrapolated, not clamped
        assert_eq!(rescale.map_value(20.0), 3.0);
        Ok(())
    }

    #[test]
    fn test_rescale_copy_leaves_input_untouched() {
        let images = array![[10.0_f32, 20.0], [30.0, 40.0]];
        let rescaled = RescaleTransform::default().rescale(&images);

        assert_eq!(images, array![[10.0_f32, 20.0], [30.0, 40.0]]);
        assert!((rescaled[[1, 1]] - 40.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_rescale_inverse_round_trip() -> anyhow::Result<()> {
        let forward = RescaleTransform::new((-2.0, 3.0), (10.0, 50.0))?;
        let backward = forward.inverse()?;
        let images = array![[10.0_f32, 12.5], [33.0, 50.0]];

        let restored = backward.apply(forward.apply(images.clone())?)?;
        for (a, b) in restored.iter().zip(images.iter()) {
            assert!((a - b).abs() < 1e-4);
        }
        Ok(())
    }

    #[test]
    fn test_rescale_rejects_degenerate_input_range() {
        let result = RescaleTransform::new((0.0, 1.0), (5.0, 5.0));
        assert!(matches!(
            result,
            Err(TransformError::DegenerateRange { which: "input", .. })
        ));

        let result = RescaleTransform::new((0.0, f32::INFINITY), (0.0, 255.0));
        assert!(matches!(
            result,
            Err(TransformError::DegenerateRange { which: "output", .. })
        ));
    }

    #[test]
    fn test_rescale_rejects_overflowing_range_width() {
        let result = RescaleTransform::new((0.0, 1.0), (-f32::MAX, f32::MAX));
        assert!(matches!(
            result,
            Err(TransformError::DegenerateRange { which: "input", .. })
        ));

        let result = RescaleTransform::new((f32::MAX, -f32::MAX), (0.0, 255.0));
        assert!(matches!(
            result,
            Err(TransformError::DegenerateRange { which: "output", .. })
        ));
    }

    #[test]
    fn test_rescale_collapsed_output_has_no_inverse() -> Result<()> {
        let collapse = RescaleTransform::new((3.0, 3.0), (0.0, 255.0))?;
        assert_eq!(collapse.map_value(100.0), 3.0);
        assert!(collapse.inverse().is_err());
        Ok(())
    }

    #[test]
    fn test_rescale_builder() -> Result<()> {
        let rescale = RescaleTransform::builder().out_range((-1.0, 1.0)).build()?;
        assert_eq!(rescale.out_range(), ValueRange::new(-1.0, 1.0));
        assert_eq!(rescale.in_range(), ValueRange::u8_pixels());

        assert!(RescaleTransform::builder()
            .in_range((1.0, 1.0))
            .build()
            .is_err());
        Ok(())
    }
}
