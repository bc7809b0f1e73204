use crate::batch::ImageBatch;
use crate::transforms::Transform;
use anyhow::Result;
use tracing::trace;

/// Applies an ordered list of transforms, each consuming the previous one's
/// output.
///
/// Unlike [`Transform::then`], the stages are boxed, so the pipeline can be
/// assembled at runtime and its length is not part of its type. All stages
/// share the same input/output type `B` (an [`ImageBatch`] by default).
///
/// - An empty pipeline returns its input unchanged.
/// - The first failing stage stops the pipeline and its error is returned
///   as is; later stages never run.
///
/// # Example
/// ```ignore
/// let stats = compute_image_mean_and_std(&RescaleTransform::default().rescale(&train))?;
/// let pipeline: ComposeTransform = ComposeTransform::new(vec![
///     Box::new(RescaleTransform::default()),
///     Box::new(NormalizeTransform::from_stats(stats)?),
/// ]);
/// let batch = pipeline.apply(batch)?;
/// ```
pub struct ComposeTransform<B = ImageBatch> {
    transforms: Vec<Box<dyn Transform<B, B>>>,
}

impl<B> ComposeTransform<B> {
    pub fn new(transforms: Vec<Box<dyn Transform<B, B>>>) -> Self {
        Self { transforms }
    }

    /// Appends a stage to the end of the pipeline.
    pub fn push<T>(&mut self, transform: T)
    where
        T: Transform<B, B> + 'static,
    {
        self.transforms.push(Box::new(transform));
    }

    /// Builder-style [`push`](Self::push).
    pub fn with<T>(mut self, transform: T) -> Self
    where
        T: Transform<B, B> + 'static,
    {
        self.push(transform);
        self
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }
}

impl<B> Default for ComposeTransform<B> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<B> std::fmt::Debug for ComposeTransform<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComposeTransform")
            .field("stages", &self.transforms.len())
            .finish()
    }
}

impl<B> Transform<B, B> for ComposeTransform<B> {
    fn apply(&self, input: B) -> Result<B> {
        let stages = self.transforms.len();
        self.transforms
            .iter()
            .enumerate()
            .try_fold(input, |batch, (i, transform)| {
                trace!(stage = i + 1, stages, "Applying pipeline stage");
                transform.apply(batch)
            })
    }
}
