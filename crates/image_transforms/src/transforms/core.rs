use anyhow::{Context, Result};
use std::marker::PhantomData;

/// The `Transform` trait every preprocessing step implements.
///
/// A `Transform<I, O>` is a configured, stateless operation converting an
/// input of type `I` into an output of type `O`. It owns its configuration
/// and never keeps a reference to the data it processes.
///
/// The input is taken by value. Array transforms use that ownership to work
/// on the input's storage in place and hand the same buffer back, so the
/// caller can never observe a half-modified array through another handle.
/// Keep a `.clone()` when the original values are still needed.
///
/// Steps with matching types can be chained statically via `.then(...)`:
/// 1. **Types align**: `self: Transform<I, O>`, `next: Transform<O, M>`
/// 2. **Owned**: `Self::Sized` (no trait objects, must be concrete)
/// 3. **Thread-safe**: intermediate and output types must be `Send`
///
/// For a pipeline assembled at runtime, see
/// [`ComposeTransform`](super::ComposeTransform).
pub trait Transform<I, O>: Send + Sync {
    /// Applies the transformation to the input
    fn apply(&self, input: I) -> Result<O>;

    #[inline]
    fn then<T, M>(self, next: T) -> Chain<Self, T, O>
    where
        Self: Sized,
        T: Transform<O, M>,
        O: Send,
        M: Send,
    {
        Chain {
            first: self,
            second: next,
            _marker: PhantomData,
        }
    }
}

/// Two transforms applied back to back (`A` -> `B`).
/// - `PhantomData<M>` pins the intermediate type.
#[derive(Debug)]
pub struct Chain<A, B, M> {
    first: A,
    second: B,
    _marker: PhantomData<fn() -> M>,
}

impl<A, B, M> Chain<A, B, M> {
    /// Creates a new transform chain.
    /// [`Transform::then`] reads better in most code.
    pub fn new(first: A, second: B) -> Self {
        Self {
            first,
            second,
            _marker: PhantomData,
        }
    }
}

impl<I, M, O, A, B> Transform<I, O> for Chain<A, B, M>
where
    A: Transform<I, M>,
    B: Transform<M, O>,
    M: Send,
{
    fn apply(&self, input: I) -> Result<O> {
        let mid = self
            .first
            .apply(input)
            .with_context(|| stage_failed::<A>("first"))?;
        self.second
            .apply(mid)
            .with_context(|| stage_failed::<B>("second"))
    }
}

/// Error context naming the stage that failed, e.g.
/// `Transform chain failed in second stage (NormalizeTransform)`.
fn stage_failed<T>(position: &str) -> String {
    format!(
        "Transform chain failed in {} stage ({})",
        position,
        short_type_name::<T>()
    )
}

/// Type name without its module path; generic arguments are kept as is.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    match base.rfind("::") {
        Some(i) => &full[i + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use ndarray::{array, Array1};

    struct AddOne;
    impl Transform<Array1<f32>, Array1<f32>> for AddOne {
        fn apply(&self, input: Array1<f32>) -> Result<Array1<f32>> {
            Ok(input + 1.0)
        }
    }

    struct Total;
    impl Transform<Array1<f32>, f32> for Total {
        fn apply(&self, input: Array1<f32>) -> Result<f32> {
            Ok(input.sum())
        }
    }

    #[test]
    fn test_pipeline_construction_using_then() -> Result<()> {
        let pipeline = AddOne.then(AddOne).then(Total);
        assert_eq!(pipeline.apply(array![0.0, 1.0, 2.0])?, 9.0);
        Ok(())
    }

    #[test]
    fn test_pipeline_construction_using_chain() -> Result<()> {
        let chain = Chain::new(AddOne, Total);
        assert_eq!(chain.apply(array![1.0, 1.0])?, 4.0);
        Ok(())
    }

    #[test]
    fn test_pipeline_chain_error_context() {
        struct Fail;
        impl Transform<Array1<f32>, Array1<f32>> for Fail {
            fn apply(&self, _: Array1<f32>) -> Result<Array1<f32>> {
                Err(anyhow!("Test error"))
            }
        }

        let chain = Chain::new(AddOne, Fail);
        let err = chain.apply(array![1.0]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Transform chain failed in second stage (Fail)"
        );
        assert_eq!(err.root_cause().to_string(), "Test error");

        let chain = Chain::new(Fail, AddOne);
        let err = chain.apply(array![1.0]).unwrap_err();
        assert_eq!(err.to_string(), "Transform chain failed in first stage (Fail)");
    }

    #[test]
    fn test_short_type_name_strips_module_path() {
        assert_eq!(short_type_name::<AddOne>(), "AddOne");
        assert_eq!(
            short_type_name::<crate::transforms::RescaleTransform>(),
            "RescaleTransform"
        );
        assert_eq!(short_type_name::<Vec<u8>>(), "Vec<u8>");
    }
}
