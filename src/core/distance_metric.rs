use std::fmt::Debug;
use std::time::Instant;

use ndarray::ArrayView2;

use crate::core::error::{CompilationError, DistanceError, Operand, SpecializationError};
use crate::core::specializer::{Routine, Signature, SpecializedCallable, Specializer};

/// Contract every distance metric implements.
///
/// Designed for static polymorphism: the facade is generic over
/// `M: DistanceMetric`, and each metric is a stateless unit struct. All
/// per-call state lives in `Self::Config` and in the operands.
///
/// A metric offers two ways to compute a distance:
/// - [`build_specialized`](Self::build_specialized) binds the configuration
///   into a kernel and hands it to a backend, producing a reusable callable;
/// - [`raw_distance`](Self::raw_distance) evaluates the same kernel directly
///   under the default configuration, as a reference baseline.
pub trait DistanceMetric: Clone + Send + Sync + 'static {
    /// Named, typed parameters of the metric.
    type Config: Debug + Clone + Default + Send + Sync;

    /// Canonical metric name.
    const NAME: &'static str;

    /// Validate `config` against the operands and specialize the metric's
    /// kernel for `Signature::of(x, y)`.
    ///
    /// Configuration problems are reported as [`SpecializationError`] before
    /// the backend is touched.
    fn build_specialized(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        config: &Self::Config,
        backend: &dyn Specializer,
    ) -> Result<SpecializedCallable, DistanceError>;

    /// Unspecialized distance under the default configuration.
    fn raw_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64;
}

/// Hand `routine` to `backend` for the signature of `(x, y)`.
///
/// Shared tail of every `build_specialized`: logs the request, wraps
/// backend failures into [`CompilationError::Backend`].
pub fn specialize(
    routine: Routine,
    x: &ArrayView2<'_, f64>,
    y: &ArrayView2<'_, f64>,
    backend: &dyn Specializer,
) -> Result<SpecializedCallable, DistanceError> {
    let metric = routine.metric();
    let signature = Signature::of(x, y);
    log::debug!(
        "specializing {metric} for {signature} on backend {}",
        backend.name()
    );

    let started = Instant::now();
    let callable = backend.specialize(routine, signature).map_err(|source| {
        log::warn!("{metric}: backend {} failed: {}", source.backend, source.reason);
        CompilationError::Backend { metric, source }
    })?;

    log::debug!(
        "specialized {metric} for {signature} in {:?}",
        started.elapsed()
    );
    Ok(callable)
}

/// Require both operands to have at least one channel and one timepoint.
pub fn require_non_empty(
    metric: &'static str,
    x: &ArrayView2<'_, f64>,
    y: &ArrayView2<'_, f64>,
) -> Result<(), SpecializationError> {
    for (operand, a) in [(Operand::X, x.view()), (Operand::Y, y.view())] {
        if a.is_empty() {
            return Err(SpecializationError::EmptySeries {
                metric,
                operand,
                shape: a.dim(),
            });
        }
    }
    Ok(())
}

/// Require both operands to have the same channel count.
pub fn require_equal_channels(
    metric: &'static str,
    x: &ArrayView2<'_, f64>,
    y: &ArrayView2<'_, f64>,
) -> Result<(), SpecializationError> {
    if x.nrows() != y.nrows() {
        return Err(SpecializationError::ChannelMismatch {
            metric,
            x: x.nrows(),
            y: y.nrows(),
        });
    }
    Ok(())
}

/// Require both operands to have identical `(channels, timepoints)` shapes.
pub fn require_equal_shapes(
    metric: &'static str,
    x: &ArrayView2<'_, f64>,
    y: &ArrayView2<'_, f64>,
) -> Result<(), SpecializationError> {
    if x.dim() != y.dim() {
        return Err(SpecializationError::ShapeMismatch {
            metric,
            x: x.dim(),
            y: y.dim(),
        });
    }
    Ok(())
}
