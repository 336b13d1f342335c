pub mod algorithms;
pub mod core;
pub mod metrics;

use std::marker::PhantomData;
use std::sync::Arc;

use ndarray::ArrayView2;

pub use crate::algorithms::bounding::{Bounding, BoundingMatrix};
pub use crate::core::config::{Metric, MetricConfig, NoConfig};
pub use crate::core::distance_metric::DistanceMetric;
pub use crate::core::error::{
    BackendError, CompilationError, DistanceError, InvalidInput, Operand, Result,
    SpecializationError, UnknownMetric,
};
pub use crate::core::series::{validate, SeriesInput};
pub use crate::core::specializer::{
    Kernel, Layout, NativeBackend, OperandSignature, Routine, Signature, SpecializedCallable,
    Specializer,
};
pub use crate::metrics::absolute::AbsoluteDistance;
pub use crate::metrics::dtw::{Dtw, DtwConfig};
pub use crate::metrics::edr::{Edr, EdrConfig};
pub use crate::metrics::erp::{Erp, ErpConfig};
pub use crate::metrics::euclidean::Euclidean;
pub use crate::metrics::lcss::{Lcss, LcssConfig};
pub use crate::metrics::squared::SquaredEuclidean;
pub use crate::metrics::wdtw::{Wdtw, WdtwConfig};

/// Caller-facing entry point for one distance metric, generic over the metric.
///
/// Validates both operands, asks the metric to specialize itself on the
/// engine's backend, and checks that what came back is specialized for the
/// operands at hand.
///
/// # Examples
///
/// ```
/// use ndarray::arr2;
/// use tsdist::{AbsoluteEngine, NoConfig};
///
/// let x = arr2(&[[0.0, 1.0, 2.0]]);
/// let y = arr2(&[[0.0, 0.0, 0.0]]);
/// let engine = AbsoluteEngine::new();
/// assert_eq!(engine.distance(&x, &y, &NoConfig {}).unwrap(), 3.0);
/// ```
pub struct Engine<M: DistanceMetric> {
    backend: Arc<dyn Specializer>,
    _metric: PhantomData<M>,
}

impl<M: DistanceMetric> Engine<M> {
    /// Create an engine on the [`NativeBackend`].
    pub fn new() -> Self {
        Self::with_shared_backend(Arc::new(NativeBackend))
    }

    /// Create an engine on a custom compilation backend.
    pub fn with_backend(backend: impl Specializer + 'static) -> Self {
        Self::with_shared_backend(Arc::new(backend))
    }

    /// Create an engine on a backend already shared with other engines.
    pub fn with_shared_backend(backend: Arc<dyn Specializer>) -> Self {
        Self {
            backend,
            _metric: PhantomData,
        }
    }

    /// The compilation backend this engine specializes on.
    pub fn backend(&self) -> &dyn Specializer {
        self.backend.as_ref()
    }

    /// Compute the distance between `x` and `y` in one shot.
    ///
    /// Equivalent to `distance_factory(x, y, config)?.call(x, y)`. Prefer
    /// [`distance_factory`](Self::distance_factory) when the same
    /// configuration is used for many pairs.
    pub fn distance<'x, 'y>(
        &self,
        x: impl Into<SeriesInput<'x>>,
        y: impl Into<SeriesInput<'y>>,
        config: &M::Config,
    ) -> Result<f64> {
        let (x, y) = validate_operands(x.into(), y.into())?;
        let callable = self.specialize(x, y, config)?;
        Ok(callable.call(x, y))
    }

    /// Build a specialized callable for `config`, to be invoked many times.
    ///
    /// Fails with [`CompilationError`] rather than returning anything that
    /// was not specialized for the signature of `(x, y)`.
    pub fn distance_factory<'x, 'y>(
        &self,
        x: impl Into<SeriesInput<'x>>,
        y: impl Into<SeriesInput<'y>>,
        config: &M::Config,
    ) -> Result<SpecializedCallable> {
        let (x, y) = validate_operands(x.into(), y.into())?;
        self.specialize(x, y, config)
    }

    fn specialize(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        config: &M::Config,
    ) -> Result<SpecializedCallable> {
        let callable = M::build_specialized(x, y, config, self.backend.as_ref())?;

        let expected = Signature::of(&x, &y);
        let actual = callable.signature();
        if actual != expected {
            log::warn!(
                "{}: backend {} returned a callable for {actual}, requested {expected}",
                M::NAME,
                callable.backend()
            );
            return Err(CompilationError::SignatureMismatch {
                metric: M::NAME,
                expected,
                actual,
            }
            .into());
        }
        Ok(callable)
    }
}

impl<M: DistanceMetric> Default for Engine<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: DistanceMetric> Clone for Engine<M> {
    fn clone(&self) -> Self {
        Self::with_shared_backend(Arc::clone(&self.backend))
    }
}

fn validate_operands<'x, 'y>(
    x: SeriesInput<'x>,
    y: SeriesInput<'y>,
) -> Result<(ArrayView2<'x, f64>, ArrayView2<'y, f64>)> {
    let x = validate(x, Operand::X)?;
    let y = validate(y, Operand::Y)?;
    Ok((x, y))
}

pub type AbsoluteEngine = Engine<AbsoluteDistance>;
pub type SquaredEngine = Engine<SquaredEuclidean>;
pub type EuclideanEngine = Engine<Euclidean>;
pub type DtwEngine = Engine<Dtw>;
pub type WdtwEngine = Engine<Wdtw>;
pub type LcssEngine = Engine<Lcss>;
pub type ErpEngine = Engine<Erp>;
pub type EdrEngine = Engine<Edr>;

/// Compute a distance with the metric selected at runtime by `config`.
///
/// ```
/// use ndarray::arr2;
/// use tsdist::{distance, DtwConfig, MetricConfig};
///
/// let x = arr2(&[[0.0, 1.0, 2.0]]);
/// let y = arr2(&[[0.0, 0.0, 1.0, 2.0]]);
/// let d = distance(&x, &y, &MetricConfig::Dtw(DtwConfig::default())).unwrap();
/// assert_eq!(d, 0.0);
/// ```
pub fn distance<'x, 'y>(
    x: impl Into<SeriesInput<'x>>,
    y: impl Into<SeriesInput<'y>>,
    config: &MetricConfig,
) -> Result<f64> {
    distance_with_backend(x, y, config, Arc::new(NativeBackend))
}

/// Build a specialized callable for the metric selected at runtime by `config`.
///
/// Dispatch on the metric happens once, here; the returned callable carries
/// no per-call lookup.
pub fn distance_factory<'x, 'y>(
    x: impl Into<SeriesInput<'x>>,
    y: impl Into<SeriesInput<'y>>,
    config: &MetricConfig,
) -> Result<SpecializedCallable> {
    distance_factory_with_backend(x, y, config, Arc::new(NativeBackend))
}

pub fn distance_with_backend<'x, 'y>(
    x: impl Into<SeriesInput<'x>>,
    y: impl Into<SeriesInput<'y>>,
    config: &MetricConfig,
    backend: Arc<dyn Specializer>,
) -> Result<f64> {
    let (x, y) = validate_operands(x.into(), y.into())?;
    let callable = factory_for(x, y, config, backend)?;
    Ok(callable.call(x, y))
}

pub fn distance_factory_with_backend<'x, 'y>(
    x: impl Into<SeriesInput<'x>>,
    y: impl Into<SeriesInput<'y>>,
    config: &MetricConfig,
    backend: Arc<dyn Specializer>,
) -> Result<SpecializedCallable> {
    let (x, y) = validate_operands(x.into(), y.into())?;
    factory_for(x, y, config, backend)
}

fn factory_for(
    x: ArrayView2<'_, f64>,
    y: ArrayView2<'_, f64>,
    config: &MetricConfig,
    backend: Arc<dyn Specializer>,
) -> Result<SpecializedCallable> {
    let none = NoConfig {};
    match config {
        MetricConfig::Absolute => {
            AbsoluteEngine::with_shared_backend(backend).specialize(x, y, &none)
        }
        MetricConfig::Squared => {
            SquaredEngine::with_shared_backend(backend).specialize(x, y, &none)
        }
        MetricConfig::Euclidean => {
            EuclideanEngine::with_shared_backend(backend).specialize(x, y, &none)
        }
        MetricConfig::Dtw(cfg) => DtwEngine::with_shared_backend(backend).specialize(x, y, cfg),
        MetricConfig::Wdtw(cfg) => WdtwEngine::with_shared_backend(backend).specialize(x, y, cfg),
        MetricConfig::Lcss(cfg) => LcssEngine::with_shared_backend(backend).specialize(x, y, cfg),
        MetricConfig::Erp(cfg) => ErpEngine::with_shared_backend(backend).specialize(x, y, cfg),
        MetricConfig::Edr(cfg) => EdrEngine::with_shared_backend(backend).specialize(x, y, cfg),
    }
}
