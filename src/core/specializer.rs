//! The compilation-backend seam.
//!
//! A metric hands a [`Routine`] (its generic, parameter-bound kernel) and the
//! concrete [`Signature`] of the call to a [`Specializer`]. The backend either
//! returns a [`SpecializedCallable`] lowered for that signature or an explicit
//! [`BackendError`]. Nothing is inferred from the shape of the returned value.

use std::fmt;
use std::sync::Arc;

use ndarray::ArrayView2;

use crate::core::error::BackendError;

/// Minimum number of pairs before `call_many` fans out to rayon.
#[cfg(feature = "parallel")]
const MIN_PARALLEL_PAIRS: usize = 8;

/// Memory layout of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// Row-major and contiguous.
    Standard,
    /// Anything else (transposed, sliced with a step, column-major).
    Strided,
}

/// Shape and layout of one operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OperandSignature {
    pub channels: usize,
    pub timepoints: usize,
    pub layout: Layout,
}

impl OperandSignature {
    pub fn of(a: &ArrayView2<'_, f64>) -> Self {
        let (channels, timepoints) = a.dim();
        let layout = if a.is_standard_layout() {
            Layout::Standard
        } else {
            Layout::Strided
        };
        Self {
            channels,
            timepoints,
            layout,
        }
    }
}

impl fmt::Display for OperandSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let layout = match self.layout {
            Layout::Standard => "C",
            Layout::Strided => "A",
        };
        write!(f, "f64[{}x{}, {layout}]", self.channels, self.timepoints)
    }
}

/// Concrete call signature a callable is specialized for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature {
    pub x: OperandSignature,
    pub y: OperandSignature,
}

impl Signature {
    pub fn of(x: &ArrayView2<'_, f64>, y: &ArrayView2<'_, f64>) -> Self {
        Self {
            x: OperandSignature::of(x),
            y: OperandSignature::of(y),
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) -> f64", self.x, self.y)
    }
}

/// A generic scalar routine over two time series.
///
/// Implementations must be pure: no interior mutability, no dependence on
/// anything but the bound parameters and the two operands.
pub trait Kernel: Send + Sync + 'static {
    fn eval(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64;
}

impl<F> Kernel for F
where
    F: Fn(ArrayView2<'_, f64>, ArrayView2<'_, f64>) -> f64 + Send + Sync + 'static,
{
    fn eval(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        self(x, y)
    }
}

/// A kernel tagged with the metric it implements, ready to be specialized.
#[derive(Clone)]
pub struct Routine {
    metric: &'static str,
    kernel: Arc<dyn Kernel>,
}

impl Routine {
    pub fn new(metric: &'static str, kernel: impl Kernel) -> Self {
        Self {
            metric,
            kernel: Arc::new(kernel),
        }
    }

    pub fn metric(&self) -> &'static str {
        self.metric
    }

    /// The unlowered kernel. Backends wrap this; callers should not need it.
    pub fn kernel(&self) -> Arc<dyn Kernel> {
        Arc::clone(&self.kernel)
    }
}

impl fmt::Debug for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routine")
            .field("metric", &self.metric)
            .finish_non_exhaustive()
    }
}

/// A compilation backend.
pub trait Specializer: Send + Sync {
    /// Identifier reported in errors and on produced callables.
    fn name(&self) -> &'static str;

    /// Lower `routine` for `signature`.
    fn specialize(
        &self,
        routine: Routine,
        signature: Signature,
    ) -> Result<SpecializedCallable, BackendError>;
}

/// Default in-process backend. Accepts every signature.
///
/// Standard-layout operands reach the kernel untouched; strided operands are
/// copied to standard layout first so kernels always walk contiguous rows.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeBackend;

impl NativeBackend {
    pub const NAME: &'static str = "native";
}

impl Specializer for NativeBackend {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn specialize(
        &self,
        routine: Routine,
        signature: Signature,
    ) -> Result<SpecializedCallable, BackendError> {
        let kernel: Arc<dyn Kernel> = match (signature.x.layout, signature.y.layout) {
            (Layout::Standard, Layout::Standard) => routine.kernel(),
            _ => Arc::new(StandardLayout(routine.kernel())),
        };

        Ok(SpecializedCallable::new(
            routine.metric(),
            Self::NAME,
            signature,
            kernel,
        ))
    }
}

struct StandardLayout(Arc<dyn Kernel>);

impl Kernel for StandardLayout {
    fn eval(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        let x = x.as_standard_layout();
        let y = y.as_standard_layout();
        self.0.eval(x.view(), y.view())
    }
}

/// A configuration-bound, specialized distance routine.
///
/// Immutable and cheap to clone; safe to share across threads and to invoke
/// on any number of `(x, y)` pairs.
#[derive(Clone)]
pub struct SpecializedCallable {
    metric: &'static str,
    backend: &'static str,
    signature: Signature,
    kernel: Arc<dyn Kernel>,
}

impl SpecializedCallable {
    /// Wrap a lowered kernel. Intended for [`Specializer`] implementations.
    pub fn new(
        metric: &'static str,
        backend: &'static str,
        signature: Signature,
        kernel: Arc<dyn Kernel>,
    ) -> Self {
        Self {
            metric,
            backend,
            signature,
            kernel,
        }
    }

    /// Compute the distance between `x` and `y`.
    #[inline]
    pub fn call(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        self.kernel.eval(x, y)
    }

    /// Compute the distance for each pair, preserving order.
    pub fn call_many(&self, pairs: &[(ArrayView2<'_, f64>, ArrayView2<'_, f64>)]) -> Vec<f64> {
        #[cfg(feature = "parallel")]
        if pairs.len() >= MIN_PARALLEL_PAIRS {
            use rayon::prelude::*;
            return pairs
                .par_iter()
                .map(|(x, y)| self.call(x.view(), y.view()))
                .collect();
        }

        pairs
            .iter()
            .map(|(x, y)| self.call(x.view(), y.view()))
            .collect()
    }

    pub fn metric(&self) -> &'static str {
        self.metric
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub fn signature(&self) -> Signature {
        self.signature
    }
}

impl fmt::Debug for SpecializedCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecializedCallable")
            .field("metric", &self.metric)
            .field("backend", &self.backend)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}
