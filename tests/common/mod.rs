#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ndarray::Array2;
use tsdist::{
    BackendError, Kernel, NativeBackend, Routine, Signature, SpecializedCallable, Specializer,
};

/// Native backend that counts how often it is asked to specialize.
#[derive(Clone, Default)]
pub struct CountingBackend {
    pub calls: Arc<AtomicUsize>,
}

impl CountingBackend {
    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Specializer for CountingBackend {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn specialize(
        &self,
        routine: Routine,
        signature: Signature,
    ) -> Result<SpecializedCallable, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        NativeBackend.specialize(routine, signature)
    }
}

/// Backend that always fails, as if the target could not be compiled for.
pub struct FailingBackend;

impl Specializer for FailingBackend {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn specialize(
        &self,
        _routine: Routine,
        _signature: Signature,
    ) -> Result<SpecializedCallable, BackendError> {
        Err(BackendError::new("failing", "unsupported target architecture"))
    }
}

/// Backend that claims success but hands back a callable built for a
/// different signature than the one requested.
pub struct MislabelingBackend;

impl Specializer for MislabelingBackend {
    fn name(&self) -> &'static str {
        "mislabeling"
    }

    fn specialize(
        &self,
        routine: Routine,
        signature: Signature,
    ) -> Result<SpecializedCallable, BackendError> {
        let mut wrong = signature;
        wrong.x.timepoints += 1;
        let kernel: Arc<dyn Kernel> = routine.kernel();
        Ok(SpecializedCallable::new(
            routine.metric(),
            "mislabeling",
            wrong,
            kernel,
        ))
    }
}

/// A smooth multichannel series of shape `(channels, len)`.
pub fn wave(channels: usize, len: usize, freq: f64, phase: f64) -> Array2<f64> {
    Array2::from_shape_fn((channels, len), |(c, t)| {
        ((t as f64 * freq) + phase + c as f64 * 0.7).sin()
    })
}

pub fn assert_close(a: f64, b: f64, what: &str) {
    let tol = 1e-9 * (1.0 + a.abs().max(b.abs()));
    assert!(
        (a - b).abs() <= tol,
        "{what}: {a} vs {b} (diff {:.2e})",
        (a - b).abs()
    );
}
