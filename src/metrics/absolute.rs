use ndarray::{ArrayView2, Zip};

use crate::core::config::NoConfig;
use crate::core::distance_metric::{
    require_equal_shapes, require_non_empty, specialize, DistanceMetric,
};
use crate::core::error::DistanceError;
use crate::core::specializer::{Routine, SpecializedCallable, Specializer};

/// Sum of absolute differences (Manhattan distance) between two series of
/// identical shape.
///
/// Distance formula: `d(x, y) = sum_{c,t} |x[c,t] - y[c,t]|`
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteDistance;

/// NaN if the operands' shapes differ.
fn absolute_kernel(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
    if x.dim() != y.dim() {
        return f64::NAN;
    }
    Zip::from(&x)
        .and(&y)
        .fold(0.0, |acc, a, b| acc + (a - b).abs())
}

impl DistanceMetric for AbsoluteDistance {
    type Config = NoConfig;

    const NAME: &'static str = "absolute";

    fn build_specialized(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        _config: &Self::Config,
        backend: &dyn Specializer,
    ) -> Result<SpecializedCallable, DistanceError> {
        require_non_empty(Self::NAME, &x, &y)?;
        require_equal_shapes(Self::NAME, &x, &y)?;
        specialize(Routine::new(Self::NAME, absolute_kernel), &x, &y, backend)
    }

    fn raw_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        absolute_kernel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::specializer::NativeBackend;
    use ndarray::arr2;

    #[test]
    fn test_absolute_hand_computed() {
        let x = arr2(&[[0.0, 1.0, 2.0]]);
        let y = arr2(&[[0.0, 0.0, 0.0]]);
        let d = AbsoluteDistance::raw_distance(x.view(), y.view());
        assert!((d - 3.0).abs() < 1e-12, "Expected 3, got {d}");
    }

    #[test]
    fn test_absolute_multichannel() {
        let x = arr2(&[[1.0, -1.0], [2.0, 2.0]]);
        let y = arr2(&[[0.0, 1.0], [2.0, 5.0]]);
        let callable =
            AbsoluteDistance::build_specialized(x.view(), y.view(), &NoConfig {}, &NativeBackend)
                .unwrap();
        let d = callable.call(x.view(), y.view());
        assert!((d - 6.0).abs() < 1e-12, "Expected 6, got {d}");
    }

    #[test]
    fn test_absolute_rejects_shape_mismatch() {
        let x = arr2(&[[0.0, 1.0, 2.0]]);
        let y = arr2(&[[0.0, 1.0]]);
        let err =
            AbsoluteDistance::build_specialized(x.view(), y.view(), &NoConfig {}, &NativeBackend)
                .unwrap_err();
        assert!(matches!(err, DistanceError::Specialization(_)), "{err:?}");
    }
}
