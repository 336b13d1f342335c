use ndarray::{ArrayView2, Zip};

use crate::core::config::NoConfig;
use crate::core::distance_metric::{
    require_equal_shapes, require_non_empty, specialize, DistanceMetric,
};
use crate::core::error::DistanceError;
use crate::core::specializer::{Routine, SpecializedCallable, Specializer};

/// Squared Euclidean distance between two series of identical shape.
///
/// Distance formula: `d(x, y) = sum_{c,t} (x[c,t] - y[c,t])^2`
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredEuclidean;

/// NaN if the operands' shapes differ.
pub(crate) fn squared_kernel(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
    if x.dim() != y.dim() {
        return f64::NAN;
    }
    Zip::from(&x).and(&y).fold(0.0, |acc, a, b| {
        let d = a - b;
        acc + d * d
    })
}

impl DistanceMetric for SquaredEuclidean {
    type Config = NoConfig;

    const NAME: &'static str = "squared";

    fn build_specialized(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        _config: &Self::Config,
        backend: &dyn Specializer,
    ) -> Result<SpecializedCallable, DistanceError> {
        require_non_empty(Self::NAME, &x, &y)?;
        require_equal_shapes(Self::NAME, &x, &y)?;
        specialize(Routine::new(Self::NAME, squared_kernel), &x, &y, backend)
    }

    fn raw_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        squared_kernel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_squared_hand_computed() {
        // (1-0)^2 + (2-0)^2 + (3-1)^2 + (0-2)^2 = 1 + 4 + 4 + 4
        let x = arr2(&[[1.0, 2.0], [3.0, 0.0]]);
        let y = arr2(&[[0.0, 0.0], [1.0, 2.0]]);
        let d = SquaredEuclidean::raw_distance(x.view(), y.view());
        assert!((d - 13.0).abs() < 1e-12, "Expected 13, got {d}");
    }

    #[test]
    fn test_squared_identical_is_zero() {
        let x = arr2(&[[0.5, -2.0, 7.0]]);
        assert_eq!(SquaredEuclidean::raw_distance(x.view(), x.view()), 0.0);
    }

    #[test]
    fn test_squared_kernel_is_nan_on_other_shapes() {
        let x = arr2(&[[0.0, 1.0, 2.0]]);
        let y = arr2(&[[0.0, 1.0]]);
        assert!(squared_kernel(x.view(), y.view()).is_nan());
    }

    #[test]
    fn test_squared_symmetric_on_transposed_layout() {
        let x = arr2(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let y = arr2(&[[0.0, 1.0, 0.0], [1.0, 0.0, 1.0]]);
        let a = SquaredEuclidean::raw_distance(x.t(), y.view());
        let b = SquaredEuclidean::raw_distance(y.view(), x.t());
        assert!((a - b).abs() < 1e-12);
    }
}
