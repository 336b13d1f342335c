use ndarray::ArrayView2;

use crate::core::config::NoConfig;
use crate::core::distance_metric::{
    require_equal_shapes, require_non_empty, specialize, DistanceMetric,
};
use crate::core::error::DistanceError;
use crate::core::specializer::{Routine, SpecializedCallable, Specializer};
use crate::metrics::squared::squared_kernel;

/// Euclidean distance between two series of identical shape.
///
/// Distance formula: `d(x, y) = sqrt(sum_{c,t} (x[c,t] - y[c,t])^2)`
#[derive(Debug, Clone, Copy, Default)]
pub struct Euclidean;

fn euclidean_kernel(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
    squared_kernel(x, y).sqrt()
}

impl DistanceMetric for Euclidean {
    type Config = NoConfig;

    const NAME: &'static str = "euclidean";

    fn build_specialized(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        _config: &Self::Config,
        backend: &dyn Specializer,
    ) -> Result<SpecializedCallable, DistanceError> {
        require_non_empty(Self::NAME, &x, &y)?;
        require_equal_shapes(Self::NAME, &x, &y)?;
        specialize(Routine::new(Self::NAME, euclidean_kernel), &x, &y, backend)
    }

    fn raw_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        euclidean_kernel(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_euclidean_hand_computed() {
        // ||[3, 4]|| = 5
        let x = arr2(&[[3.0], [4.0]]);
        let y = arr2(&[[0.0], [0.0]]);
        let d = Euclidean::raw_distance(x.view(), y.view());
        assert!((d - 5.0).abs() < 1e-12, "Expected 5, got {d}");
    }

    #[test]
    fn test_euclidean_triangle_inequality() {
        let a = arr2(&[[0.0, 1.0, 2.0, 3.0]]);
        let b = arr2(&[[1.0, 1.0, 0.0, 2.0]]);
        let c = arr2(&[[-1.0, 4.0, 2.0, 0.0]]);
        let ab = Euclidean::raw_distance(a.view(), b.view());
        let bc = Euclidean::raw_distance(b.view(), c.view());
        let ac = Euclidean::raw_distance(a.view(), c.view());
        assert!(ac <= ab + bc + 1e-12);
    }
}
