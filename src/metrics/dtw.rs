use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::algorithms::bounding::{Bounding, BoundingMatrix};
use crate::algorithms::common::{squared_point_distance, RollingRows};
use crate::core::config::resolve_bounding;
use crate::core::distance_metric::{
    require_equal_channels, require_non_empty, specialize, DistanceMetric,
};
use crate::core::error::{DistanceError, SpecializationError};
use crate::core::specializer::{Kernel, Routine, SpecializedCallable, Specializer};

/// Parameters of dynamic time warping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DtwConfig {
    /// Sakoe–Chiba band half-width as a fraction of the longer series, in `[0, 1]`.
    pub window: Option<f64>,
    /// Itakura parallelogram slope parameter, in `[0, 1]`. Exclusive with `window`.
    pub itakura_max_slope: Option<f64>,
}

impl DtwConfig {
    pub fn with_window(mut self, window: f64) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_itakura_max_slope(mut self, max_slope: f64) -> Self {
        self.itakura_max_slope = Some(max_slope);
        self
    }

    pub fn validate(&self) -> Result<Bounding, SpecializationError> {
        resolve_bounding(Dtw::NAME, self.window, self.itakura_max_slope)
    }
}

/// Dynamic time warping.
///
/// Pointwise cost is the squared Euclidean distance across channels; the
/// result is the accumulated cost of the optimal admissible alignment (no
/// final square root). Series may differ in length but not in channel count.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dtw;

/// Accumulated cost of the cheapest monotone alignment of `x` and `y` inside
/// `bounds`, with each cell's pointwise cost scaled by `weight(|i - j|)`.
pub(crate) fn dtw_cost(
    x: &ArrayView2<'_, f64>,
    y: &ArrayView2<'_, f64>,
    bounds: &BoundingMatrix,
    weight: impl Fn(usize) -> f64,
) -> f64 {
    let n = x.ncols();
    let m = y.ncols();
    let mut rows = RollingRows::new(m, f64::INFINITY);
    rows.prev_mut()[0] = 0.0;

    for i in 1..=n {
        let (prev, curr) = rows.split();
        for j0 in bounds.row(i - 1) {
            let j = j0 + 1;
            let cost = squared_point_distance(x, i - 1, y, j0) * weight((i - 1).abs_diff(j0));
            let best = prev[j - 1].min(prev[j]).min(curr[j - 1]);
            curr[j] = cost + best;
        }
        rows.advance();
    }

    rows.prev()[m]
}

/// DTW with its bounding matrix precomputed for one pair of lengths.
pub(crate) struct DtwKernel {
    bounding: Bounding,
    bounds: BoundingMatrix,
}

impl DtwKernel {
    pub(crate) fn new(bounding: Bounding, n: usize, m: usize) -> Self {
        Self {
            bounding,
            bounds: BoundingMatrix::new(n, m, bounding),
        }
    }
}

impl Kernel for DtwKernel {
    fn eval(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        if x.nrows() != y.nrows() {
            return f64::NAN;
        }
        let (n, m) = (x.ncols(), y.ncols());
        if self.bounds.fits(n, m) {
            dtw_cost(&x, &y, &self.bounds, |_| 1.0)
        } else {
            let bounds = BoundingMatrix::new(n, m, self.bounding);
            dtw_cost(&x, &y, &bounds, |_| 1.0)
        }
    }
}

impl DistanceMetric for Dtw {
    type Config = DtwConfig;

    const NAME: &'static str = "dtw";

    fn build_specialized(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        config: &Self::Config,
        backend: &dyn Specializer,
    ) -> Result<SpecializedCallable, DistanceError> {
        let bounding = config.validate()?;
        require_non_empty(Self::NAME, &x, &y)?;
        require_equal_channels(Self::NAME, &x, &y)?;
        let kernel = DtwKernel::new(bounding, x.ncols(), y.ncols());
        specialize(Routine::new(Self::NAME, kernel), &x, &y, backend)
    }

    fn raw_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        let bounds = BoundingMatrix::new(x.ncols(), y.ncols(), Bounding::Full);
        dtw_cost(&x, &y, &bounds, |_| 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::specializer::NativeBackend;
    use crate::metrics::squared::SquaredEuclidean;
    use ndarray::arr2;

    #[test]
    fn test_dtw_identical_is_zero() {
        let x = arr2(&[[1.0, 2.0, 3.0, 2.0, 1.0]]);
        assert_eq!(Dtw::raw_distance(x.view(), x.view()), 0.0);
    }

    #[test]
    fn test_dtw_absorbs_time_shift() {
        // y repeats x's first sample; warping aligns it for free
        let x = arr2(&[[0.0, 1.0, 2.0]]);
        let y = arr2(&[[0.0, 0.0, 1.0, 2.0]]);
        let d = Dtw::raw_distance(x.view(), y.view());
        assert!(d.abs() < 1e-12, "Expected 0, got {d}");
    }

    #[test]
    fn test_dtw_kernel_is_nan_on_channel_mismatch() {
        let x = arr2(&[[0.0, 1.0, 2.0], [5.0, 5.0, 5.0]]);
        let y = arr2(&[[0.0, 1.0, 2.0]]);
        let callable =
            Dtw::build_specialized(x.view(), x.view(), &DtwConfig::default(), &NativeBackend)
                .unwrap();
        assert!(callable.call(x.view(), y.view()).is_nan());
    }

    #[test]
    fn test_dtw_kernel_reused_on_empty_operand() {
        let x = arr2(&[[0.0, 1.0, 2.0]]);
        let empty = ndarray::Array2::<f64>::zeros((1, 0));
        let cfg = DtwConfig::default().with_window(0.5);
        let callable = Dtw::build_specialized(x.view(), x.view(), &cfg, &NativeBackend).unwrap();
        assert_eq!(callable.call(x.view(), empty.view()), f64::INFINITY);
        assert_eq!(callable.call(empty.view(), empty.view()), 0.0);
    }

    #[test]
    fn test_dtw_rejects_empty_series() {
        let x = arr2(&[[0.0, 1.0]]);
        let empty = ndarray::Array2::<f64>::zeros((1, 0));
        let cfg = DtwConfig::default();
        let err =
            Dtw::build_specialized(x.view(), empty.view(), &cfg, &NativeBackend).unwrap_err();
        assert!(matches!(
            err,
            DistanceError::Specialization(SpecializationError::EmptySeries { .. })
        ));
    }

    #[test]
    fn test_dtw_hand_computed() {
        // x = [0, 2], y = [1]: path (0,0),(1,0) costs 1 + 1
        let x = arr2(&[[0.0, 2.0]]);
        let y = arr2(&[[1.0]]);
        let d = Dtw::raw_distance(x.view(), y.view());
        assert!((d - 2.0).abs() < 1e-12, "Expected 2, got {d}");
    }

    #[test]
    fn test_dtw_zero_window_equals_squared_on_equal_lengths() {
        let x = arr2(&[[0.0, 3.0, 1.0, 4.0], [1.0, 1.0, 0.0, 2.0]]);
        let y = arr2(&[[1.0, 0.0, 2.0, 2.0], [0.0, 1.0, 1.0, 1.0]]);
        let cfg = DtwConfig::default().with_window(0.0);
        let callable = Dtw::build_specialized(x.view(), y.view(), &cfg, &NativeBackend).unwrap();
        let d = callable.call(x.view(), y.view());
        let lockstep = SquaredEuclidean::raw_distance(x.view(), y.view());
        assert!((d - lockstep).abs() < 1e-12, "Expected {lockstep}, got {d}");
    }

    #[test]
    fn test_dtw_window_never_below_unconstrained() {
        let x = arr2(&[[0.0, 1.0, 5.0, 2.0, 0.0, 1.0, 3.0, 0.0]]);
        let y = arr2(&[[1.0, 5.0, 2.0, 0.0, 0.0, 1.0, 3.0, 1.0]]);
        let full = Dtw::raw_distance(x.view(), y.view());
        for window in [0.0, 0.1, 0.25, 0.5] {
            let cfg = DtwConfig::default().with_window(window);
            let callable =
                Dtw::build_specialized(x.view(), y.view(), &cfg, &NativeBackend).unwrap();
            let d = callable.call(x.view(), y.view());
            assert!(d >= full - 1e-12, "window {window}: {d} < {full}");
        }
    }

    #[test]
    fn test_dtw_callable_handles_other_lengths() {
        let x = arr2(&[[0.0, 1.0, 2.0]]);
        let cfg = DtwConfig::default().with_window(1.0);
        let callable = Dtw::build_specialized(x.view(), x.view(), &cfg, &NativeBackend).unwrap();

        let a = arr2(&[[0.0, 1.0, 2.0, 3.0, 4.0]]);
        let b = arr2(&[[0.0, 2.0, 4.0]]);
        let d = callable.call(a.view(), b.view());
        let expected = Dtw::raw_distance(a.view(), b.view());
        assert!((d - expected).abs() < 1e-12, "Expected {expected}, got {d}");
    }

    #[test]
    fn test_dtw_rejects_bad_window() {
        let x = arr2(&[[0.0, 1.0, 2.0]]);
        let cfg = DtwConfig::default().with_window(-0.5);
        let err = Dtw::build_specialized(x.view(), x.view(), &cfg, &NativeBackend).unwrap_err();
        assert!(matches!(
            err,
            DistanceError::Specialization(SpecializationError::InvalidParameter {
                parameter: "window",
                ..
            })
        ));
    }

    #[test]
    fn test_dtw_rejects_channel_mismatch() {
        let x = arr2(&[[0.0, 1.0], [1.0, 0.0]]);
        let y = arr2(&[[0.0, 1.0]]);
        let err = Dtw::build_specialized(x.view(), y.view(), &DtwConfig::default(), &NativeBackend)
            .unwrap_err();
        assert!(matches!(
            err,
            DistanceError::Specialization(SpecializationError::ChannelMismatch { x: 2, y: 1, .. })
        ));
    }
}
