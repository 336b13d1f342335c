use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::algorithms::bounding::{Bounding, BoundingMatrix};
use crate::core::config::{require_non_negative, resolve_bounding};
use crate::core::distance_metric::{
    require_equal_channels, require_non_empty, specialize, DistanceMetric,
};
use crate::core::error::{DistanceError, SpecializationError};
use crate::core::specializer::{Kernel, Routine, SpecializedCallable, Specializer};
use crate::metrics::dtw::dtw_cost;

/// Default penalty steepness, as in Jeong et al. (2011).
pub const DEFAULT_G: f64 = 0.05;

/// Parameters of weighted dynamic time warping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WdtwConfig {
    /// Steepness of the logistic phase-difference weight. Finite, `>= 0`.
    pub g: f64,
    pub window: Option<f64>,
    pub itakura_max_slope: Option<f64>,
}

impl Default for WdtwConfig {
    fn default() -> Self {
        Self {
            g: DEFAULT_G,
            window: None,
            itakura_max_slope: None,
        }
    }
}

impl WdtwConfig {
    pub fn with_g(mut self, g: f64) -> Self {
        self.g = g;
        self
    }

    pub fn with_window(mut self, window: f64) -> Self {
        self.window = Some(window);
        self
    }

    pub fn with_itakura_max_slope(mut self, max_slope: f64) -> Self {
        self.itakura_max_slope = Some(max_slope);
        self
    }

    pub fn validate(&self) -> Result<Bounding, SpecializationError> {
        require_non_negative(Wdtw::NAME, "g", self.g)?;
        resolve_bounding(Wdtw::NAME, self.window, self.itakura_max_slope)
    }
}

/// Weighted dynamic time warping.
///
/// Each cell's squared pointwise cost is multiplied by
/// `w(k) = 1 / (1 + exp(-g * (k - L/2)))`, where `k = |i - j|` is the phase
/// difference and `L` the length of the longer series. Larger `g` penalizes
/// warping more steeply; `g = 0` weights every cell by `1/2`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Wdtw;

fn logistic_weights(g: f64, len: usize) -> Vec<f64> {
    let half = len as f64 / 2.0;
    (0..len)
        .map(|k| 1.0 / (1.0 + (-g * (k as f64 - half)).exp()))
        .collect()
}

fn wdtw_distance(
    x: &ArrayView2<'_, f64>,
    y: &ArrayView2<'_, f64>,
    bounds: &BoundingMatrix,
    weights: &[f64],
) -> f64 {
    dtw_cost(x, y, bounds, |k| weights[k])
}

struct WdtwKernel {
    g: f64,
    bounding: Bounding,
    bounds: BoundingMatrix,
    weights: Vec<f64>,
}

impl Kernel for WdtwKernel {
    fn eval(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        if x.nrows() != y.nrows() {
            return f64::NAN;
        }
        let (n, m) = (x.ncols(), y.ncols());
        if self.bounds.fits(n, m) {
            wdtw_distance(&x, &y, &self.bounds, &self.weights)
        } else {
            let bounds = BoundingMatrix::new(n, m, self.bounding);
            let weights = logistic_weights(self.g, n.max(m));
            wdtw_distance(&x, &y, &bounds, &weights)
        }
    }
}

impl DistanceMetric for Wdtw {
    type Config = WdtwConfig;

    const NAME: &'static str = "wdtw";

    fn build_specialized(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        config: &Self::Config,
        backend: &dyn Specializer,
    ) -> Result<SpecializedCallable, DistanceError> {
        let bounding = config.validate()?;
        require_non_empty(Self::NAME, &x, &y)?;
        require_equal_channels(Self::NAME, &x, &y)?;

        let (n, m) = (x.ncols(), y.ncols());
        let kernel = WdtwKernel {
            g: config.g,
            bounding,
            bounds: BoundingMatrix::new(n, m, bounding),
            weights: logistic_weights(config.g, n.max(m)),
        };
        specialize(Routine::new(Self::NAME, kernel), &x, &y, backend)
    }

    fn raw_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        let (n, m) = (x.ncols(), y.ncols());
        let bounds = BoundingMatrix::new(n, m, Bounding::Full);
        wdtw_distance(&x, &y, &bounds, &logistic_weights(DEFAULT_G, n.max(m)))
    }
}
