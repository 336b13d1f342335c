use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::algorithms::bounding::{Bounding, BoundingMatrix};
use crate::algorithms::common::{squared_point_distance, std_dev, RollingRows};
use crate::core::config::{require_positive, resolve_bounding};
use crate::core::distance_metric::{
    require_equal_channels, require_non_empty, specialize, DistanceMetric,
};
use crate::core::error::{DistanceError, SpecializationError};
use crate::core::specializer::{Kernel, Routine, SpecializedCallable, Specializer};

/// Parameters of edit distance on real sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EdrConfig {
    /// Matching threshold on the Euclidean distance between timepoints.
    /// When unset, a quarter of the larger operand standard deviation is used,
    /// computed afresh for every pair.
    pub epsilon: Option<f64>,
    pub window: Option<f64>,
    pub itakura_max_slope: Option<f64>,
}

impl EdrConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
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
        if let Some(epsilon) = self.epsilon {
            require_positive(Edr::NAME, "epsilon", epsilon)?;
        }
        resolve_bounding(Edr::NAME, self.window, self.itakura_max_slope)
    }
}

/// Edit distance on real sequences (Chen, Özsu & Oria, 2005).
///
/// Counts the edits needed to turn one series into the other, where two
/// timepoints within `epsilon` of each other match for free. Normalized by
/// the longer length, so the result lies in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Edr;

fn default_epsilon(x: &ArrayView2<'_, f64>, y: &ArrayView2<'_, f64>) -> f64 {
    std_dev(x).max(std_dev(y)) / 4.0
}

fn edr_distance(
    x: &ArrayView2<'_, f64>,
    y: &ArrayView2<'_, f64>,
    bounds: &BoundingMatrix,
    epsilon: Option<f64>,
) -> f64 {
    let n = x.ncols();
    let m = y.ncols();
    let longest = n.max(m);
    if longest == 0 {
        return 0.0;
    }
    let epsilon = epsilon.unwrap_or_else(|| default_epsilon(x, y));
    let eps_sq = epsilon * epsilon;

    let mut rows = RollingRows::new(m, f64::INFINITY);
    for (j, v) in rows.prev_mut().iter_mut().enumerate() {
        *v = j as f64;
    }

    for i in 1..=n {
        let (prev, curr) = rows.split();
        curr[0] = i as f64;
        for j0 in bounds.row(i - 1) {
            let j = j0 + 1;
            let substitution = if squared_point_distance(x, i - 1, y, j0) <= eps_sq {
                0.0
            } else {
                1.0
            };
            curr[j] = (prev[j - 1] + substitution)
                .min(prev[j] + 1.0)
                .min(curr[j - 1] + 1.0);
        }
        rows.advance();
    }

    rows.prev()[m] / longest as f64
}

struct EdrKernel {
    epsilon: Option<f64>,
    bounding: Bounding,
    bounds: BoundingMatrix,
}

impl Kernel for EdrKernel {
    fn eval(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        if x.nrows() != y.nrows() {
            return f64::NAN;
        }
        let (n, m) = (x.ncols(), y.ncols());
        if self.bounds.fits(n, m) {
            edr_distance(&x, &y, &self.bounds, self.epsilon)
        } else {
            let bounds = BoundingMatrix::new(n, m, self.bounding);
            edr_distance(&x, &y, &bounds, self.epsilon)
        }
    }
}

impl DistanceMetric for Edr {
    type Config = EdrConfig;

    const NAME: &'static str = "edr";

    fn build_specialized(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        config: &Self::Config,
        backend: &dyn Specializer,
    ) -> Result<SpecializedCallable, DistanceError> {
        let bounding = config.validate()?;
        require_non_empty(Self::NAME, &x, &y)?;
        require_equal_channels(Self::NAME, &x, &y)?;
        let kernel = EdrKernel {
            epsilon: config.epsilon,
            bounding,
            bounds: BoundingMatrix::new(x.ncols(), y.ncols(), bounding),
        };
        specialize(Routine::new(Self::NAME, kernel), &x, &y, backend)
    }

    fn raw_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        let bounds = BoundingMatrix::new(x.ncols(), y.ncols(), Bounding::Full);
        edr_distance(&x, &y, &bounds, None)
    }
}
