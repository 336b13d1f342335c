use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::algorithms::bounding::{Bounding, BoundingMatrix};
use crate::algorithms::common::{squared_point_distance, RollingRows};
use crate::core::config::{require_positive, resolve_bounding};
use crate::core::distance_metric::{
    require_equal_channels, require_non_empty, specialize, DistanceMetric,
};
use crate::core::error::{DistanceError, SpecializationError};
use crate::core::specializer::{Kernel, Routine, SpecializedCallable, Specializer};

/// Parameters of the longest-common-subsequence distance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LcssConfig {
    /// Two timepoints match when their Euclidean distance is at most `epsilon`.
    pub epsilon: f64,
    pub window: Option<f64>,
    pub itakura_max_slope: Option<f64>,
}

impl Default for LcssConfig {
    fn default() -> Self {
        Self {
            epsilon: 1.0,
            window: None,
            itakura_max_slope: None,
        }
    }
}

impl LcssConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
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
        require_positive(Lcss::NAME, "epsilon", self.epsilon)?;
        resolve_bounding(Lcss::NAME, self.window, self.itakura_max_slope)
    }
}

/// Longest common subsequence distance.
///
/// `d(x, y) = 1 - LCSS(x, y) / min(n, m)`, in `[0, 1]`. Matches are only
/// counted for cells inside the warping window.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lcss;

fn lcss_distance(
    x: &ArrayView2<'_, f64>,
    y: &ArrayView2<'_, f64>,
    bounds: &BoundingMatrix,
    epsilon: f64,
) -> f64 {
    let n = x.ncols();
    let m = y.ncols();
    let eps_sq = epsilon * epsilon;
    let mut rows = RollingRows::new(m, 0.0);

    for i in 1..=n {
        let band = bounds.row(i - 1);
        let inside = band.start + 1..band.end + 1;
        let (prev, curr) = rows.split();

        // cells outside the window never match, they only carry the count forward
        for j in 1..inside.start {
            curr[j] = prev[j].max(curr[j - 1]);
        }
        for j in inside.clone() {
            curr[j] = if squared_point_distance(x, i - 1, y, j - 1) <= eps_sq {
                prev[j - 1] + 1.0
            } else {
                prev[j].max(curr[j - 1])
            };
        }
        for j in inside.end..=m {
            curr[j] = prev[j].max(curr[j - 1]);
        }
        rows.advance();
    }

    let shortest = n.min(m);
    if shortest == 0 {
        return 1.0;
    }
    1.0 - rows.prev()[m] / shortest as f64
}

struct LcssKernel {
    epsilon: f64,
    bounding: Bounding,
    bounds: BoundingMatrix,
}

impl Kernel for LcssKernel {
    fn eval(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        if x.nrows() != y.nrows() {
            return f64::NAN;
        }
        let (n, m) = (x.ncols(), y.ncols());
        if self.bounds.fits(n, m) {
            lcss_distance(&x, &y, &self.bounds, self.epsilon)
        } else {
            let bounds = BoundingMatrix::new(n, m, self.bounding);
            lcss_distance(&x, &y, &bounds, self.epsilon)
        }
    }
}

impl DistanceMetric for Lcss {
    type Config = LcssConfig;

    const NAME: &'static str = "lcss";

    fn build_specialized(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        config: &Self::Config,
        backend: &dyn Specializer,
    ) -> Result<SpecializedCallable, DistanceError> {
        let bounding = config.validate()?;
        require_non_empty(Self::NAME, &x, &y)?;
        require_equal_channels(Self::NAME, &x, &y)?;
        let kernel = LcssKernel {
            epsilon: config.epsilon,
            bounding,
            bounds: BoundingMatrix::new(x.ncols(), y.ncols(), bounding),
        };
        specialize(Routine::new(Self::NAME, kernel), &x, &y, backend)
    }

    fn raw_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        let bounds = BoundingMatrix::new(x.ncols(), y.ncols(), Bounding::Full);
        lcss_distance(&x, &y, &bounds, LcssConfig::default().epsilon)
    }
}
