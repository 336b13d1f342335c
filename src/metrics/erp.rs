use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::algorithms::bounding::{Bounding, BoundingMatrix};
use crate::algorithms::common::{squared_gap_distance, squared_point_distance, RollingRows};
use crate::core::config::{require_finite, resolve_bounding};
use crate::core::distance_metric::{
    require_equal_channels, require_non_empty, specialize, DistanceMetric,
};
use crate::core::error::{DistanceError, SpecializationError};
use crate::core::specializer::{Kernel, Routine, SpecializedCallable, Specializer};

/// Parameters of edit distance with real penalty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ErpConfig {
    /// Reference value a timepoint is compared against when it is skipped.
    pub g: f64,
    pub window: Option<f64>,
    pub itakura_max_slope: Option<f64>,
}

impl ErpConfig {
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
        require_finite(Erp::NAME, "g", self.g)?;
        resolve_bounding(Erp::NAME, self.window, self.itakura_max_slope)
    }
}

/// Edit distance with real penalty (Chen & Ng, 2004).
///
/// Aligning two timepoints costs their Euclidean distance; skipping a
/// timepoint costs its Euclidean distance to the constant point `g`. Unlike
/// DTW, ERP is a metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct Erp;

fn erp_distance(
    x: &ArrayView2<'_, f64>,
    y: &ArrayView2<'_, f64>,
    bounds: &BoundingMatrix,
    g: f64,
) -> f64 {
    let n = x.ncols();
    let m = y.ncols();
    let gap_x: Vec<f64> = (0..n).map(|i| squared_gap_distance(x, i, g).sqrt()).collect();
    let gap_y: Vec<f64> = (0..m).map(|j| squared_gap_distance(y, j, g).sqrt()).collect();

    let mut rows = RollingRows::new(m, f64::INFINITY);
    {
        let first = rows.prev_mut();
        first[0] = 0.0;
        for j in 1..=m {
            first[j] = first[j - 1] + gap_y[j - 1];
        }
    }

    for i in 1..=n {
        let (prev, curr) = rows.split();
        curr[0] = prev[0] + gap_x[i - 1];
        for j0 in bounds.row(i - 1) {
            let j = j0 + 1;
            let matched = prev[j - 1] + squared_point_distance(x, i - 1, y, j0).sqrt();
            let skip_x = prev[j] + gap_x[i - 1];
            let skip_y = curr[j - 1] + gap_y[j0];
            curr[j] = matched.min(skip_x).min(skip_y);
        }
        rows.advance();
    }

    rows.prev()[m]
}

struct ErpKernel {
    g: f64,
    bounding: Bounding,
    bounds: BoundingMatrix,
}

impl Kernel for ErpKernel {
    fn eval(&self, x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        if x.nrows() != y.nrows() {
            return f64::NAN;
        }
        let (n, m) = (x.ncols(), y.ncols());
        if self.bounds.fits(n, m) {
            erp_distance(&x, &y, &self.bounds, self.g)
        } else {
            let bounds = BoundingMatrix::new(n, m, self.bounding);
            erp_distance(&x, &y, &bounds, self.g)
        }
    }
}

impl DistanceMetric for Erp {
    type Config = ErpConfig;

    const NAME: &'static str = "erp";

    fn build_specialized(
        x: ArrayView2<'_, f64>,
        y: ArrayView2<'_, f64>,
        config: &Self::Config,
        backend: &dyn Specializer,
    ) -> Result<SpecializedCallable, DistanceError> {
        let bounding = config.validate()?;
        require_non_empty(Self::NAME, &x, &y)?;
        require_equal_channels(Self::NAME, &x, &y)?;
        let kernel = ErpKernel {
            g: config.g,
            bounding,
            bounds: BoundingMatrix::new(x.ncols(), y.ncols(), bounding),
        };
        specialize(Routine::new(Self::NAME, kernel), &x, &y, backend)
    }

    fn raw_distance(x: ArrayView2<'_, f64>, y: ArrayView2<'_, f64>) -> f64 {
        let bounds = BoundingMatrix::new(x.ncols(), y.ncols(), Bounding::Full);
        erp_distance(&x, &y, &bounds, 0.0)
    }
}
