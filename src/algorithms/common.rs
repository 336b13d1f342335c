use ndarray::ArrayView2;

/// Squared Euclidean distance between timepoint `i` of `x` and timepoint `j`
/// of `y`, taken across channels.
#[inline]
pub fn squared_point_distance(
    x: &ArrayView2<'_, f64>,
    i: usize,
    y: &ArrayView2<'_, f64>,
    j: usize,
) -> f64 {
    x.column(i)
        .iter()
        .zip(y.column(j).iter())
        .map(|(a, b)| {
            let d = a - b;
            d * d
        })
        .sum()
}

/// Squared Euclidean distance between timepoint `i` of `x` and a constant
/// point with every channel equal to `g`.
#[inline]
pub fn squared_gap_distance(x: &ArrayView2<'_, f64>, i: usize, g: f64) -> f64 {
    x.column(i)
        .iter()
        .map(|a| {
            let d = a - g;
            d * d
        })
        .sum()
}

/// Population standard deviation over every element of `x`.
pub fn std_dev(x: &ArrayView2<'_, f64>) -> f64 {
    let n = x.len();
    if n == 0 {
        return 0.0;
    }
    let n_f = n as f64;
    let mean = x.iter().sum::<f64>() / n_f;
    let var = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n_f;
    var.max(0.0).sqrt()
}

/// Two rolling rows of an `(n + 1) x (m + 1)` dynamic-programming matrix.
///
/// Only the previous and current rows are kept; `advance` makes the current
/// row the previous one and resets the new current row to `fill`.
#[derive(Debug, Clone)]
pub struct RollingRows {
    prev: Vec<f64>,
    curr: Vec<f64>,
    fill: f64,
}

impl RollingRows {
    pub fn new(m: usize, fill: f64) -> Self {
        Self {
            prev: vec![fill; m + 1],
            curr: vec![fill; m + 1],
            fill,
        }
    }

    #[inline]
    pub fn prev(&self) -> &[f64] {
        &self.prev
    }

    #[inline]
    pub fn prev_mut(&mut self) -> &mut [f64] {
        &mut self.prev
    }

    #[inline]
    pub fn curr(&self) -> &[f64] {
        &self.curr
    }

    #[inline]
    pub fn curr_mut(&mut self) -> &mut [f64] {
        &mut self.curr
    }

    /// Both rows at once, for the inner recurrence.
    #[inline]
    pub fn split(&mut self) -> (&[f64], &mut [f64]) {
        (&self.prev, &mut self.curr)
    }

    pub fn advance(&mut self) {
        std::mem::swap(&mut self.prev, &mut self.curr);
        let fill = self.fill;
        self.curr.iter_mut().for_each(|v| *v = fill);
    }
}
