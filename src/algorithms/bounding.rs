use std::ops::Range;

/// Global constraint on the alignment path of an elastic distance.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Bounding {
    /// Every cell is admissible.
    #[default]
    Full,
    /// Sakoe–Chiba band of half-width `window * max(n, m)` around the scaled
    /// diagonal. `window` lies in `[0, 1]`.
    SakoeChiba { window: f64 },
    /// Itakura parallelogram. `max_slope = 0` admits only the diagonal,
    /// `max_slope = 1` admits every cell.
    Itakura { max_slope: f64 },
}

/// Admissible columns for each row of an `n x m` cost matrix.
///
/// Every row's range contains the scaled diagonal, row 0 starts at column 0,
/// the last row ends at column `m - 1`, and consecutive rows overlap or touch,
/// so a monotone path from `(0, 0)` to `(n - 1, m - 1)` always exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundingMatrix {
    n: usize,
    m: usize,
    /// Inclusive `(start, end)` columns per row.
    rows: Vec<(usize, usize)>,
}

impl BoundingMatrix {
    pub fn new(n: usize, m: usize, bounding: Bounding) -> Self {
        if n == 0 || m == 0 {
            return Self {
                n,
                m,
                rows: Vec::new(),
            };
        }

        let mut rows: Vec<(usize, usize)> = (0..n)
            .map(|i| {
                let u = if n == 1 {
                    0.0
                } else {
                    i as f64 / (n - 1) as f64
                };
                let (lo, hi) = match bounding {
                    Bounding::Full => (0.0, 1.0),
                    Bounding::SakoeChiba { window } => {
                        let radius = (window * n.max(m) as f64).floor();
                        let scale = (m - 1) as f64;
                        if scale == 0.0 {
                            (0.0, 1.0)
                        } else {
                            (u - radius / scale, u + radius / scale)
                        }
                    }
                    Bounding::Itakura { max_slope } => itakura_row(u, max_slope),
                };
                column_range(u, lo, hi, m)
            })
            .collect();

        rows[0].0 = 0;
        rows[n - 1].1 = m - 1;
        for i in 1..n {
            let start = rows[i].0;
            if start > rows[i - 1].1 + 1 {
                rows[i - 1].1 = start - 1;
            }
        }

        Self { n, m, rows }
    }

    pub fn n_rows(&self) -> usize {
        self.n
    }

    pub fn n_cols(&self) -> usize {
        self.m
    }

    /// Admissible columns of row `i`. Empty when the matrix has no columns.
    #[inline]
    pub fn row(&self, i: usize) -> Range<usize> {
        match self.rows.get(i) {
            Some(&(start, end)) => start..end + 1,
            None => 0..0,
        }
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        i < self.n && self.row(i).contains(&j)
    }

    /// Whether this matrix was built for an `n x m` problem.
    #[inline]
    pub fn fits(&self, n: usize, m: usize) -> bool {
        self.n == n && self.m == m
    }
}

/// Normalized column bounds of the Itakura parallelogram at row position `u`.
fn itakura_row(u: f64, max_slope: f64) -> (f64, f64) {
    if max_slope >= 1.0 {
        return (0.0, 1.0);
    }
    let s = 1.0 / (1.0 - max_slope);
    let lo = (u / s).max(1.0 - s * (1.0 - u));
    let hi = (s * u).min(1.0 - (1.0 - u) / s);
    (lo, hi)
}

/// Convert normalized bounds to an inclusive column range that also covers
/// the scaled diagonal.
fn column_range(u: f64, lo: f64, hi: f64, m: usize) -> (usize, usize) {
    let scale = (m - 1) as f64;
    let diag = (u * scale).round() as usize;
    let start = (lo * scale - 1e-9).ceil().max(0.0) as usize;
    let end = ((hi * scale + 1e-9).floor().max(0.0) as usize).min(m - 1);
    (start.min(diag), end.max(diag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_connected(b: &BoundingMatrix) {
        assert_eq!(b.row(0).start, 0);
        assert_eq!(b.row(b.n_rows() - 1).end, b.n_cols());
        for i in 1..b.n_rows() {
            assert!(
                b.row(i).start <= b.row(i - 1).end,
                "rows {} and {i} are disconnected: {:?} / {:?}",
                i - 1,
                b.row(i - 1),
                b.row(i)
            );
        }
    }

    #[test]
    fn test_full_bounding_admits_everything() {
        let b = BoundingMatrix::new(4, 6, Bounding::Full);
        for i in 0..4 {
            assert_eq!(b.row(i), 0..6);
        }
    }

    #[test]
    fn test_zero_window_is_diagonal_for_square() {
        let b = BoundingMatrix::new(5, 5, Bounding::SakoeChiba { window: 0.0 });
        for i in 0..5 {
            assert_eq!(b.row(i), i..i + 1);
        }
        assert_connected(&b);
    }

    #[test]
    fn test_sakoe_chiba_band_width() {
        // radius = floor(0.2 * 10) = 2
        let b = BoundingMatrix::new(10, 10, Bounding::SakoeChiba { window: 0.2 });
        assert_eq!(b.row(0), 0..3);
        assert_eq!(b.row(5), 3..8);
        assert_eq!(b.row(9), 7..10);
        assert!(b.contains(5, 7));
        assert!(!b.contains(5, 8));
    }

    #[test]
    fn test_full_window_equals_full_bounding() {
        let a = BoundingMatrix::new(7, 9, Bounding::SakoeChiba { window: 1.0 });
        let b = BoundingMatrix::new(7, 9, Bounding::Full);
        assert_eq!(a, b);
    }

    #[test]
    fn test_unequal_lengths_stay_connected() {
        for (n, m) in [(3, 11), (11, 3), (1, 5), (5, 1), (2, 2)] {
            let b = BoundingMatrix::new(n, m, Bounding::SakoeChiba { window: 0.0 });
            assert_connected(&b);
            let b = BoundingMatrix::new(n, m, Bounding::Itakura { max_slope: 0.0 });
            assert_connected(&b);
        }
    }

    #[test]
    fn test_itakura_narrows_at_the_ends() {
        let b = BoundingMatrix::new(11, 11, Bounding::Itakura { max_slope: 0.5 });
        assert_connected(&b);
        let width = |i: usize| b.row(i).len();
        assert!(width(0) < width(5), "row 0 {:?} vs row 5 {:?}", b.row(0), b.row(5));
        assert!(width(10) < width(5));
        assert!(b.contains(5, 5));
    }

    #[test]
    fn test_rows_are_empty_without_columns() {
        let b = BoundingMatrix::new(3, 0, Bounding::SakoeChiba { window: 0.1 });
        for i in 0..3 {
            assert!(b.row(i).is_empty(), "row {i}: {:?}", b.row(i));
            assert!(!b.contains(i, 0));
        }
    }

    #[test]
    fn test_itakura_full_slope_is_full() {
        let a = BoundingMatrix::new(6, 4, Bounding::Itakura { max_slope: 1.0 });
        let b = BoundingMatrix::new(6, 4, Bounding::Full);
        assert_eq!(a, b);
    }
}
