use ndarray::{Array2, ArrayD, IxDyn};
use proptest::prelude::*;
use tsdist::{
    distance, distance_factory, DistanceError, DtwConfig, InvalidInput, Metric, MetricConfig,
    Operand,
};

fn arb_series(channels: usize, len: usize) -> impl Strategy<Value = Array2<f64>> {
    prop::collection::vec(-10.0..10.0_f64, channels * len)
        .prop_map(move |v| Array2::from_shape_vec((channels, len), v).unwrap())
}

/// Two series with the same channel count and independent lengths.
fn arb_pair() -> impl Strategy<Value = (Array2<f64>, Array2<f64>)> {
    (1usize..4, 1usize..20, 1usize..20)
        .prop_flat_map(|(c, n, m)| (arb_series(c, n), arb_series(c, m)))
}

/// Two series of identical shape.
fn arb_aligned_pair() -> impl Strategy<Value = (Array2<f64>, Array2<f64>)> {
    (1usize..4, 1usize..20).prop_flat_map(|(c, n)| (arb_series(c, n), arb_series(c, n)))
}

fn arb_metric() -> impl Strategy<Value = Metric> {
    prop::sample::select(Metric::ALL.to_vec())
}

fn is_lockstep(metric: Metric) -> bool {
    matches!(metric, Metric::Absolute | Metric::Squared | Metric::Euclidean)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn proptest_self_distance_is_zero(
        x in (1usize..4, 1usize..20).prop_flat_map(|(c, n)| arb_series(c, n)),
        metric in arb_metric(),
    ) {
        let d = distance(&x, &x, &metric.default_config()).unwrap();
        prop_assert_eq!(d, 0.0, "{} on identical input", metric);
    }

    #[test]
    fn proptest_one_shot_equals_factory(
        (x, y) in arb_aligned_pair(),
        metric in arb_metric(),
    ) {
        let cfg = metric.default_config();
        let one_shot = distance(&x, &y, &cfg).unwrap();
        let callable = distance_factory(&x, &y, &cfg).unwrap();
        prop_assert_eq!(one_shot.to_bits(), callable.call(x.view(), y.view()).to_bits());
    }

    #[test]
    fn proptest_elastic_distances_are_finite_and_non_negative(
        (x, y) in arb_pair(),
        metric in arb_metric(),
    ) {
        prop_assume!(!is_lockstep(metric));
        let d = distance(&x, &y, &metric.default_config()).unwrap();
        prop_assert!(d.is_finite() && d >= 0.0, "{}: {}", metric, d);
        if matches!(metric, Metric::Lcss | Metric::Edr) {
            prop_assert!(d <= 1.0, "{} must be normalized: {}", metric, d);
        }
    }

    #[test]
    fn proptest_lockstep_symmetry((x, y) in arb_aligned_pair()) {
        for cfg in [MetricConfig::Absolute, MetricConfig::Squared, MetricConfig::Euclidean] {
            let xy = distance(&x, &y, &cfg).unwrap();
            let yx = distance(&y, &x, &cfg).unwrap();
            prop_assert_eq!(xy.to_bits(), yx.to_bits());
        }
    }

    #[test]
    fn proptest_euclidean_is_root_of_squared((x, y) in arb_aligned_pair()) {
        let squared = distance(&x, &y, &MetricConfig::Squared).unwrap();
        let euclidean = distance(&x, &y, &MetricConfig::Euclidean).unwrap();
        prop_assert!((euclidean * euclidean - squared).abs() <= 1e-9 * (1.0 + squared));
    }

    #[test]
    fn proptest_dtw_never_exceeds_squared_euclidean((x, y) in arb_aligned_pair()) {
        // the diagonal path is always admissible
        let dtw = distance(&x, &y, &MetricConfig::Dtw(DtwConfig::default())).unwrap();
        let diagonal = MetricConfig::Dtw(DtwConfig::default().with_window(0.0));
        let banded = distance(&x, &y, &diagonal).unwrap();
        let squared = distance(&x, &y, &MetricConfig::Squared).unwrap();
        prop_assert!(dtw <= squared + 1e-9 * (1.0 + squared), "{} > {}", dtw, squared);
        prop_assert!(dtw <= banded + 1e-9 * (1.0 + banded), "{} > {}", dtw, banded);
    }

    #[test]
    fn proptest_wrong_rank_is_reported_for_every_metric(
        shape in prop_oneof![
            (1usize..6).prop_map(|n| vec![n]),
            (1usize..3, 1usize..3, 1usize..6).prop_map(|(a, b, c)| vec![a, b, c]),
        ],
        metric in arb_metric(),
    ) {
        let rank = shape.len();
        let bad = ArrayD::<f64>::zeros(IxDyn(&shape));
        let good = Array2::<f64>::zeros((1, 4));

        let err = distance_factory(&good, &bad, &metric.default_config()).unwrap_err();
        prop_assert_eq!(
            err,
            DistanceError::InvalidInput(InvalidInput::WrongRank {
                operand: Operand::Y,
                actual: rank,
            })
        );
    }
}
