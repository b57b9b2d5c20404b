//! Contour ordering: acceptance, noise handling, failure paths and the retry bound.

use super::*;
use crate::neighbors::nearest_neighbor_graph;
use crate::sample::{sample_outline, OutlineCfg, ReplayToken};
use nalgebra::Vector2;
use proptest::prelude::*;

fn ring(n: usize, radius: f64, center: Vector2<f64>) -> Vec<Vector2<f64>> {
    (0..n)
        .map(|k| {
            let th = std::f64::consts::TAU * k as f64 / n as f64;
            center + Vector2::new(th.cos(), th.sin()) * radius
        })
        .collect()
}

/// True if consecutive entries (cyclically) differ by ±1 modulo `n`.
fn is_cyclic_walk(order: &[usize], n: usize) -> bool {
    (0..order.len()).all(|i| {
        let a = order[i];
        let b = order[(i + 1) % order.len()];
        (a + 1) % n == b || (b + 1) % n == a
    })
}

#[test]
fn sequential_closed_contour_accepted_first_try() {
    let pts = ring(12, 1.0, Vector2::zeros());
    let out = order_contour(&pts, &OrderCfg::default()).unwrap();
    assert_eq!(out.attempts, 1);
    assert_eq!(out.cut_index, 0);
    assert_eq!(out.contour.len(), 12);
    assert_eq!(out.contour.topology(), ContourTopology::Closed);
    assert!(is_cyclic_walk(out.contour.source(), 12));
    // The walk ends where the cut arc started from.
    assert_eq!(out.contour.source()[0], out.cut.0);
    assert_eq!(*out.contour.source().last().unwrap(), out.cut.1);
}

#[test]
fn shuffled_outline_recovers_the_loop() {
    let n = 200;
    let cfg = OutlineCfg {
        points: n,
        shuffle: false,
        ..OutlineCfg::default()
    };
    let walk = sample_outline(cfg, ReplayToken { seed: 9, index: 3 });
    // Scatter with a fixed permutation: cloud[i] = walk[perm[i]].
    let perm: Vec<usize> = (0..n).map(|i| (i * 7) % n).collect();
    let cloud: Vec<Vector2<f64>> = perm.iter().map(|&j| walk[j]).collect();

    let out = order_contour(&cloud, &OrderCfg::default()).unwrap();
    assert_eq!(out.contour.len(), n);
    let recovered: Vec<usize> = out.contour.source().iter().map(|&i| perm[i]).collect();
    assert!(is_cyclic_walk(&recovered, n));
    for (k, &i) in out.contour.source().iter().enumerate() {
        assert_eq!(out.contour.points()[k], cloud[i]);
    }
}

#[test]
fn small_noise_component_is_dropped() {
    let mut pts = ring(40, 1.0, Vector2::zeros());
    pts.extend(ring(5, 0.05, Vector2::new(10.0, 10.0)));
    let out = order_contour(&pts, &OrderCfg::default()).unwrap();
    assert_eq!(out.contour.len(), 40);
    assert!(out.contour.source().iter().all(|&i| i < 40));
}

#[test]
fn duplicate_points_do_not_break_the_loop() {
    let mut pts = ring(30, 1.0, Vector2::zeros());
    pts.push(pts[0]);
    pts.push(pts[17]);
    let out = order_contour(&pts, &OrderCfg::default()).unwrap();
    assert_eq!(out.contour.len(), 30);
    let mut seen = out.contour.source().to_vec();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 30);
}

fn triangles(count: usize) -> Vec<Vector2<f64>> {
    (0..count)
        .flat_map(|c| ring(3, 0.1, Vector2::new(20.0 * c as f64, 0.0)))
        .collect()
}

#[test]
fn fragmented_cloud_reports_low_coverage() {
    let pts = triangles(10);
    let cfg = OrderCfg {
        component: ComponentSelection::All,
        ..OrderCfg::default()
    };
    let nn = nearest_neighbor_graph(&pts, cfg.neighbors).unwrap();
    assert_eq!(arc_budget(&nn, &cfg), 60);
    let err = order_neighbor_graph(&nn, &cfg).unwrap_err();
    assert_eq!(
        err,
        ContourError::CoverageTooLow {
            attempts: 6,
            best_len: 3,
            required: 15
        }
    );
    assert!(err.is_recoverable());
}

#[test]
fn largest_component_tie_takes_the_first() {
    let pts = triangles(4);
    let err = order_contour(&pts, &OrderCfg::default()).unwrap_err();
    // One triangle: 6 arcs, a single attempt at l = 0.
    assert!(matches!(
        err,
        ContourError::CoverageTooLow {
            attempts: 1,
            best_len: 3,
            ..
        }
    ));
}

#[test]
fn open_arc_has_no_long_walk() {
    // Half circle: the ends close into small triangles, everything else is a bridge.
    let pts: Vec<Vector2<f64>> = (0..30)
        .map(|k| {
            let th = std::f64::consts::PI * k as f64 / 29.0;
            Vector2::new(th.cos(), th.sin())
        })
        .collect();
    let err = order_contour(&pts, &OrderCfg::default()).unwrap_err();
    match err {
        ContourError::CoverageTooLow { best_len, required, .. } => {
            assert!(best_len <= 3);
            assert_eq!(required, 15);
        }
        other => panic!("expected low coverage, got {other:?}"),
    }
}

#[test]
fn coverage_threshold_is_configurable() {
    let pts = triangles(4);
    let lenient = OrderCfg {
        min_coverage: 0.2,
        ..OrderCfg::default()
    };
    // 3 > floor(0.2 * 12) = 2.
    let out = order_contour(&pts, &lenient).unwrap();
    assert_eq!(out.contour.len(), 3);
}

#[test]
fn fatal_errors_are_not_recoverable() {
    let err = ContourError::from(crate::GraphError::ArcOutOfRange { arc: 5, len: 2 });
    assert!(!err.is_recoverable());
    assert!(ContourError::TooFewPoints {
        distinct: 1,
        needed: 3
    }
    .is_recoverable());
}

proptest! {
    #[test]
    fn retry_loop_is_bounded(
        raw in prop::collection::vec((0.0f64..1.0, 0.0f64..1.0), 3..60),
        step in 1usize..15,
    ) {
        let pts: Vec<Vector2<f64>> = raw.into_iter().map(|(x, y)| Vector2::new(x, y)).collect();
        let cfg = OrderCfg { retry_step: step, ..OrderCfg::default() };
        let nn = nearest_neighbor_graph(&pts, cfg.neighbors);
        prop_assume!(nn.is_ok());
        let nn = nn.unwrap();
        let bound = arc_budget(&nn, &cfg) / step + 1;
        let attempts = match order_neighbor_graph(&nn, &cfg) {
            Ok(found) => {
                prop_assert!(found.contour.len() > nn.len() / 2);
                found.attempts
            }
            Err(ContourError::CoverageTooLow { attempts, .. }) => attempts,
            Err(other) => return Err(TestCaseError::fail(format!("unexpected {other}"))),
        };
        prop_assert!(attempts <= bound);
    }
}
