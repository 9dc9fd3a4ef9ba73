//! End-to-end query behavior over synthetic datasets.
//!
//! Values are affine functions of position wherever exactness is checked,
//! since linear interpolation over any simplex reproduces them.

use approx::assert_relative_eq;
use ndarray::Array2;
use spatialdb_algorithms::interpolation::{find_nearest, Basis, Tolerances, MAX_CANDIDATES};
use spatialdb_algorithms::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Build a dataset whose single value "v" is `f` evaluated at each point
fn affine_dataset(
    points: &[[f64; 3]],
    f: impl Fn(&[f64; 3]) -> f64,
    topology: Topology,
) -> Dataset {
    let values =
        Array2::from_shape_vec((points.len(), 1), points.iter().map(&f).collect()).unwrap();
    Dataset::new(vec!["v".into()], points.to_vec(), values, topology).unwrap()
}

fn linear_engine(ds: &Dataset) -> QueryEngine<'_> {
    let mut engine = QueryEngine::new(ds);
    engine.set_query_values(&["v"]).unwrap();
    engine
}

fn cube_grid(n: usize) -> Vec<[f64; 3]> {
    let mut pts = Vec::with_capacity(n * n * n);
    for x in 0..n {
        for y in 0..n {
            for z in 0..n {
                pts.push([x as f64, y as f64, z as f64]);
            }
        }
    }
    pts
}

/// Deterministic scatter in a ~10 unit cube
fn scattered(n: usize) -> Vec<[f64; 3]> {
    (0..n)
        .map(|i| {
            [
                ((i * 37 + 11) % 97) as f64 / 9.7,
                ((i * 53 + 29) % 89) as f64 / 8.9,
                ((i * 71 + 5) % 83) as f64 / 8.3,
            ]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn two_point_line_scenario() {
    init_tracing();
    let ds = Dataset::from_flat(
        vec!["v".into()],
        &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0],
        vec![10.0, 20.0],
        Topology::Line,
    )
    .unwrap();
    let mut engine = linear_engine(&ds);

    let mut out = [0.0];
    engine.query(&mut out, 1.0, 0.0, 0.0).unwrap();
    assert_relative_eq!(out[0], 15.0);

    engine.set_query_mode(QueryMode::Nearest);
    engine.query(&mut out, 0.0, 0.0, 0.0).unwrap();
    assert_eq!(out[0], 10.0);
}

#[test]
fn right_triangle_centroid_scenario() {
    let ds = Dataset::from_flat(
        vec!["v".into()],
        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        vec![0.0, 1.0, 1.0],
        Topology::Area,
    )
    .unwrap();
    let engine = linear_engine(&ds);

    let mut out = [0.0];
    engine.query(&mut out, 1.0 / 3.0, 1.0 / 3.0, 0.0).unwrap();
    assert_relative_eq!(out[0], 2.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn unknown_value_lists_available_names() {
    let ds = Dataset::from_flat(
        vec!["one".into(), "two".into()],
        &[0.0, 0.0, 0.0],
        vec![1.0, 2.0],
        Topology::Point,
    )
    .unwrap();
    let mut engine = QueryEngine::new(&ds);

    let err = engine.set_query_values(&["nonexistent"]).unwrap_err();
    assert!(matches!(err, Error::ValueNotFound { .. }));
    let msg = err.to_string();
    assert!(msg.contains("nonexistent"), "{msg}");
    assert!(msg.contains("one, two"), "{msg}");
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn nearest_mode_returns_closest_location() {
    // Value of each location is its own index
    let pts = scattered(300);
    let values = Array2::from_shape_fn((pts.len(), 1), |(i, _)| i as f64);
    let ds = Dataset::new(vec!["id".into()], pts.clone(), values, Topology::Volume).unwrap();
    let mut engine = QueryEngine::new(&ds);
    engine.set_query_mode(QueryMode::Nearest);
    engine.set_query_values(&["id"]).unwrap();

    let dist_sq = |p: &[f64; 3], q: &[f64; 3]| {
        (p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2) + (p[2] - q[2]).powi(2)
    };

    let mut out = [0.0];
    for q in [[0.0, 0.0, 0.0], [5.1, 4.9, 5.3], [9.9, 0.2, 7.7], [-3.0, 12.0, 4.0]] {
        engine.query(&mut out, q[0], q[1], q[2]).unwrap();
        let chosen = dist_sq(&pts[out[0] as usize], &q);
        for p in &pts {
            assert!(chosen <= dist_sq(p, &q), "chosen location is not the closest");
        }
    }
}

#[test]
fn candidate_list_is_sorted_and_capped() {
    let pts = scattered(400);
    let ds = affine_dataset(&pts, |_| 0.0, Topology::Volume);
    let list = find_nearest(&ds, &[4.0, 4.0, 4.0]);

    assert_eq!(list.len(), MAX_CANDIDATES);
    for pair in list.as_slice().windows(2) {
        assert!(pair[0].distance_sq <= pair[1].distance_sq);
    }

    let small = affine_dataset(&pts[..7], |_| 0.0, Topology::Volume);
    assert_eq!(find_nearest(&small, &[4.0, 4.0, 4.0]).len(), 7);
}

#[test]
fn point_topology_linear_equals_nearest() {
    let ds = Dataset::from_flat(
        vec!["a".into(), "b".into()],
        &[3.0, -1.0, 2.0],
        vec![7.5, -2.0],
        Topology::Point,
    )
    .unwrap();
    let mut engine = QueryEngine::new(&ds);
    engine.set_query_values(&["b", "a"]).unwrap();

    for q in [[0.0, 0.0, 0.0], [3.0, -1.0, 2.0], [1e4, -1e4, 5.0]] {
        let mut linear = [0.0; 2];
        let mut nearest = [0.0; 2];
        engine.set_query_mode(QueryMode::Linear);
        engine.query(&mut linear, q[0], q[1], q[2]).unwrap();
        engine.set_query_mode(QueryMode::Nearest);
        engine.query(&mut nearest, q[0], q[1], q[2]).unwrap();
        assert_eq!(linear, nearest);
        assert_eq!(linear, [-2.0, 7.5]);
    }
}

#[test]
fn line_reproduces_affine_values() {
    let pts: Vec<[f64; 3]> = (0..10).map(|i| [i as f64 * 0.7, 0.0, 0.0]).collect();
    let f = |p: &[f64; 3]| -3.0 * p[0] + 1.0;
    let ds = affine_dataset(&pts, f, Topology::Line);
    let engine = linear_engine(&ds);

    let mut out = [0.0];
    for q in [[0.1, 0.0, 0.0], [3.33, 0.0, 0.0], [6.3, 0.0, 0.0], [2.0, 0.5, -1.0]] {
        engine.query(&mut out, q[0], q[1], q[2]).unwrap();
        assert_relative_eq!(out[0], f(&[q[0], 0.0, 0.0]), epsilon = 1e-9);
    }
}

#[test]
fn area_reproduces_affine_values() {
    let mut pts = Vec::new();
    for x in 0..9 {
        for y in 0..9 {
            pts.push([x as f64 * 0.5, y as f64 * 0.5, 0.0]);
        }
    }
    let f = |p: &[f64; 3]| 1.5 * p[0] + 4.0 * p[1] - 2.0;
    let ds = affine_dataset(&pts, f, Topology::Area);
    let engine = linear_engine(&ds);

    let mut out = [0.0];
    for q in [[1.1, 2.3, 0.0], [3.9, 0.1, 0.0], [0.26, 3.74, 0.0]] {
        engine.query(&mut out, q[0], q[1], q[2]).unwrap();
        assert_relative_eq!(out[0], f(&q), epsilon = 1e-9);
    }

    // Off-plane points interpolate at their projection
    engine.query(&mut out, 2.0, 2.0, 1.5).unwrap();
    assert_relative_eq!(out[0], f(&[2.0, 2.0, 0.0]), epsilon = 1e-9);
}

#[test]
fn volume_reproduces_affine_values_on_grid() {
    // 125 locations, more than the candidate cap
    let pts = cube_grid(5);
    let f = |p: &[f64; 3]| 2.0 * p[0] - 3.0 * p[1] + 0.5 * p[2] + 7.0;
    let ds = affine_dataset(&pts, f, Topology::Volume);
    let engine = linear_engine(&ds);

    let mut out = [0.0];
    for q in [
        [1.3, 2.6, 1.7],
        [2.2, 0.4, 3.1],
        [0.5, 0.5, 0.5],
        [3.9, 3.1, 0.2],
        [2.0, 2.0, 2.0],
        [1.25, 3.75, 2.5],
    ] {
        engine.query(&mut out, q[0], q[1], q[2]).unwrap();
        assert_relative_eq!(out[0], f(&q), epsilon = 1e-9);
    }
}

#[test]
fn volume_weights_normalized_and_exact_when_basis_found() {
    let pts = scattered(400);
    let f = |p: &[f64; 3]| 0.5 * p[0] + 2.0 * p[1] - p[2] + 3.0;
    let ds = affine_dataset(&pts, f, Topology::Volume);
    let engine = linear_engine(&ds);
    let tol = Tolerances::default();

    let mut found = 0;
    let mut total = 0;
    let mut out = [0.0];
    for i in 0..5 {
        for j in 0..5 {
            for k in 0..5 {
                let q = [
                    2.13 + 1.5 * i as f64,
                    2.07 + 1.5 * j as f64,
                    2.11 + 1.5 * k as f64,
                ];
                total += 1;

                let candidates = find_nearest(&ds, &q);
                let Ok(basis) = Basis::build(Topology::Volume, &ds, &candidates, &q, &tol) else {
                    assert!(engine.query(&mut out, q[0], q[1], q[2]).is_err());
                    continue;
                };
                found += 1;

                let sum: f64 = basis.weights().iter().map(|w| w.weight).sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-6);

                engine.query(&mut out, q[0], q[1], q[2]).unwrap();
                assert_relative_eq!(out[0], f(&q), epsilon = 1e-6, max_relative = 1e-6);
            }
        }
    }
    assert!(found > total / 2, "only {found}/{total} queries found a basis");
}

#[test]
fn value_order_follows_request() {
    let ds = Dataset::from_flat(
        vec!["one".into(), "two".into(), "three".into()],
        &[0.0, 0.0, 0.0, 4.0, 0.0, 0.0],
        vec![1.0, 2.0, 3.0, 5.0, 6.0, 7.0],
        Topology::Line,
    )
    .unwrap();
    let mut engine = QueryEngine::new(&ds);
    engine.set_query_values(&["TWO", "one"]).unwrap();

    let mut out = [0.0; 2];
    engine.query(&mut out, 1.0, 0.0, 0.0).unwrap();
    assert_relative_eq!(out[0], 3.0);
    assert_relative_eq!(out[1], 2.0);
}

#[test]
fn coincident_line_points_fail_descriptively() {
    let ds = Dataset::from_flat(
        vec!["v".into()],
        &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
        vec![1.0, 2.0, 3.0],
        Topology::Line,
    )
    .unwrap();
    let engine = linear_engine(&ds);

    let mut out = [0.0];
    let err = engine.query(&mut out, 2.0, 1.0, 1.0).unwrap_err();
    assert_eq!(
        err,
        Error::InsufficientPoints {
            topology: "line",
            x: 2.0,
            y: 1.0,
            z: 1.0
        }
    );
    assert!(err.to_string().contains("(2, 1, 1)"));
}

// ---------------------------------------------------------------------------
// Database facades
// ---------------------------------------------------------------------------

#[test]
fn simple_db_multiquery_marks_failures() {
    init_tracing();
    let ds = Dataset::from_flat(
        vec!["v".into()],
        &[0.0, 0.0, 0.0, 2.0, 0.0, 0.0],
        vec![10.0, 20.0],
        Topology::Line,
    )
    .unwrap();
    let mut db = SimpleDb::new("line", MemorySource::new(ds));
    db.open().unwrap();
    db.set_query_values(&["v"]).unwrap();

    let points = [[0.5, 0.0, 0.0], [5.0, 0.0, 0.0], [1.5, 0.0, 0.0]];
    let mut values = Array2::zeros((3, 1));
    let status = db.multiquery(&mut values, &points, &CoordSys::default()).unwrap();

    assert!(status[0].is_ok());
    assert!(matches!(status[1], Err(Error::InsufficientPoints { .. })));
    assert!(status[2].is_ok());
    assert_relative_eq!(values[[0, 0]], 12.5);
    assert!(values[[1, 0]].is_nan());
    assert_relative_eq!(values[[2, 0]], 17.5);
}

#[test]
fn multiquery_shape_checks() {
    let mut db = UniformDb::new("u", vec!["a".into()], vec![1.0]).unwrap();
    let points = [[0.0; 3]; 2];

    let mut values = Array2::zeros((2, 1));
    assert_eq!(
        db.multiquery(&mut values, &points, &CoordSys::default()).unwrap_err(),
        Error::QueryValuesNotSet
    );

    db.set_query_values(&["a"]).unwrap();
    let mut wrong_rows = Array2::zeros((3, 1));
    assert!(db.multiquery(&mut wrong_rows, &points, &CoordSys::default()).is_err());
    let mut wrong_cols = Array2::zeros((2, 2));
    assert!(db.multiquery(&mut wrong_cols, &points, &CoordSys::default()).is_err());
}

#[test]
fn filtered_simple_db_applies_offset() {
    let pts = cube_grid(3);
    let ds = affine_dataset(&pts, |p| p[0] + p[1] + p[2], Topology::Volume);
    let base = SimpleDb::new("grid", MemorySource::new(ds));
    let offset = UniformDb::new("offset", vec!["v".into()], vec![100.0]).unwrap();

    let mut db = FilteredDb::new("shifted", base, offset).with_rule("v", FilterOp::Add);
    db.open().unwrap();
    db.set_query_values(&["v"]).unwrap();

    let mut out = [0.0];
    db.query(&mut out, [0.5, 0.5, 0.5], &CoordSys::default()).unwrap();
    assert_relative_eq!(out[0], 101.5, epsilon = 1e-9);
}

#[test]
fn composite_of_simple_and_uniform() {
    let ds = Dataset::from_flat(
        vec!["vp".into()],
        &[0.0, 0.0, 0.0, 10.0, 0.0, 0.0],
        vec![5000.0, 6000.0],
        Topology::Line,
    )
    .unwrap();
    let simple = SimpleDb::new("profile", MemorySource::new(ds));
    let uniform = UniformDb::new("bg", vec!["density".into()], vec![2500.0]).unwrap();

    let mut db = CompositeDb::new(
        "model",
        simple,
        vec!["vp".into()],
        uniform,
        vec!["density".into()],
    );
    db.open().unwrap();
    db.set_query_values(&["density", "vp"]).unwrap();

    let mut out = [0.0; 2];
    db.query(&mut out, [2.5, 0.0, 0.0], &CoordSys::default()).unwrap();
    assert_eq!(out[0], 2500.0);
    assert_relative_eq!(out[1], 5250.0);
    db.close();
}
