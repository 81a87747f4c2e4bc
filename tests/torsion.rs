//! End-to-end analyses through the public API: outline → mesh → assembly →
//! solve → post-processing.

use nalgebra::Point2;
use prandtl_torsion::geometry::shapes::rectangle;
use prandtl_torsion::initialization::{initialize_job, initialize_section};
use prandtl_torsion::parallel::ParallelConfig;
use prandtl_torsion::{Outline, Polygon, SolverBackend, TorsionError, TorsionSolver, solve};

fn tee() -> Polygon {
    Polygon::from_coords(&[
        [0.0, 0.0],
        [1.0, 0.0],
        [1.0, 2.0],
        [2.5, 2.0],
        [2.5, 2.5],
        [-1.5, 2.5],
        [-1.5, 2.0],
        [0.0, 2.0],
    ])
    .unwrap()
}

/// Outline supplied by a caller-side type instead of [`Polygon`].
struct Diamond {
    vertices: Vec<Point2<f64>>,
}
impl Outline for Diamond {
    fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }
}

#[test]
fn tee_half_and_full_meshes_agree() {
    let section = tee();
    assert!((section.vertical_symmetry_axis(1e-9).unwrap() - 0.5).abs() < 1e-12);

    let half = solve(&section, 0.05, 0.05, false).unwrap();
    let full = solve(&section, 0.05, 0.05, true).unwrap();
    assert!(half.finite_difference_mesh().has_symmetry());
    assert!((half.j() - full.j()).abs() < 1e-9 * full.j());
    assert!((half.finite_difference_mesh().area() - full.finite_difference_mesh().area()).abs() < 1e-9);
    assert!((half.finite_difference_mesh().area() - section.area()).abs() < 0.05 * section.area());

    let (half_slope, half_elem) = half.max_slope();
    let (full_slope, full_elem) = full.max_slope();
    assert!((half_slope - full_slope).abs() < 1e-9 * full_slope);
    assert_eq!(half_elem, full_elem);
    assert!((half.max_slope_location() - full.max_slope_location()).norm() < 1e-9);
}

#[test]
fn mirrored_vertices_with_skewed_edges_use_the_full_mesh() {
    // every vertex has a mirror image about x = 1 but the notches do not
    let section = Polygon::from_coords(&[
        [0.0, 0.0],
        [2.0, 0.0],
        [2.0, 2.0],
        [1.5, 1.0],
        [0.0, 2.0],
        [0.5, 1.0],
    ])
    .unwrap();
    assert!((section.area() - 2.5).abs() < 1e-12);
    assert!(section.vertical_symmetry_axis(1e-9).is_none());

    let detected = solve(&section, 0.02, 0.02, false).unwrap();
    let ignored = solve(&section, 0.02, 0.02, true).unwrap();
    assert!(!detected.finite_difference_mesh().has_symmetry());
    assert!((detected.j() - ignored.j()).abs() < 1e-12 * ignored.j());
    assert_eq!(detected.max_slope().1, ignored.max_slope().1);
    let area = detected.finite_difference_mesh().area();
    assert!((area - 2.5).abs() < 0.01 * 2.5);
}

#[test]
fn thin_strip_approaches_open_section_value() {
    // J -> b t^3 / 3 (1 - 0.63 t / b) for a thin strip
    let (b, t) = (10.0, 1.0);
    let strip = rectangle(b, t).unwrap();
    let solution = solve(&strip, 0.05, 0.05, false).unwrap();
    let approx = b * t.powi(3) / 3.0 * (1.0 - 0.63 * t / b);
    assert!((solution.j() - approx).abs() < 0.02 * approx);
    // tau_max = T t / J for a thin strip
    let thin = t / solution.j();
    assert!((solution.tmax_per_unit_torque() - thin).abs() < 0.1 * thin);
}

#[test]
fn caller_outline_and_trait_object() {
    let diamond = Diamond {
        vertices: vec![
            Point2::new(0.0, -1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
        ],
    };
    let direct = solve(&diamond, 0.05, 0.05, false).unwrap();
    let dynamic: &dyn Outline = &diamond;
    let via_dyn = TorsionSolver::new(0.05, 0.05).solve(dynamic).unwrap();
    assert_eq!(direct.j(), via_dyn.j());

    // a square of side sqrt(2) rotated by 45 degrees: J = 0.1406 a^4
    let exact = 0.1406 * 4.0;
    assert!((direct.j() - exact).abs() < 0.01 * exact);
    assert!(direct.finite_difference_mesh().has_symmetry());
}

#[test]
fn settings_do_not_change_the_answer() {
    let job = initialize_job(concat!(env!("CARGO_MANIFEST_DIR"), "/inputs/job.json")).unwrap();
    let beam = initialize_section(&job.section).unwrap();
    let reference = TorsionSolver::new(0.5, 0.5)
        .with_parallel(ParallelConfig::serial())
        .solve(&beam)
        .unwrap();
    let mut solver = TorsionSolver::new(2.0, 2.0)
        .with_parallel(ParallelConfig::with_max_threads(5))
        .with_backend(SolverBackend::Dense);
    solver.initialize(0.5, 0.5, false);
    let other = solver.solve(&beam).unwrap();
    assert!((reference.j() - other.j()).abs() < 1e-9 * reference.j());
    assert_eq!(reference.max_slope().1, other.max_slope().1);
    let tau = reference.max_slope().0 / (2.0 * reference.j());
    assert!((reference.tmax_per_unit_torque() - tau).abs() < 1e-15);
}

#[test]
fn partition_covers_every_item() {
    for total in [0, 1, 7, 64, 1000, 1001] {
        for threads in [1, 2, 3, 8] {
            let config = ParallelConfig::with_max_threads(threads);
            let ranges = config.partition(total);
            let mut next = 0;
            for range in &ranges {
                assert_eq!(range.start, next);
                assert!(range.end > range.start);
                next = range.end;
            }
            assert_eq!(next, total);
            assert!(ranges.len() <= threads);
        }
    }
}

#[test]
fn invalid_inputs_are_rejected() {
    let rect = rectangle(2.0, 1.0).unwrap();
    assert!(matches!(
        solve(&rect, 0.0, 0.1, false),
        Err(TorsionError::InvalidSpacing { .. })
    ));
    assert!(matches!(
        solve(&rect, 0.1, f64::NAN, false),
        Err(TorsionError::InvalidSpacing { .. })
    ));
    assert!(matches!(
        Polygon::from_coords(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]),
        Err(TorsionError::DegenerateOutline(_))
    ));
    assert!(matches!(
        solve(&rect, 5.0, 5.0, true),
        Err(TorsionError::NoInteriorNodes)
    ));
}
