use std::time::Instant;

use crate::assembly::build_matrix;
use crate::error::Result;
use crate::geometry::Outline;
use crate::linalg::{BandedMatrix, SolverBackend};
use crate::mesh::generate_mesh;
use crate::parallel::ParallelConfig;
use crate::post::compute_volume_and_max_slope;

pub mod solution;

pub use solution::Solution;

/// Reusable torsion solver. Holds the mesh spacing and run settings so that
/// repeated analyses need not restate them; no state survives between calls.
#[derive(Clone, Debug)]
pub struct TorsionSolver {
    dx_max: f64,
    dy_max: f64,
    ignore_symmetry: bool,
    parallel: ParallelConfig,
    backend: SolverBackend,
}

impl TorsionSolver {
    pub fn new(dx_max: f64, dy_max: f64) -> Self {
        Self {
            dx_max,
            dy_max,
            ignore_symmetry: false,
            parallel: ParallelConfig::default(),
            backend: SolverBackend::default(),
        }
    }
    pub fn initialize(&mut self, dx_max: f64, dy_max: f64, ignore_symmetry: bool) {
        self.dx_max = dx_max;
        self.dy_max = dy_max;
        self.ignore_symmetry = ignore_symmetry;
    }
    pub fn with_ignore_symmetry(mut self, ignore_symmetry: bool) -> Self {
        self.ignore_symmetry = ignore_symmetry;
        self
    }
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
    pub fn with_backend(mut self, backend: SolverBackend) -> Self {
        self.backend = backend;
        self
    }
    pub fn mesh_spacing(&self) -> (f64, f64) {
        (self.dx_max, self.dy_max)
    }
    pub fn ignore_symmetry(&self) -> bool {
        self.ignore_symmetry
    }

    /// Mesh, assemble, solve and post-process. Any failure aborts the whole
    /// analysis; there is no partial result.
    pub fn solve<O: Outline + ?Sized>(&self, outline: &O) -> Result<Solution> {
        let start = Instant::now();
        let mesh = generate_mesh(outline, self.dx_max, self.dy_max, self.ignore_symmetry)?;

        let mut matrix = BandedMatrix::new(mesh.interior_node_count(), mesh.half_bandwidth());
        build_matrix(&mesh, &mut matrix, &self.parallel)?;
        log::debug!(
            "assembled {} unknowns, bandwidth {} ({:.3?})",
            matrix.dimension(),
            matrix.bandwidth(),
            start.elapsed()
        );

        let values = matrix.solve(self.backend)?;
        log::debug!("solved with {:?} backend ({:.3?})", self.backend, start.elapsed());

        let post = compute_volume_and_max_slope(&mesh, values.view(), &self.parallel)?;
        let j = if mesh.has_symmetry() {
            2.0 * post.volume
        } else {
            post.volume
        };
        log::info!(
            "J = {:.6}, max slope = {:.6} at element {} ({} unknowns, {:.3?})",
            j,
            post.max_slope,
            post.max_slope_element,
            mesh.interior_node_count(),
            start.elapsed()
        );
        Ok(Solution::new(
            j,
            post.max_slope,
            post.max_slope_element,
            mesh,
            values,
        ))
    }
}

/// One-shot analysis with default parallel and backend settings.
pub fn solve<O: Outline + ?Sized>(
    outline: &O,
    dx_max: f64,
    dy_max: f64,
    ignore_symmetry: bool,
) -> Result<Solution> {
    TorsionSolver::new(dx_max, dy_max)
        .with_ignore_symmetry(ignore_symmetry)
        .solve(outline)
}
