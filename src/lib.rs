//! Saint-Venant torsion of prismatic sections by the Prandtl membrane
//! analogy: a finite-difference Poisson solve on a uniform mesh fitted to the
//! section outline, post-processed into the torsional constant and the peak
//! shear stress.

pub mod assembly;
pub mod error;
pub mod geometry;
pub mod initialization;
pub mod io;
pub mod linalg;
pub mod logger;
pub mod mesh;
pub mod parallel;
pub mod post;
pub mod solver;

pub use error::{Result, TorsionError};
pub use geometry::{Outline, Polygon};
pub use linalg::SolverBackend;
pub use mesh::Mesh;
pub use parallel::ParallelConfig;
pub use solver::{Solution, TorsionSolver, solve};
