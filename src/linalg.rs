use serde::Deserialize;

pub mod banded;
pub mod dense;

pub use banded::{BandBlockMut, BandedMatrix};

/// Factorisation used by [`BandedMatrix::solve`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// LU factorisation in band storage; memory grows with n * bandwidth.
    #[default]
    Banded,
    /// Densify and hand the system to faer's partial-pivot LU. Only sensible
    /// for small meshes.
    Dense,
}
