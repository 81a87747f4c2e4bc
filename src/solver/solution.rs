use nalgebra::Point2;
use ndarray::Array1;

use crate::mesh::Mesh;

/// Result of one torsion analysis. Owns the mesh it was computed on and the
/// solved stress-function values of its interior nodes.
#[derive(Clone, Debug)]
pub struct Solution {
    j: f64,
    max_slope: f64,
    max_slope_element: usize,
    mesh: Mesh,
    values: Array1<f64>,
}
impl Solution {
    pub(crate) fn new(
        j: f64,
        max_slope: f64,
        max_slope_element: usize,
        mesh: Mesh,
        values: Array1<f64>,
    ) -> Self {
        Self {
            j,
            max_slope,
            max_slope_element,
            mesh,
            values,
        }
    }
    /// Saint-Venant torsional constant of the full section.
    pub fn j(&self) -> f64 {
        self.j
    }
    /// Steepest stress-function slope and the element where it occurs,
    /// numbered as on a mesh of the whole section whether or not symmetry
    /// was exploited.
    pub fn max_slope(&self) -> (f64, usize) {
        (
            self.max_slope,
            self.mesh.section_element_index(self.max_slope_element),
        )
    }
    /// Centre of the element holding the maximum slope.
    pub fn max_slope_location(&self) -> Point2<f64> {
        self.mesh.element_center(self.max_slope_element)
    }
    /// Peak shear stress per unit applied torque. The solved field is twice
    /// the Prandtl stress function, hence the factor 2.
    pub fn tmax_per_unit_torque(&self) -> f64 {
        self.max_slope / (2.0 * self.j)
    }
    pub fn shear_stress(&self, torque: f64) -> f64 {
        torque * self.tmax_per_unit_torque()
    }
    /// Angle of twist per unit length, T / (G J).
    pub fn twist_rate(&self, torque: f64, shear_modulus: f64) -> f64 {
        torque / (shear_modulus * self.j)
    }
    pub fn finite_difference_mesh(&self) -> &Mesh {
        &self.mesh
    }
    pub fn nodal_values(&self) -> &Array1<f64> {
        &self.values
    }
}
