use std::ops::Range;

use ndarray::ArrayView1;

use crate::error::{Result, TorsionError};
use crate::mesh::{FdElement, Mesh};
use crate::parallel::{ParallelConfig, fork_join};

pub mod geometric;

use geometric::Geometric3D;

/// Fraction of the element area carried by the average corner value, indexed
/// by the number of interior corners.
pub const AREA_FACTORS: [f64; 5] = [0.0, 1.0 / 3.0, 0.5, 5.0 / 6.0, 1.0];

/// Relative margin within which two element slopes count as equal. Round-off
/// in the solved field then cannot move the reported element.
pub const SLOPE_TIE_TOL: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostResult {
    /// Volume under the stress-function surface of the meshed domain.
    pub volume: f64,
    pub max_slope: f64,
    pub max_slope_element: usize,
}

/// Volume and per-element slopes of one contiguous element range.
struct PartialScan {
    volume: f64,
    slopes: Vec<f64>,
}

/// Scans elements for the volume and the steepest surface slope.
pub struct PostProcessor<'a> {
    mesh: &'a Mesh,
    values: ArrayView1<'a, f64>,
}
impl Geometric3D for PostProcessor<'_> {}

impl<'a> PostProcessor<'a> {
    pub fn new(mesh: &'a Mesh, values: ArrayView1<'a, f64>) -> Self {
        Self { mesh, values }
    }

    fn corner_heights(&self, elem: &FdElement) -> [f64; 4] {
        std::array::from_fn(|i| elem.corners[i].value(&self.values))
    }

    pub fn element_volume(&self, elem: &FdElement) -> f64 {
        let count = elem.interior_corner_count();
        if count == 0 {
            return 0.0;
        }
        let sum: f64 = self.corner_heights(elem).iter().sum();
        sum / count as f64 * AREA_FACTORS[count] * self.mesh.element_area()
    }

    pub fn element_max_slope(&self, elem: &FdElement) -> f64 {
        if elem.interior_corner_count() == 0 {
            return 0.0;
        }
        let (dx, dy) = self.mesh.element_size();
        Self::compute_element_max_slope(dx, dy, self.corner_heights(elem))
    }

    fn scan(&self, elements: Range<usize>) -> PartialScan {
        let mut partial = PartialScan {
            volume: 0.0,
            slopes: Vec::with_capacity(elements.len()),
        };
        for ielem in elements {
            let elem = self.mesh.element(ielem);
            partial.volume += self.element_volume(elem);
            partial.slopes.push(self.element_max_slope(elem));
        }
        partial
    }

    /// Element ranges are scanned concurrently. Volumes are summed and slopes
    /// concatenated in range order, then the steepest element is picked from
    /// the whole mesh, so the answer does not depend on the worker count.
    pub fn run(&self, parallel: &ParallelConfig) -> Result<PostResult> {
        let ranges = parallel.partition(self.mesh.element_count());
        log::debug!(
            "post-processing {} elements with {} workers",
            self.mesh.element_count(),
            ranges.len()
        );
        let partials = fork_join(ranges, |elements| self.scan(elements))?;
        let mut volume = 0.0;
        let mut slopes = Vec::with_capacity(self.mesh.element_count());
        for partial in partials {
            volume += partial.volume;
            slopes.extend(partial.slopes);
        }
        if !volume.is_finite() || slopes.iter().any(|s| !s.is_finite()) {
            return Err(TorsionError::NonFinite("post-processing"));
        }
        let (max_slope_element, max_slope) = select_max_slope(&slopes)
            .ok_or(TorsionError::NonFinite("post-processing of an empty mesh"))?;
        Ok(PostResult {
            volume,
            max_slope,
            max_slope_element,
        })
    }
}

/// Lowest-index element whose slope is within [`SLOPE_TIE_TOL`] of the
/// steepest one, with its slope.
fn select_max_slope(slopes: &[f64]) -> Option<(usize, f64)> {
    let max = slopes.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let threshold = max - SLOPE_TIE_TOL * max.abs();
    slopes
        .iter()
        .position(|&s| s >= threshold)
        .map(|i| (i, slopes[i]))
}

pub fn compute_volume_and_max_slope<'a>(
    mesh: &'a Mesh,
    values: ArrayView1<'a, f64>,
    parallel: &ParallelConfig,
) -> Result<PostResult> {
    PostProcessor::new(mesh, values).run(parallel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::aview1;

    use crate::geometry::shapes::rectangle;
    use crate::mesh::{NodeId, generate_mesh};

    #[test]
    fn test_element_volume_factors() {
        let rect = rectangle(2.0, 1.0).unwrap();
        let mesh = generate_mesh(&rect, 0.5, 0.5, true).unwrap();
        let values = [3.0, 6.0, 9.0];
        let post = PostProcessor::new(&mesh, aview1(&values));
        let area = mesh.element_area();
        let mut elem = FdElement {
            corners: [NodeId::Boundary; 4],
        };
        assert_eq!(post.element_volume(&elem), 0.0);
        elem.corners[3] = NodeId::Interior(0);
        assert!((post.element_volume(&elem) - 3.0 / 3.0 * area).abs() < 1e-15);
        elem.corners[1] = NodeId::Interior(1);
        assert!((post.element_volume(&elem) - 4.5 * 0.5 * area).abs() < 1e-15);
        elem.corners[0] = NodeId::Interior(2);
        assert!((post.element_volume(&elem) - 6.0 * 5.0 / 6.0 * area).abs() < 1e-15);
        elem.corners[2] = NodeId::Interior(2);
        assert!((post.element_volume(&elem) - 6.75 * area).abs() < 1e-15);
    }

    #[test]
    fn test_first_of_tied_slopes_wins() {
        assert_eq!(select_max_slope(&[]), None);
        assert_eq!(select_max_slope(&[0.0, 2.0, 1.0, 2.0]), Some((1, 2.0)));
        // a later element steeper only by round-off does not take over
        let slopes = [1.0, 3.0, 3.0 * (1.0 + 1e-13), 2.0];
        assert_eq!(select_max_slope(&slopes), Some((1, 3.0)));
        let slopes = [1.0, 3.0, 3.1, 2.0];
        assert_eq!(select_max_slope(&slopes), Some((2, 3.1)));
    }

    #[test]
    fn test_worker_count_does_not_change_result() {
        let rect = rectangle(3.0, 2.0).unwrap();
        let mesh = generate_mesh(&rect, 0.1, 0.1, true).unwrap();
        // smooth positive field peaking mid-section
        let values: Vec<f64> = (0..mesh.interior_node_count())
            .map(|i| ((i % 29) as f64 * 0.37).sin().abs() + 1.0)
            .collect();
        let serial =
            compute_volume_and_max_slope(&mesh, aview1(&values), &ParallelConfig::serial())
                .unwrap();
        for threads in [2, 3, 8] {
            let parallel = compute_volume_and_max_slope(
                &mesh,
                aview1(&values),
                &ParallelConfig::with_max_threads(threads),
            )
            .unwrap();
            assert_eq!(parallel.max_slope, serial.max_slope);
            assert_eq!(parallel.max_slope_element, serial.max_slope_element);
            assert!((parallel.volume - serial.volume).abs() < 1e-12 * serial.volume);
        }
    }
}
