use nalgebra::{Point3, Vector3};

/// Corner triples (indices into [BL, BR, TL, TR]) of the four triangular
/// planes fitted to an element.
pub const ELEMENT_PLANES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];

pub trait Geometric3D {
    fn compute_unit_normal(p0: &Point3<f64>, p1: &Point3<f64>, p2: &Point3<f64>) -> Vector3<f64> {
        // normalized normal vector
        (p1 - p0).cross(&(p2 - p0)).normalize()
    }
    /// Tangent of the angle between a plane and the horizontal, i.e. the
    /// magnitude of its steepest-ascent gradient.
    fn compute_plane_slope(normal: &Vector3<f64>) -> f64 {
        let horizontal = normal.xy().norm();
        if horizontal == 0.0 {
            0.0
        } else {
            horizontal / normal.z.abs()
        }
    }
    /// Corner points of an element in element-local coordinates, ordered
    /// [BL, BR, TL, TR], raised to the given heights.
    fn compute_element_points(dx: f64, dy: f64, heights: [f64; 4]) -> [Point3<f64>; 4] {
        [
            Point3::new(0.0, 0.0, heights[0]),
            Point3::new(dx, 0.0, heights[1]),
            Point3::new(0.0, dy, heights[2]),
            Point3::new(dx, dy, heights[3]),
        ]
    }
    /// Steepest of the four triangular planes through the element corners.
    fn compute_element_max_slope(dx: f64, dy: f64, heights: [f64; 4]) -> f64 {
        let points = Self::compute_element_points(dx, dy, heights);
        ELEMENT_PLANES
            .iter()
            .map(|&[a, b, c]| {
                let normal = Self::compute_unit_normal(&points[a], &points[b], &points[c]);
                Self::compute_plane_slope(&normal)
            })
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Planes;
    impl Geometric3D for Planes {}

    #[test]
    fn test_plane_slope() {
        // z = 2x + 3y
        let p0 = Point3::new(0.0, 0.0, 0.0);
        let p1 = Point3::new(1.0, 0.0, 2.0);
        let p2 = Point3::new(0.0, 1.0, 3.0);
        let n = Planes::compute_unit_normal(&p0, &p1, &p2);
        assert!((n.norm() - 1.0).abs() < 1e-14);
        assert!((Planes::compute_plane_slope(&n) - 13.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_flat_element_has_zero_slope() {
        assert_eq!(Planes::compute_element_max_slope(0.5, 0.25, [1.0; 4]), 0.0);
    }

    #[test]
    fn test_element_max_slope_picks_steepest_plane() {
        // only the top-right corner is raised; the steepest plane is
        // BR-TL-TR, z = h (x/dx + y/dy - 1)
        let (dx, dy, h) = (0.5, 0.25, 1.0);
        let slope = Planes::compute_element_max_slope(dx, dy, [0.0, 0.0, 0.0, h]);
        let expected = ((h / dx).powi(2) + (h / dy).powi(2)).sqrt();
        assert!((slope - expected).abs() < 1e-12);
    }
}
