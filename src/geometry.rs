use nalgebra::Point2;

use crate::error::{Result, TorsionError};

pub mod shapes;

/// Axis-aligned extent of an outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}
impl BoundingBox {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
    pub fn x_mid(&self) -> f64 {
        0.5 * (self.x_min + self.x_max)
    }
    /// Length scale used to make geometric tolerances relative.
    pub fn scale(&self) -> f64 {
        self.width().max(self.height())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointClass {
    Inside,
    OnBoundary,
    Outside,
}

/// A closed section outline. Implementors only supply the polygon vertices
/// (the closing edge from the last vertex back to the first is implicit);
/// everything the mesh generator needs is derived from them.
pub trait Outline {
    fn vertices(&self) -> &[Point2<f64>];

    fn bounding_box(&self) -> BoundingBox {
        let mut bbox = BoundingBox {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        };
        for p in self.vertices() {
            bbox.x_min = bbox.x_min.min(p.x);
            bbox.x_max = bbox.x_max.max(p.x);
            bbox.y_min = bbox.y_min.min(p.y);
            bbox.y_max = bbox.y_max.max(p.y);
        }
        bbox
    }

    /// Shoelace area, positive for counter-clockwise vertex order.
    fn signed_area(&self) -> f64 {
        let v = self.vertices();
        let n = v.len();
        let mut twice_area = 0.0;
        for i in 0..n {
            let p = v[i];
            let q = v[(i + 1) % n];
            twice_area += p.x * q.y - q.x * p.y;
        }
        0.5 * twice_area
    }

    fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    fn distance_to_boundary(&self, p: Point2<f64>) -> f64 {
        let v = self.vertices();
        let n = v.len();
        (0..n)
            .map(|i| distance_to_segment(p, v[i], v[(i + 1) % n]))
            .fold(f64::INFINITY, f64::min)
    }

    /// Points within `tol` of an edge count as boundary; the rest are decided
    /// by the even-odd crossing rule.
    fn classify_point(&self, p: Point2<f64>, tol: f64) -> PointClass {
        if self.distance_to_boundary(p) <= tol {
            return PointClass::OnBoundary;
        }
        let v = self.vertices();
        let n = v.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (a, b) = (v[i], v[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        if inside {
            PointClass::Inside
        } else {
            PointClass::Outside
        }
    }

    /// Returns the x coordinate of the vertical symmetry axis when the outline
    /// is a mirror image of itself about the midline of its bounding box. Every
    /// edge is mirrored and sampled, so a mirror-symmetric vertex set joined by
    /// asymmetric edges is not reported.
    fn vertical_symmetry_axis(&self, tol: f64) -> Option<f64> {
        let x_axis = self.bounding_box().x_mid();
        let mirror = |p: &Point2<f64>| Point2::new(2.0 * x_axis - p.x, p.y);
        let v = self.vertices();
        let n = v.len();
        let symmetric = (0..n).all(|i| {
            let (a, b) = (mirror(&v[i]), mirror(&v[(i + 1) % n]));
            EDGE_SAMPLES
                .iter()
                .all(|&t| self.distance_to_boundary(a + (b - a) * t) <= tol)
        });
        symmetric.then_some(x_axis)
    }
}

/// Fractions along an edge checked against the mirrored outline.
const EDGE_SAMPLES: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

fn distance_to_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return (p - a).norm();
    }
    let t = ((p - a).dot(&ab) / len2).clamp(0.0, 1.0);
    (p - (a + ab * t)).norm()
}

/// Simple closed polygon outline.
#[derive(Clone, Debug)]
pub struct Polygon {
    vertices: Vec<Point2<f64>>,
}
impl Polygon {
    pub fn new(mut vertices: Vec<Point2<f64>>) -> Result<Self> {
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        if vertices.len() < 3 {
            return Err(TorsionError::DegenerateOutline(format!(
                "{} vertices, at least 3 required",
                vertices.len()
            )));
        }
        if vertices.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(TorsionError::DegenerateOutline(
                "vertex coordinates must be finite".to_string(),
            ));
        }
        let polygon = Self { vertices };
        let bbox = polygon.bounding_box();
        if polygon.area() <= 1e-12 * bbox.scale() * bbox.scale() {
            return Err(TorsionError::DegenerateOutline(
                "outline encloses no area".to_string(),
            ));
        }
        Ok(polygon)
    }
    pub fn from_coords(coords: &[[f64; 2]]) -> Result<Self> {
        Self::new(coords.iter().map(|c| Point2::new(c[0], c[1])).collect())
    }
}
impl Outline for Polygon {
    fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }
}
