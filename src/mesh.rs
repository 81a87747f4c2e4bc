use std::ops::{Index, Range};

use nalgebra::Point2;

pub mod generator;

pub use generator::generate_mesh;

/// Corner id of a finite-difference element. Boundary corners are not degrees
/// of freedom; their stress-function value is zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeId {
    Interior(usize),
    Boundary,
}
impl NodeId {
    pub fn index(self) -> Option<usize> {
        match self {
            NodeId::Interior(i) => Some(i),
            NodeId::Boundary => None,
        }
    }
    pub fn is_interior(self) -> bool {
        matches!(self, NodeId::Interior(_))
    }
    /// Nodal value, zero on the boundary.
    pub fn value<V>(self, values: &V) -> f64
    where
        V: Index<usize, Output = f64> + ?Sized,
    {
        match self {
            NodeId::Interior(i) => values[i],
            NodeId::Boundary => 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corner {
    BottomLeft = 0,
    BottomRight = 1,
    TopLeft = 2,
    TopRight = 3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FdElement {
    /// Ordered as [`Corner`].
    pub corners: [NodeId; 4],
}
impl FdElement {
    pub fn corner(&self, corner: Corner) -> NodeId {
        self.corners[corner as usize]
    }
    pub fn interior_corner_count(&self) -> usize {
        self.corners.iter().filter(|c| c.is_interior()).count()
    }
}

/// Uniform rectangular finite-difference mesh over a section outline.
///
/// Elements are stored row by row from the bottom of the grid to the top,
/// every row holding `nx` elements, so the element below element `i` is
/// `i - nx` and the next element in the row is `i + 1`. When `has_symmetry`
/// is set only the left half of the section is meshed and the bottom-right
/// corners of the last element column lie on the symmetry axis.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub(crate) elements: Vec<FdElement>,
    pub(crate) nx: usize,
    /// Element columns of the whole-section mesh; equals `nx` unless only the
    /// half-domain was meshed.
    pub(crate) section_nx: usize,
    pub(crate) ny: usize,
    pub(crate) dx: f64,
    pub(crate) dy: f64,
    pub(crate) origin: Point2<f64>,
    pub(crate) has_symmetry: bool,
    pub(crate) interior_node_num: usize,
    pub(crate) max_interior_nodes_per_row: usize,
    pub(crate) half_bandwidth: usize,
    /// Offsets of the first interior node on each grid row (length ny + 2).
    pub(crate) row_node_offsets: Vec<usize>,
    /// Number of elements whose centre lies inside the section.
    pub(crate) inside_elem_num: usize,
}
impl Mesh {
    /// Element columns per row.
    pub fn nx(&self) -> usize {
        self.nx
    }
    /// Element rows.
    pub fn ny(&self) -> usize {
        self.ny
    }
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
    pub fn element_row_count(&self) -> usize {
        self.ny
    }
    pub fn element_row_range(&self, row: usize) -> Range<usize> {
        row * self.nx..(row + 1) * self.nx
    }
    pub fn element(&self, ielem: usize) -> &FdElement {
        &self.elements[ielem]
    }
    pub fn elements(&self) -> &[FdElement] {
        &self.elements
    }
    /// Element directly beneath `ielem`, `None` on the bottom row.
    pub fn element_below(&self, ielem: usize) -> Option<usize> {
        ielem.checked_sub(self.nx)
    }
    /// Following element in the same row, `None` at the end of the row.
    pub fn next_in_row(&self, ielem: usize) -> Option<usize> {
        if (ielem + 1) % self.nx == 0 {
            None
        } else {
            Some(ielem + 1)
        }
    }
    pub fn row_and_column(&self, ielem: usize) -> (usize, usize) {
        (ielem / self.nx, ielem % self.nx)
    }
    /// Index element `ielem` has on the mesh of the whole section. A half mesh
    /// shares its rows and left-hand columns with the full mesh, so only the
    /// row stride changes.
    pub fn section_element_index(&self, ielem: usize) -> usize {
        let (row, col) = self.row_and_column(ielem);
        row * self.section_nx + col
    }
    pub fn element_size(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }
    pub fn element_area(&self) -> f64 {
        self.dx * self.dy
    }
    /// Coordinates of grid point (`row`, `col`); element `(r, c)` spans grid
    /// points `r..=r + 1` by `c..=c + 1`.
    pub fn grid_point(&self, row: usize, col: usize) -> Point2<f64> {
        Point2::new(
            self.origin.x + col as f64 * self.dx,
            self.origin.y + row as f64 * self.dy,
        )
    }
    pub fn element_center(&self, ielem: usize) -> Point2<f64> {
        let (row, col) = self.row_and_column(ielem);
        Point2::new(
            self.origin.x + (col as f64 + 0.5) * self.dx,
            self.origin.y + (row as f64 + 0.5) * self.dy,
        )
    }
    /// Area covered by the meshed elements (the half-domain when symmetry is
    /// exploited).
    pub fn meshed_area(&self) -> f64 {
        self.inside_elem_num as f64 * self.element_area()
    }
    /// Area of the full section represented by the mesh.
    pub fn area(&self) -> f64 {
        if self.has_symmetry {
            2.0 * self.meshed_area()
        } else {
            self.meshed_area()
        }
    }
    pub fn has_symmetry(&self) -> bool {
        self.has_symmetry
    }
    /// x coordinate of the symmetry axis when the half-domain was meshed.
    pub fn symmetry_axis(&self) -> Option<f64> {
        self.has_symmetry
            .then(|| self.origin.x + self.nx as f64 * self.dx)
    }
    pub fn interior_node_count(&self) -> usize {
        self.interior_node_num
    }
    pub fn max_interior_nodes_per_row(&self) -> usize {
        self.max_interior_nodes_per_row
    }
    /// Largest index distance between coupled nodes; never smaller than
    /// [`Mesh::max_interior_nodes_per_row`].
    pub fn half_bandwidth(&self) -> usize {
        self.half_bandwidth
    }
    /// Interior nodes whose equations are written by the elements of
    /// `rows`. The equation node of an element is its bottom-right corner, so
    /// element row `r` owns the nodes of grid row `r`.
    pub fn equation_node_range(&self, rows: Range<usize>) -> Range<usize> {
        self.row_node_offsets[rows.start]..self.row_node_offsets[rows.end]
    }
}
