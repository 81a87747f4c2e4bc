use std::ops::Range;

use crate::error::Result;
use crate::linalg::{BandBlockMut, BandedMatrix};
use crate::mesh::{Corner, Mesh, NodeId};
use crate::parallel::{ParallelConfig, fork_join};

/// Five-point stencil of the stress-function Poisson equation, scaled so the
/// coefficient to a vertical neighbour is -1/4.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StencilCoefficients {
    /// Self coefficient, 0.5 (1 + R^2).
    pub k0: f64,
    /// Node directly above or below.
    pub k13: f64,
    /// Horizontally adjacent node.
    pub k24: f64,
    /// Horizontal neighbour of a node on the symmetry axis, whose mirror image
    /// across the axis carries the same value.
    pub k24_sym: f64,
    pub rhs: f64,
}
impl StencilCoefficients {
    pub fn new(dx: f64, dy: f64) -> Self {
        let r2 = (dy / dx).powi(2);
        let k24 = -0.25 * r2;
        Self {
            k0: 0.5 * (1.0 + r2),
            k13: -0.25,
            k24,
            k24_sym: 2.0 * k24,
            rhs: dy * dy,
        }
    }
}

/// Fills `matrix` with one equation per interior node.
///
/// The equation node of an element is its bottom-right corner; its left
/// neighbour is the element's bottom-left corner, the node above its top-right
/// corner, the node below the bottom-right corner of the element beneath and
/// the node to the right the bottom-right corner of the next element. Interior
/// element rows are split into contiguous ranges, one per worker, and every
/// worker writes only the matrix rows of the nodes on its own element rows.
pub fn build_matrix(mesh: &Mesh, matrix: &mut BandedMatrix, parallel: &ParallelConfig) -> Result<()> {
    let nrows = mesh.element_row_count();
    if nrows < 3 {
        return Ok(());
    }
    let row_ranges: Vec<Range<usize>> = parallel
        .partition(nrows - 2)
        .into_iter()
        .map(|r| r.start + 1..r.end + 1)
        .collect();
    let node_ranges: Vec<Range<usize>> = row_ranges
        .iter()
        .map(|rows| mesh.equation_node_range(rows.clone()))
        .collect();
    let (dx, dy) = mesh.element_size();
    let stencil = StencilCoefficients::new(dx, dy);
    log::debug!(
        "assembling {} equations over {} element rows with {} workers",
        matrix.dimension(),
        nrows - 2,
        row_ranges.len()
    );

    let blocks = matrix.row_blocks(&node_ranges)?;
    let tasks: Vec<_> = row_ranges.into_iter().zip(blocks).collect();
    let results = fork_join(tasks, |(rows, mut block)| {
        assemble_rows(mesh, &stencil, rows, &mut block)
    })?;
    results.into_iter().collect()
}

fn assemble_rows(
    mesh: &Mesh,
    stencil: &StencilCoefficients,
    rows: Range<usize>,
    block: &mut BandBlockMut<'_>,
) -> Result<()> {
    let last_col = mesh.nx() - 1;
    for row in rows {
        for (col, ielem) in mesh.element_row_range(row).enumerate() {
            let elem = mesh.element(ielem);
            let Some(p) = elem.corner(Corner::BottomRight).index() else {
                continue;
            };
            // the last column of a half mesh ends on the axis: no node to the
            // right, and the left neighbour stands in for its own mirror image
            let on_axis = mesh.has_symmetry() && col == last_col;
            block.set_coefficient(p, p, stencil.k0)?;
            block.set_rhs(p, stencil.rhs)?;

            if let Some(below) = mesh.element_below(ielem) {
                couple(block, p, mesh.element(below).corner(Corner::BottomRight), stencil.k13)?;
            }
            let k_left = if on_axis { stencil.k24_sym } else { stencil.k24 };
            couple(block, p, elem.corner(Corner::BottomLeft), k_left)?;
            if !on_axis {
                if let Some(next) = mesh.next_in_row(ielem) {
                    couple(block, p, mesh.element(next).corner(Corner::BottomRight), stencil.k24)?;
                }
            }
            couple(block, p, elem.corner(Corner::TopRight), stencil.k13)?;
        }
    }
    Ok(())
}

/// Boundary neighbours hold zero and drop out of the system.
fn couple(block: &mut BandBlockMut<'_>, p: usize, neighbor: NodeId, k: f64) -> Result<()> {
    match neighbor {
        NodeId::Interior(q) => block.set_coefficient(p, q, k),
        NodeId::Boundary => Ok(()),
    }
}
