use nalgebra::Point2;

use super::{FdElement, Mesh, NodeId};
use crate::error::{Result, TorsionError};
use crate::geometry::{Outline, PointClass};

/// Relative tolerance for classifying grid points that sit on the outline.
const BOUNDARY_TOL: f64 = 1e-9;
/// Relative tolerance for matching mirrored vertices to the outline.
const SYMMETRY_TOL: f64 = 1e-7;

/// Lays a uniform grid over `outline` and numbers its interior nodes.
///
/// The grid covers the bounding box padded by one element on every side, so
/// the first and last element rows and the first element column are made of
/// boundary corners only. Element sizes are shrunk from `dx_max`/`dy_max` until
/// a whole number of elements spans the box. If the outline has a vertical
/// symmetry axis the horizontal element count is made even so the axis falls
/// on a grid line, and unless `ignore_symmetry` is set only the left half
/// (up to and including the axis column) is meshed.
pub fn generate_mesh<O: Outline + ?Sized>(
    outline: &O,
    dx_max: f64,
    dy_max: f64,
    ignore_symmetry: bool,
) -> Result<Mesh> {
    if !(dx_max > 0.0 && dx_max.is_finite() && dy_max > 0.0 && dy_max.is_finite()) {
        return Err(TorsionError::InvalidSpacing {
            dx: dx_max,
            dy: dy_max,
        });
    }
    if outline.vertices().len() < 3 {
        return Err(TorsionError::DegenerateOutline(
            "outline has fewer than 3 vertices".to_string(),
        ));
    }
    let bbox = outline.bounding_box();
    let scale = bbox.scale();
    if !(bbox.width() > 0.0 && bbox.height() > 0.0) || outline.area() <= 0.0 {
        return Err(TorsionError::DegenerateOutline(
            "outline encloses no area".to_string(),
        ));
    }
    let symmetry_axis = outline.vertical_symmetry_axis(SYMMETRY_TOL * scale);

    let mut cells_x = cell_count(bbox.width(), dx_max);
    if symmetry_axis.is_some() && cells_x % 2 == 1 {
        cells_x += 1;
    }
    let cells_y = cell_count(bbox.height(), dy_max);
    let dx = bbox.width() / cells_x as f64;
    let dy = bbox.height() / cells_y as f64;
    let origin = Point2::new(bbox.x_min - dx, bbox.y_min - dy);

    let has_symmetry = symmetry_axis.is_some() && !ignore_symmetry;
    let nx = if has_symmetry {
        cells_x / 2 + 1
    } else {
        cells_x + 2
    };
    let ny = cells_y + 2;

    // grid points are (nx + 1) x (ny + 1), numbered row by row
    let tol = BOUNDARY_TOL * scale;
    let mut node_ids = Vec::with_capacity((nx + 1) * (ny + 1));
    let mut row_node_offsets = Vec::with_capacity(ny + 2);
    let mut interior_node_num = 0;
    let mut max_interior_nodes_per_row = 0;
    for j in 0..=ny {
        row_node_offsets.push(interior_node_num);
        let y = origin.y + j as f64 * dy;
        for i in 0..=nx {
            let x = if has_symmetry && i == nx {
                symmetry_axis.unwrap_or(bbox.x_mid())
            } else {
                origin.x + i as f64 * dx
            };
            let id = match outline.classify_point(Point2::new(x, y), tol) {
                PointClass::Inside => {
                    interior_node_num += 1;
                    NodeId::Interior(interior_node_num - 1)
                }
                PointClass::OnBoundary | PointClass::Outside => NodeId::Boundary,
            };
            node_ids.push(id);
        }
        max_interior_nodes_per_row =
            max_interior_nodes_per_row.max(interior_node_num - row_node_offsets[j]);
    }
    row_node_offsets.push(interior_node_num);
    if interior_node_num == 0 {
        return Err(TorsionError::NoInteriorNodes);
    }

    let node = |i: usize, j: usize| node_ids[j * (nx + 1) + i];
    let mut elements = Vec::with_capacity(nx * ny);
    let mut inside_elem_num = 0;
    let mut half_bandwidth = max_interior_nodes_per_row;
    for j in 0..ny {
        for i in 0..nx {
            let elem = FdElement {
                corners: [node(i, j), node(i + 1, j), node(i, j + 1), node(i + 1, j + 1)],
            };
            // vertical couplings set the band, horizontal ones are adjacent
            if let (Some(lower), Some(upper)) = (elem.corners[1].index(), elem.corners[3].index()) {
                half_bandwidth = half_bandwidth.max(upper - lower);
            }
            let center = Point2::new(
                origin.x + (i as f64 + 0.5) * dx,
                origin.y + (j as f64 + 0.5) * dy,
            );
            if outline.classify_point(center, tol) == PointClass::Inside {
                inside_elem_num += 1;
            }
            elements.push(elem);
        }
    }

    log::debug!(
        "generated {}x{} element mesh (dx = {:.6}, dy = {:.6}, symmetry = {}): {} interior nodes, half bandwidth {}",
        nx,
        ny,
        dx,
        dy,
        has_symmetry,
        interior_node_num,
        half_bandwidth
    );

    Ok(Mesh {
        elements,
        nx,
        section_nx: cells_x + 2,
        ny,
        dx,
        dy,
        origin,
        has_symmetry,
        interior_node_num,
        max_interior_nodes_per_row,
        half_bandwidth,
        row_node_offsets,
        inside_elem_num,
    })
}

/// Smallest whole number of cells of size at most `max_size` spanning `extent`.
fn cell_count(extent: f64, max_size: f64) -> usize {
    let ratio = extent / max_size;
    // guard against 4.000000000001 rounding up to 5
    let n = (ratio - 1e-9 * ratio.max(1.0)).ceil();
    (n as usize).max(1)
}
