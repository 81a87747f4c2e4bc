use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use ndarray::ArrayView1;
use once_cell::sync::Lazy;
use vtkio::{
    Vtk,
    model::{
        Attribute, Attributes, ByteOrder, CellType, Cells, DataArray, DataSet, ElementType,
        IOBuffer, UnstructuredGridPiece, Version, VertexNumbers,
    },
};

use crate::error::{Result, TorsionError};
use crate::mesh::{Corner, Mesh, NodeId};
use crate::post::PostProcessor;
use crate::solver::Solution;

/// Run stamp shared by every file written by this process, MMDD_HHMM_SS.
static RUN_STAMP: Lazy<String> = Lazy::new(|| {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();

    // approximate calendar; only has to be unique and sortable
    let secs_in_day = 24 * 60 * 60;
    let days_since_epoch = timestamp / secs_in_day;
    let day_of_year = (days_since_epoch % 365) + 1;
    let month = ((day_of_year - 1) / 30) + 1;
    let day = ((day_of_year - 1) % 30) + 1;

    let seconds_today = timestamp % secs_in_day;
    let hour = seconds_today / 3600;
    let minute = (seconds_today % 3600) / 60;
    let second = seconds_today % 60;
    format!(
        "{:02}{:02}_{:02}{:02}_{:02}",
        month, day, hour, minute, second
    )
});

/// Creates `<base>/<run stamp>` and returns it.
pub fn create_output_dir<P: AsRef<Path>>(base: P) -> Result<PathBuf> {
    let dir = base.as_ref().join(RUN_STAMP.as_str());
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Grid points and pixel cells of the mesh with the solved field attached.
/// Boundary points carry zero.
fn build_piece<'a>(mesh: &'a Mesh, values: ArrayView1<'a, f64>) -> UnstructuredGridPiece {
    let (npx, npy) = (mesh.nx() + 1, mesh.ny() + 1);
    let mut points = Vec::with_capacity(3 * npx * npy);
    for row in 0..npy {
        for col in 0..npx {
            let p = mesh.grid_point(row, col);
            points.extend([p.x, p.y, 0.0]);
        }
    }

    let post = PostProcessor::new(mesh, values);
    let mut phi = vec![0.0; npx * npy];
    let mut connectivity = Vec::with_capacity(4 * mesh.element_count());
    let mut slopes = Vec::with_capacity(mesh.element_count());
    for (ielem, elem) in mesh.elements().iter().enumerate() {
        let (row, col) = mesh.row_and_column(ielem);
        // pixel ordering matches the corner ordering
        let corner_points = [
            (Corner::BottomLeft, row * npx + col),
            (Corner::BottomRight, row * npx + col + 1),
            (Corner::TopLeft, (row + 1) * npx + col),
            (Corner::TopRight, (row + 1) * npx + col + 1),
        ];
        for (corner, ipoint) in corner_points {
            if let NodeId::Interior(inode) = elem.corner(corner) {
                phi[ipoint] = values[inode];
            }
            connectivity.push(ipoint as u64);
        }
        slopes.push(post.element_max_slope(elem));
    }

    let num_cells = mesh.element_count();
    UnstructuredGridPiece {
        points: IOBuffer::F64(points),
        cells: Cells {
            cell_verts: VertexNumbers::XML {
                connectivity,
                offsets: (0..num_cells).map(|i| ((i + 1) * 4) as u64).collect(),
            },
            types: vec![CellType::Pixel; num_cells],
        },
        data: Attributes {
            point: vec![Attribute::DataArray(DataArray {
                name: "phi".to_string(),
                elem: ElementType::Scalars {
                    num_comp: 1,
                    lookup_table: None,
                },
                data: IOBuffer::F64(phi),
            })],
            cell: vec![Attribute::DataArray(DataArray {
                name: "max_plane_slope".to_string(),
                elem: ElementType::Scalars {
                    num_comp: 1,
                    lookup_table: None,
                },
                data: IOBuffer::F64(slopes),
            })],
        },
    }
}

/// Writes `<dir>/<name>.vtu` and returns its path.
pub fn write_solution(dir: &Path, name: &str, solution: &Solution) -> Result<PathBuf> {
    let filename = dir.join(format!("{}.vtu", name));
    let vtk_file = Vtk {
        version: Version::XML { major: 1, minor: 0 },
        title: format!("Prandtl stress function: {}", name),
        byte_order: ByteOrder::native(),
        data: DataSet::inline(build_piece(
            solution.finite_difference_mesh(),
            solution.nodal_values().view(),
        )),
        file_path: None,
    };
    vtk_file
        .export(&filename)
        .map_err(|err| TorsionError::Vtk(format!("{}: {:?}", filename.display(), err)))?;
    log::info!("wrote {}", filename.display());
    Ok(filename)
}
