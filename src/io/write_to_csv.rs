use std::fs::OpenOptions;
use std::path::Path;

use csv::WriterBuilder;
use serde::Serialize;

use crate::error::Result;
use crate::solver::Solution;

/// One line of the run summary.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SummaryRecord {
    pub name: String,
    pub dx: f64,
    pub dy: f64,
    pub has_symmetry: bool,
    pub interior_nodes: usize,
    pub area: f64,
    pub j: f64,
    pub max_slope: f64,
    pub max_slope_element: usize,
    pub max_slope_x: f64,
    pub max_slope_y: f64,
    pub tmax_per_unit_torque: f64,
}
impl SummaryRecord {
    pub fn new(name: &str, solution: &Solution) -> Self {
        let mesh = solution.finite_difference_mesh();
        let (dx, dy) = mesh.element_size();
        let (max_slope, max_slope_element) = solution.max_slope();
        let location = solution.max_slope_location();
        Self {
            name: name.to_string(),
            dx,
            dy,
            has_symmetry: mesh.has_symmetry(),
            interior_nodes: mesh.interior_node_count(),
            area: mesh.area(),
            j: solution.j(),
            max_slope,
            max_slope_element,
            max_slope_x: location.x,
            max_slope_y: location.y,
            tmax_per_unit_torque: solution.tmax_per_unit_torque(),
        }
    }
}

/// Appends `record` to `filename`, writing the header only when the file is
/// new or empty.
pub fn write_summary<P: AsRef<Path>>(filename: P, record: &SummaryRecord) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(filename.as_ref())?;
    let needs_header = file.metadata()?.len() == 0;
    let mut writer = WriterBuilder::new()
        .has_headers(needs_header)
        .from_writer(file);
    writer.serialize(record)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::rectangle;
    use crate::solver::solve;

    #[test]
    fn test_summary_appends_rows() {
        let rect = rectangle(2.0, 1.0).unwrap();
        let solution = solve(&rect, 0.1, 0.1, false).unwrap();
        let record = SummaryRecord::new("bar", &solution);
        assert_eq!(record.j, solution.j());
        assert!(record.has_symmetry);

        let dir = std::env::temp_dir().join(format!("prandtl_torsion_csv_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("summary.csv");
        let _ = std::fs::remove_file(&path);
        write_summary(&path, &record).unwrap();
        write_summary(&path, &record).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("name,dx,dy,has_symmetry"));
        assert!(lines[1].starts_with("bar,"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
