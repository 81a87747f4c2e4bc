use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::geometry::shapes::IBeamDimensions;
use crate::linalg::SolverBackend;
use crate::parallel::ParallelConfig;

/// Cross-section to analyse.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SectionParams {
    Rectangle { width: f64, height: f64 },
    IBeam(IBeamDimensions),
    /// Closed polygon given by its vertices, in either orientation.
    Polygon { vertices: Vec<[f64; 2]> },
}

fn default_output_dir() -> String {
    "outputs".to_string()
}

/// Job file read by the command-line driver.
#[derive(Deserialize, Debug, Clone)]
pub struct JobParser {
    pub name: String,
    pub dx_max: f64,
    pub dy_max: f64,
    #[serde(default)]
    pub ignore_symmetry: bool,
    #[serde(default)]
    pub backend: SolverBackend,
    #[serde(default)]
    pub parallel: ParallelConfig,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default)]
    pub log_level: Option<String>,
    /// Torque used to report the peak shear stress, if given.
    #[serde(default)]
    pub torque: Option<f64>,
    /// Shear modulus used to report the twist rate together with `torque`.
    #[serde(default)]
    pub shear_modulus: Option<f64>,
    pub section: SectionParams,
}
impl JobParser {
    pub fn parse<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let file_content = fs::read_to_string(file_path)?;
        Self::parse_str(&file_content)
    }
    pub fn parse_str(content: &str) -> Result<Self> {
        let job: JobParser = serde_json::from_str(content)?;
        Ok(job)
    }
}
