use thiserror::Error;

pub type Result<T> = std::result::Result<T, TorsionError>;

#[derive(Error, Debug)]
pub enum TorsionError {
    #[error("invalid mesh spacing: dx_max = {dx}, dy_max = {dy} (both must be positive and finite)")]
    InvalidSpacing { dx: f64, dy: f64 },

    #[error("degenerate section outline: {0}")]
    DegenerateOutline(String),

    #[error("mesh has no interior nodes; reduce the mesh spacing")]
    NoInteriorNodes,

    #[error("coefficient ({row}, {col}) lies outside the band (half bandwidth {half_bandwidth})")]
    OutsideBand {
        row: usize,
        col: usize,
        half_bandwidth: usize,
    },

    #[error("matrix row {row} is not assigned to this block")]
    RowNotOwned { row: usize },

    #[error("singular coefficient matrix: pivot {pivot:e} at row {row}")]
    SingularMatrix { row: usize, pivot: f64 },

    #[error("non-finite value encountered in {0}")]
    NonFinite(&'static str),

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to parse job file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("vtk export failed: {0}")]
    Vtk(String),
}
