use crate::{
    error::Result,
    geometry::{Polygon, shapes::rectangle},
    io::param_parser::{JobParser, SectionParams},
    solver::TorsionSolver,
};

pub fn initialize_job(file_path: &str) -> Result<JobParser> {
    let job = JobParser::parse(file_path)?;
    log::debug!("loaded job '{}' from {}", job.name, file_path);
    Ok(job)
}
pub fn initialize_section(section: &SectionParams) -> Result<Polygon> {
    match section {
        SectionParams::Rectangle { width, height } => rectangle(*width, *height),
        SectionParams::IBeam(dims) => dims.outline(),
        SectionParams::Polygon { vertices } => Polygon::from_coords(vertices),
    }
}
pub fn initialize_solver(job: &JobParser) -> TorsionSolver {
    TorsionSolver::new(job.dx_max, job.dy_max)
        .with_ignore_symmetry(job.ignore_symmetry)
        .with_parallel(job.parallel.clone())
        .with_backend(job.backend)
}
