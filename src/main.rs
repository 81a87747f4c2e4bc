use std::path::Path;
use std::process::ExitCode;

use prandtl_torsion::initialization::{initialize_job, initialize_section, initialize_solver};
use prandtl_torsion::io::write_to_csv::{SummaryRecord, write_summary};
use prandtl_torsion::io::write_to_vtu::{create_output_dir, write_solution};
use prandtl_torsion::logger::init_logging;
use prandtl_torsion::{Outline, Result};

fn run(job_path: &str) -> Result<()> {
    let job = initialize_job(job_path)?;
    init_logging(job.log_level.as_deref());

    let section = initialize_section(&job.section)?;
    log::info!(
        "section '{}': {} vertices, area {:.6}",
        job.name,
        section.vertices().len(),
        section.area()
    );
    let solver = initialize_solver(&job);
    let solution = solver.solve(&section)?;

    let (max_slope, element) = solution.max_slope();
    let location = solution.max_slope_location();
    log::info!("J = {:.6}", solution.j());
    log::info!(
        "max slope = {:.6} at element {} ({:.4}, {:.4})",
        max_slope,
        element,
        location.x,
        location.y
    );
    log::info!("tau_max / T = {:.7}", solution.tmax_per_unit_torque());
    if let Some(torque) = job.torque {
        log::info!("tau_max = {:.6} for T = {}", solution.shear_stress(torque), torque);
        if let Some(g) = job.shear_modulus {
            log::info!("twist rate = {:.6e} for G = {}", solution.twist_rate(torque, g), g);
        }
    }

    let dir = create_output_dir(&job.output_dir)?;
    write_solution(&dir, &job.name, &solution)?;
    let record = SummaryRecord::new(&job.name, &solution);
    write_summary(Path::new(&job.output_dir).join("summary.csv"), &record)?;
    Ok(())
}

fn main() -> ExitCode {
    let job_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "inputs/job.json".to_string());
    match run(&job_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            init_logging(None);
            log::error!("{}: {}", job_path, err);
            ExitCode::FAILURE
        }
    }
}
