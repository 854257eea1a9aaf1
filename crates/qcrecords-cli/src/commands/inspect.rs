use crate::cli::InspectArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use qcrecords::core::records::{QcSpec, TypedRecord};
use qcrecords::{engine::progress::ProgressReporter, workflows};
use tracing::info;

pub fn run(args: InspectArgs, progress_handler: CliProgressHandler) -> Result<()> {
    let app_config = build_config(&args.pipeline)?;
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let result =
        workflows::convert::run_path(&app_config.input_path, &app_config.core_config, &reporter)?;
    info!("Inspecting {} pair(s).", result.len());

    let limit = args.limit.unwrap_or(usize::MAX);
    for (position, (record, molecule)) in result.pairs.iter().enumerate().take(limit) {
        println!("[{}] {}", position, record);
        for line in describe(record) {
            println!("      {}", line);
        }
        println!("      {}", molecule);
        if !molecule.undefined_stereo().is_empty() {
            let centers: Vec<String> = molecule
                .undefined_stereo()
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("      undefined stereo: {}", centers.join(", "));
        }
    }

    if result.len() > limit {
        println!("... {} more pair(s) not shown.", result.len() - limit);
    }
    for failure in &result.failures {
        println!("  ✗ {}", failure);
    }
    Ok(())
}

/// Kind-specific detail lines for one record.
fn describe(record: &TypedRecord) -> Vec<String> {
    let mut lines = Vec::new();
    match record {
        TypedRecord::Optimization(r) => {
            let final_molecule = r.final_molecule.as_deref().unwrap_or("-");
            lines.push(format!(
                "molecule {} -> {}, {} step(s)",
                r.initial_molecule,
                final_molecule,
                r.energies.len()
            ));
            if let Some(spec) = &r.qc_spec {
                lines.push(level_of_theory(spec));
            }
        }
        TypedRecord::TorsionDrive(r) => {
            let dihedrals: Vec<String> = r
                .keywords
                .dihedrals
                .iter()
                .map(|d| format!("{}-{}-{}-{}", d[0], d[1], d[2], d[3]))
                .collect();
            lines.push(format!(
                "dihedral(s) {} at {:?} degree spacing",
                dihedrals.join(", "),
                r.keywords.grid_spacing
            ));
            if let Some((grid, energy)) = r.global_minimum() {
                lines.push(format!("global minimum {energy:.8} Eh at {grid}"));
            }
            lines.push(format!(
                "{} minimum optimization(s) via {}",
                r.minimum_optimization_ids().len(),
                r.optimization_spec.program
            ));
            if let Some(spec) = &r.qc_spec {
                lines.push(level_of_theory(spec));
            }
        }
    }
    lines
}

fn level_of_theory(spec: &QcSpec) -> String {
    match &spec.basis {
        Some(basis) => format!("{}/{} ({})", spec.method, basis, spec.program),
        None => format!("{} ({})", spec.method, spec.program),
    }
}
