use crate::cli::ConvertArgs;
use crate::config::{AppConfig, OutputFormat, build_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use qcrecords::{
    core::io::{
        sdf::SdfFile,
        timings::{TimingSummary, write_timings_to_path},
        traits::MolecularFile,
        xyz::XyzFile,
    },
    engine::progress::ProgressReporter,
    workflows::{self, convert::ConversionResult},
};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: ConvertArgs, progress_handler: CliProgressHandler) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app_config = build_config(&args.pipeline)?;
    let output = match &args.output {
        Some(path) => Some((path.as_path(), resolve_format(path, &app_config)?)),
        None => None,
    };

    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    println!("Converting {}...", app_config.input_path.display());
    let result =
        workflows::convert::run_path(&app_config.input_path, &app_config.core_config, &reporter)?;

    info!(
        "Reconstructed {} pair(s); {} triple(s) skipped.",
        result.len(),
        progress_handler.skipped()
    );
    print_summary(&result);

    if let Some((path, format)) = output {
        write_molecules(&result, path, format)?;
        println!("✓ {} molecule(s) written to: {}", result.len(), path.display());
    }

    if let Some(path) = &args.timings {
        info!("Writing {} timing row(s) to {:?}", result.timings.len(), path);
        write_timings_to_path(&result.timings, path).map_err(|e| CliError::output(path, e))?;
        println!("✓ Timings written to: {}", path.display());
    }

    Ok(())
}

fn resolve_format(path: &Path, app_config: &AppConfig) -> Result<OutputFormat> {
    if let Some(format) = OutputFormat::from_path(path) {
        if let Some(configured) = app_config.output_format.filter(|f| *f != format) {
            warn!(
                "Output extension selects {} but the config file asks for {}; using {}.",
                format, configured, format
            );
        }
        return Ok(format);
    }
    match app_config.output_format {
        Some(format) => Ok(format),
        None if path.extension().is_none() => Ok(OutputFormat::default()),
        None => Err(CliError::Argument(format!(
            "Cannot infer an output format from '{}'. Use a .sdf or .xyz extension or set output.format.",
            path.display()
        ))),
    }
}

fn write_molecules(result: &ConversionResult, path: &Path, format: OutputFormat) -> Result<()> {
    info!("Writing {} molecule(s) as {} to {:?}", result.len(), format, path);
    let entries = result
        .pairs
        .iter()
        .map(|(record, molecule)| (record.id(), molecule));

    let written = match format {
        OutputFormat::Sdf => SdfFile::write_all_to_path(entries, path),
        OutputFormat::Xyz => XyzFile::write_all_to_path(entries, path),
    };
    written.map_err(|e| CliError::output(path, e))
}

fn print_summary(result: &ConversionResult) {
    println!(
        "Reconstructed {} {} record(s).",
        result.len(),
        result.kind
    );

    if !result.failures.is_empty() {
        println!("Skipped {} triple(s):", result.failures.len());
        for failure in &result.failures {
            println!("  ✗ {}", failure);
        }
    }

    let undefined = result
        .molecules()
        .filter(|m| !m.undefined_stereo().is_empty())
        .count();
    if undefined > 0 {
        println!("{} molecule(s) have undefined stereochemistry.", undefined);
    }

    let timing = TimingSummary::from_records(&result.timings);
    if timing.count > 0 {
        println!(
            "Reconstruction time: {:.3} ms total, {:.1} µs mean, {:.1} µs max.",
            timing.total.as_secs_f64() * 1e3,
            timing.mean.as_secs_f64() * 1e6,
            timing.max.as_secs_f64() * 1e6
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcrecords::engine::config::PipelineConfig;
    use std::path::PathBuf;

    fn app(format: Option<OutputFormat>) -> AppConfig {
        AppConfig {
            input_path: PathBuf::from("batch.json"),
            core_config: PipelineConfig::default(),
            output_format: format,
        }
    }

    #[test]
    fn extension_wins_over_config() {
        let format = resolve_format(Path::new("out.xyz"), &app(Some(OutputFormat::Sdf))).unwrap();
        assert_eq!(format, OutputFormat::Xyz);
    }

    #[test]
    fn config_format_applies_to_unknown_extensions() {
        let format = resolve_format(Path::new("out.txt"), &app(Some(OutputFormat::Xyz))).unwrap();
        assert_eq!(format, OutputFormat::Xyz);
    }

    #[test]
    fn bare_path_defaults_to_sdf() {
        assert_eq!(
            resolve_format(Path::new("out"), &app(None)).unwrap(),
            OutputFormat::Sdf
        );
    }

    #[test]
    fn unknown_extension_without_config_is_an_argument_error() {
        assert!(matches!(
            resolve_format(Path::new("out.pdb"), &app(None)),
            Err(CliError::Argument(_))
        ));
    }
}
