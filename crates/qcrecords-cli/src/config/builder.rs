use super::file::{FileConfig, FileFailurePolicy};
use super::models::{AppConfig, OutputFormat};
use crate::cli::PipelineArgs;
use crate::error::{CliError, Result};
use qcrecords::engine::config::{FailurePolicy, PipelineConfig, PipelineConfigBuilder};

/// Merges defaults, the config file, `-S` overrides and flags, in increasing precedence.
pub fn build_config(args: &PipelineArgs) -> Result<AppConfig> {
    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;
    let pipeline_file = file_config.pipeline.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();
    let defaults = PipelineConfig::default();

    let conformer_index = args
        .conformer_index
        .or(pipeline_file.conformer_index)
        .unwrap_or(defaults.conformer_index);

    let (allow_undefined_stereo, report_undefined_stereo) = if args.strict_stereo {
        (false, false)
    } else {
        (
            pipeline_file
                .allow_undefined_stereo
                .unwrap_or(defaults.allow_undefined_stereo),
            pipeline_file
                .report_undefined_stereo
                .unwrap_or(defaults.report_undefined_stereo),
        )
    };

    let on_error = if args.keep_going {
        FailurePolicy::Skip
    } else {
        pipeline_file
            .on_error
            .map(Into::into)
            .unwrap_or(defaults.on_error)
    };

    let core_config = PipelineConfigBuilder::new()
        .conformer_index(conformer_index)
        .allow_undefined_stereo(allow_undefined_stereo)
        .report_undefined_stereo(report_undefined_stereo)
        .on_error(on_error)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        input_path: args.input.clone(),
        core_config,
        output_format: output_file.format,
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let (key, value_str) = (key.trim(), value_str.trim());

        match key {
            "pipeline.conformer-index" => {
                config
                    .pipeline
                    .get_or_insert_with(Default::default)
                    .conformer_index = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!("Invalid integer value for {}: {}", key, value_str))
                })?);
            }
            "pipeline.allow-undefined-stereo" => {
                config
                    .pipeline
                    .get_or_insert_with(Default::default)
                    .allow_undefined_stereo = Some(parse_bool(key, value_str)?);
            }
            "pipeline.report-undefined-stereo" => {
                config
                    .pipeline
                    .get_or_insert_with(Default::default)
                    .report_undefined_stereo = Some(parse_bool(key, value_str)?);
            }
            "pipeline.on-error" => {
                let policy = match value_str.parse::<FailurePolicy>() {
                    Ok(FailurePolicy::Abort) => FileFailurePolicy::Abort,
                    Ok(FailurePolicy::Skip) => FileFailurePolicy::Skip,
                    Err(e) => return Err(CliError::Config(e.to_string())),
                };
                config.pipeline.get_or_insert_with(Default::default).on_error = Some(policy);
            }
            "output.format" => {
                let format = OutputFormat::parse(value_str).ok_or_else(|| {
                    CliError::Config(format!(
                        "Invalid value for {}: '{}'. Expected 'sdf' or 'xyz'.",
                        key, value_str
                    ))
                })?;
                config.output.get_or_insert_with(Default::default).format = Some(format);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid boolean value for {}: {}", key, value)))
}
