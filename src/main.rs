use std::process::ExitCode;

use anyhow::{bail, Result};

use taskdown_validator::config::{init_logging, Config, OutputFormat};
use taskdown_validator::report::validate_path;
use taskdown_validator::TaskdownValidator;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let config = Config::from_args_and_env()?;
    init_logging(&config.log_level);

    if config.files.is_empty() {
        bail!("No input files given");
    }

    let validator = TaskdownValidator::new(config.validation_options());

    let mut reports = Vec::with_capacity(config.files.len());
    for path in &config.files {
        reports.push(validate_path(&validator, path).await?);
    }

    match config.format {
        OutputFormat::Text => {
            for report in &reports {
                print!("{}", report.render_text());
            }
            let invalid = reports.iter().filter(|r| !r.is_valid).count();
            eprintln!(
                "Checked {} file(s), {} with problems",
                reports.len(),
                invalid
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
    }

    if reports.iter().all(|r| r.is_valid) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
