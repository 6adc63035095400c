//! Config command implementation

use std::path::Path;

use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::LensConfig;
use crate::LensError;

type Result<T> = std::result::Result<T, LensError>;

/// Execute a config subcommand for the project at `root`
///
/// # Errors
/// Returns `LensError` if the project file exists and `--force` was not
/// given, or the file cannot be written or rendered.
pub fn execute(
    command: &ConfigCommands,
    root: &Path,
    effective: &LensConfig,
    quiet: bool,
) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => {
            let path = LensConfig::project_config_path(root);
            if path.exists() && !force {
                return Err(LensError::InvalidInput(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            LensConfig::default().save_to(&path)?;
            if !quiet {
                println!("{} {}", "✓ Wrote".green(), path.display());
            }
        }
        ConfigCommands::Show => {
            print!("{}", effective.to_toml()?);
        }
    }
    Ok(())
}
