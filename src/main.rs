use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod error;
mod export;
mod script;
mod settings;
mod trade;

use error::MigrationError;
use settings::Settings;

/// Exports the legacy trades and writes the import script next to them.
///
/// Returns the script path, or `None` when the legacy database is missing.
fn run(settings: &Settings) -> Result<Option<PathBuf>> {
    let trades = match export::export(&settings.app) {
        Ok(trades) => trades,
        Err(MigrationError::SourceMissing(path)) => {
            error!(path = %path.display(), "Database file not found");
            return Ok(None);
        }
        Err(e) => return Err(e).context("Failed to export trades"),
    };
    let script = script::render(&trades, &settings.api);
    let path = settings.app.output_dir.join(script::SCRIPT_FILE);
    script::write(&path, &script).context("Failed to write import script")?;
    info!(path = %path.display(), "Import script created");
    Ok(Some(path))
}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let settings = Settings::new().context("Failed to load settings")?;
    if let Some(path) = run(&settings)? {
        println!();
        println!("Next steps:");
        println!("1. Create the margin portfolio in the new system");
        println!("2. Run {}", path.display());
        println!("3. Check the result in the web interface");
    }
    Ok(())
}
