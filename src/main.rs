use clap::{Parser, builder::styling};
use eyre::Result;
use sales_etl::{Config, SyncOutcome, config, init_db, logging};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Load the sales CSV into the destination database unless the table already exists
///
/// Configuration is read from the environment (or a .env file):
/// DB_URL, RAW_DATA_PATH, LOG_FILE, LOG_MAX_BYTES, LOG_MAX_FILES, LOG_LEVEL
#[derive(Parser)]
#[command(name = "sales-etl", version, styles = STYLES)]
struct Cli {}

fn main() -> Result<()> {
    Cli::parse();

    let dotenv = config::load_dotenv()?;
    let config = Config::from_env()?;
    logging::init(&config.log)?;

    if let Some(path) = dotenv {
        log::debug!("Loaded environment from {}", path.display());
    }
    log::debug!("Configuration: {:?}", config);

    match init_db(&config)? {
        SyncOutcome::Skipped => log::debug!("Nothing to do"),
        SyncOutcome::Loaded { rows } => {
            log::info!("✓ Loaded {} row(s) into '{}'", rows, config.table)
        }
    }

    Ok(())
}
