use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coindash::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for coindash::AppCommand {
    fn from(cmd: Commands) -> coindash::AppCommand {
        match cmd {
            Commands::Market => coindash::AppCommand::Market,
            Commands::Sentiment => coindash::AppCommand::Sentiment,
            Commands::Derivatives => coindash::AppCommand::Derivatives,
            Commands::Balance => coindash::AppCommand::Balance,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display watchlist prices, daily change and RSI
    Market,
    /// Display the crypto Fear & Greed index
    Sentiment,
    /// Display futures long/short ratios and funding rates
    Derivatives,
    /// Display reconstructed balance history for tracked addresses
    Balance,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => coindash::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = coindash::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
watchlist:
  - symbol: "BTCUSDT"
  - symbol: "ETHUSDT"

addresses: []

rsi_period: 14
window_days: 90
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
