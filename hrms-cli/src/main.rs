mod cli;
mod config;
mod roster;

use anyhow::Result;
use clap::Parser;

use crate::cli::Commands;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "hrms", version, about = "Staff roster, leave records and due-date reports")]
struct Cli {
    /// Database file or sqlite: URL (overrides config.toml and HRMS_DATABASE)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Increase log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load(cli.database.as_deref()).await?;
    cli::run(cli.command, &config).await
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
