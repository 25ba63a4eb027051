//! PawnRepo CLI - sign in to the PawnRepo backend from the terminal.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use pawn_config_and_utils::{init_logging, Config, Paths};
use tracing::{debug, error};

/// PawnRepo CLI - manage your PawnRepo session.
#[derive(Parser)]
#[command(name = "pawnrepo")]
#[command(about = "PawnRepo CLI for account and session management")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Backend API URL, e.g. http://localhost:8000/api/v1
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    ephemeral: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login {
        /// Account email (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Logout and clear session
    Logout,

    /// Check authentication status
    Status,

    /// Create a new account
    Register {
        /// Account email
        #[arg(short, long)]
        email: String,

        /// Username (3-50 characters)
        #[arg(short, long)]
        username: String,
    },
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    paths.ensure_dirs()?;

    let mut config = Config::load(&paths)?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    init_logging("cli", &config.log_level, &paths, false);
    debug!(base_dir = %paths.base_dir().display(), "CLI starting");

    let provider = commands::start_provider(&paths, &config, cli.ephemeral).await?;

    match cli.command {
        Commands::Login { email } => commands::login(&provider, email, &cli.format).await,
        Commands::Logout => commands::logout(&provider, &cli.format).await,
        Commands::Status => commands::status(&provider, &cli.format).await,
        Commands::Register { email, username } => {
            commands::register(&provider, email, username, &cli.format).await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        output::print_error(&e.to_string(), &format);
        std::process::exit(1);
    }
}
