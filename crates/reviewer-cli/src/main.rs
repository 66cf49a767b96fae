mod cmd;
mod output;

use clap::{Parser, Subcommand};
use cmd::{pr::PrSubcommand, team::TeamSubcommand, user::UserSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "reviewer",
    about = "Assign and reassign pull request reviewers within a team",
    version,
    propagate_version = true
)]
struct Cli {
    /// YAML config file (defaults apply when omitted)
    #[arg(long, global = true, env = "REVIEWER_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, overrides storage.path
    #[arg(long, global = true, env = "REVIEWER_DB")]
    db: Option<PathBuf>,

    /// Seed for reviewer selection, overrides assignment.seed
    #[arg(long, global = true, env = "REVIEWER_SEED")]
    seed: Option<u64>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on, overrides http.port
        #[arg(long, env = "HTTP_PORT")]
        port: Option<u16>,
    },

    /// Manage teams
    Team {
        #[command(subcommand)]
        subcommand: TeamSubcommand,
    },

    /// Manage users
    User {
        #[command(subcommand)]
        subcommand: UserSubcommand,
    },

    /// Create, merge and reassign pull requests
    Pr {
        #[command(subcommand)]
        subcommand: PrSubcommand,
    },

    /// List pull requests a user is reviewing
    Reviews { user_id: String },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = cmd::resolve_config(cli.config.as_deref(), cli.db, cli.seed).and_then(|config| {
        match cli.command {
            Commands::Serve { port } => cmd::serve::run(config, port),
            Commands::Team { subcommand } => cmd::team::run(&config, subcommand, cli.json),
            Commands::User { subcommand } => cmd::user::run(&config, subcommand, cli.json),
            Commands::Pr { subcommand } => cmd::pr::run(&config, subcommand, cli.json),
            Commands::Reviews { user_id } => cmd::user::reviews(&config, &user_id, cli.json),
        }
    });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
