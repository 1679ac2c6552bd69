mod commands;
mod render;
mod utils;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use calendars_core::{Config, DateRange, EventKind};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quarkus-calendars")]
#[command(about = "Keep the Quarkus release and call calendars in line with their YAML definitions")]
struct Cli {
    /// Configuration file (defaults to ./calendars.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile local event files with the remote calendars
    Reconcile {
        /// Only show what would be done, without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Only reconcile this calendar
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Start of the window (YYYY-MM-DD); defaults to the configured months before today
        #[arg(long)]
        from: Option<String>,

        /// End of the window (YYYY-MM-DD); defaults to the configured months after today
        #[arg(long)]
        to: Option<String>,
    },
    /// Verify the format of local event YAML files
    CheckFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Releases,
    Calls,
}

impl From<KindArg> for EventKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Releases => EventKind::Release,
            KindArg::Calls => EventKind::Call,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Reconcile {
            dry_run,
            kind,
            from,
            to,
        } => {
            let range = DateRange::from_args(from.as_deref(), to.as_deref(), config.default_range())
                .map_err(|e| anyhow::anyhow!(e))?;
            let kinds = match kind {
                Some(kind) => vec![kind.into()],
                None => EventKind::ALL.to_vec(),
            };
            commands::reconcile::run(config, kinds, range, dry_run).await?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::CheckFormat => {
            if commands::check_format::run(&config) {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
