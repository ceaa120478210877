use std::fs::File;
use std::io::{self, BufReader, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use versiondocs::config::SessionConfig;
use versiondocs::shell::Session;

#[derive(Parser)]
#[command(name = "vdocs")]
#[command(about = "Branching, in-memory version control for text documents")]
struct Cli {
    /// Read commands from a file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Config file (defaults to <config dir>/versiondocs/config.json)
    #[arg(short, long, env = "VDOCS_CONFIG")]
    config: Option<PathBuf>,

    /// Print a snapshot reminder every N commands (0 disables)
    #[arg(long)]
    reminder_interval: Option<u32>,

    /// Echo each command before its output
    #[arg(long)]
    echo: bool,

    /// Log engine operations at debug level
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize tracing on stderr so stdout only carries command output
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "versiondocs=debug,vdocs=debug"
    } else {
        "versiondocs=info,vdocs=info"
    };
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = SessionConfig::load(cli.config.as_deref());
    if let Some(interval) = cli.reminder_interval {
        config.reminder_interval = interval;
    }
    if cli.echo {
        config.echo_commands = true;
    }
    tracing::debug!(?config, "loaded configuration");

    let mut session = Session::new(config);
    let stdout = io::stdout().lock();

    match cli.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open script {}", path.display()))?;
            session.run(BufReader::new(file), stdout, false)?;
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            session.run(stdin.lock(), stdout, interactive)?;
        }
    }

    Ok(())
}
