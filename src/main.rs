use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ual::{Commands, Container, ContainerConfig, Router};

#[derive(Parser)]
#[command(name = "ual")]
#[command(author, version, about = "Unified access layer over heterogeneous backend systems", long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Upper bound on each health probe, in milliseconds
    #[arg(long, global = true, default_value = "5000")]
    probe_timeout_ms: u64,

    /// Suppress audit lines for executed operations
    #[arg(long, global = true)]
    no_audit: bool,

    /// Start without the bundled example systems
    #[arg(long, global = true)]
    empty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise warnings plus audit lines, or everything at debug.
    let default_filter = if cli.verbose {
        "debug"
    } else {
        "warn,ual::audit=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let container = Container::new(ContainerConfig {
        probe_timeout: Duration::from_millis(cli.probe_timeout_ms),
        audit_log: !cli.no_audit,
        seed_examples: !cli.empty,
    })?;

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}
