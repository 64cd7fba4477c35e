use clap::Parser;
use std::process;
use taskstore::TaskStore;
use taskstore::cli::Cli;
use taskstore::cli_handlers;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so command output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.connection.to_config();
    let store = TaskStore::open(&config)?;

    // On error the store is dropped, which still releases the pool
    cli_handlers::dispatch(&store, cli.command)?;
    store.close()?;
    Ok(())
}
