use clap::Parser;
use tracing_subscriber::EnvFilter;

use pkgdep::{Cli, run};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();
    if let Err(e) = run(args).await {
        tracing::error!(error = %e, "execution failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
