//! Standalone share-link resolution CLI.
//!
//! Prints a JSON payload to stdout. Logical failure is still a clean
//! exit 0 with an error payload; only a missing argument (clap usage
//! error, exit 2) or an uncaught fault produces a non-zero exit.

use anyhow::Result;
use clap::Parser;
use server_core::server::routes::LinkResponse;
use server_core::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "resolve")]
#[command(about = "Resolve a share-page URL to a direct download link")]
struct Cli {
    /// Share page URL to resolve
    url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays parseable JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let runtime = resolver::probe();
    let resolver = server_core::build_resolver(config.policy, runtime);

    let response = match resolver.resolve(&cli.url).await {
        Ok(link) => LinkResponse::ok(link),
        Err(e) => LinkResponse::err(e.to_string()),
    };

    println!("{}", serde_json::to_string(&response)?);

    Ok(())
}
