#![cfg(not(tarpaulin_include))]

use env_logger::Env;
use farmweb::app;
use farmweb::config::Config;

/// Main entry point for the web application
///
/// Initializes logging (`RUST_LOG`, default `info`), reads the `FARMWEB_*`
/// environment variables and serves until Ctrl+C or SIGTERM.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::load()?;
    log::info!("Starting farmweb on {} (blog upstream {})", config.address(), config.blog_url);

    app::run(config).await
}
