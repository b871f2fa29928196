mod config;
mod error;
mod filter;
mod notebook;
mod render;
mod server;
mod tools;

use anyhow::Result;
use config::Config;
use rmcp::ServiceExt;
use server::NotebookServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Load configuration (defaults when no config file is present)
    let config = Config::load()?;

    // Logging goes to stderr; stdout carries the MCP transport
    init_logging(&config);
    log::info!("Starting notebook MCP server...");
    if let Some(root) = &config.notebook.root_dir {
        log::info!("Notebook root directory: {}", root.display());
    }

    let service = NotebookServer::new(&config)
        .serve(rmcp::transport::io::stdio())
        .await?;
    log::info!("Server ready, waiting for requests");

    service.waiting().await?;
    log::info!("Server stopped");
    Ok(())
}

/// Initialize the logger at the configured level, letting `RUST_LOG`
/// override the config file.
fn init_logging(config: &Config) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(spec) => builder.parse_filters(&spec),
        Err(_) => builder.parse_filters(&config.logging.level),
    };
    builder.init();
}
