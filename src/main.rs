//! NutriCalc
//!
//! An MCP server for recipe costing and nutrition labeling.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutricalc::build_info;
use nutricalc::config;
use nutricalc::db::{self, Database};
use nutricalc::mcp::NutriCalcService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config::DEFAULT_LOG_DIRECTIVE.parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let db_path = config::database_path();
    eprintln!("Database path: {}", db_path.display());

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    eprintln!("Initializing database...");
    let database = Database::open(&db_path)?;
    let version = database.with_conn(db::migrations::get_schema_version)?;
    tracing::info!(version, "Database ready");

    let service = NutriCalcService::new(db_path, database);

    // Start the MCP server over stdio and wait for the client to disconnect
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
