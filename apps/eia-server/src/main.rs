//! EIA Assessment Server
//!
//! REST backend that runs the environmental impact assessment modules
//! over a project description and renders the results as reports:
//!
//! - Comprehensive assessment (nine modules, aggregated compliance score)
//! - Report generation (PDF/HTML/JSON)
//! - Component catalog and health
//!
//! Projects and assessments are kept in memory for the server lifetime.

use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;
mod models;
mod state;

use state::AppState;

/// Command-line arguments for the EIA server
#[derive(Parser, Debug)]
#[command(name = "eia-server")]
#[command(about = "Environmental impact assessment server")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(api::handle_health))
        // Assessment
        .route("/api/comprehensive-assess", post(api::handle_comprehensive_assess))
        .route("/api/assessments/:id", get(api::handle_get_assessment))
        .route("/api/assessment-components", get(api::handle_assessment_components))
        // Reports
        .route("/api/generate-professional-report", post(api::handle_generate_report))
        .route("/api/platform-capabilities", get(api::handle_platform_capabilities))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting EIA server on {}:{}", args.host, args.port);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(AppState::in_memory()).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
