use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use leave_policy_engine::api::{AppState, create_router};
use leave_policy_engine::config::ConfigLoader;
use leave_policy_engine::evaluation::PolicyEvaluator;
use leave_policy_engine::staffing::StaticStaffingOracle;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir = env::var("LEAVE_POLICY_CONFIG_DIR").unwrap_or_else(|_| "./config".to_string());
    let addr = env::var("LEAVE_POLICY_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let loader = ConfigLoader::load(&config_dir)
        .with_context(|| format!("failed to load configuration from {}", config_dir))?;
    let (catalog, settings, staffing) = loader.into_parts();

    let mut evaluator =
        PolicyEvaluator::new(Arc::new(catalog)).with_staffing_settings(&settings.staffing);
    if let Some(staffing) = staffing {
        evaluator = evaluator.with_staffing_oracle(Arc::new(StaticStaffingOracle::new(staffing)));
    }

    let app = create_router(AppState::new(evaluator));

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(addr = %addr, version = env!("CARGO_PKG_VERSION"), "Leave policy engine listening");

    axum::serve(listener, app).await?;
    Ok(())
}
