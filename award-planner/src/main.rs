use std::net::SocketAddr;

use award_planner::availability::{AvailabilityClient, AvailabilityConfig, MockAvailabilityClient};
use award_planner::cache::{CacheConfig, CachedAvailabilityClient};
use award_planner::planner::PlannerConfig;
use award_planner::web::{AppState, Backend, create_router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("award_planner=info,tower_http=info")),
        )
        .init();

    // Fixtures on disk take precedence over the live API
    let backend = match std::env::var("AWARD_MOCK_DIR") {
        Ok(dir) => {
            info!(%dir, "serving availability from fixtures");
            Backend::Mock(MockAvailabilityClient::new(&dir)?)
        }
        Err(_) => {
            let api_key = std::env::var("AWARD_API_KEY").unwrap_or_else(|_| {
                warn!("AWARD_API_KEY not set. API calls will fail.");
                String::new()
            });
            let mut config = AvailabilityConfig::new(api_key);
            if let Ok(url) = std::env::var("AWARD_API_BASE_URL") {
                config = config.with_base_url(url);
            }
            let client = AvailabilityClient::new(config)?;
            Backend::Live(CachedAvailabilityClient::new(client, &CacheConfig::default()))
        }
    };

    let state = AppState::new(backend, PlannerConfig::default());
    let app = create_router(state);

    let addr: SocketAddr = std::env::var("AWARD_LISTEN_ADDR")
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()?;

    info!(%addr, "award planner listening");
    info!("  GET  /health                - Health check");
    info!("  GET  /api/calendar          - Per-date availability for a route");
    info!("  POST /api/segments          - Fetch and normalize each segment");
    info!("  POST /api/combinations      - Enumerate feasible combinations");
    info!("  POST /api/selection/toggle  - Pin or unpin a leg");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
