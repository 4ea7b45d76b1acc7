use std::net::SocketAddr;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use efa_client::efa::{EfaConfig, Fetcher, HttpFetcher, MockFetcher};
use efa_client::session::EfaSession;
use efa_client::web::{AppState, create_router};

const DEFAULT_FILTER: &str = "efa_client=info,tower_http=info";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    init_logging();

    let base_url = std::env::var("EFA_BASE_URL").expect("EFA_BASE_URL must be set");
    let mut config = EfaConfig::new(base_url);
    if let Ok(language) = std::env::var("EFA_LANGUAGE") {
        config = config.with_language(language);
    }
    if let Ok(secs) = std::env::var("EFA_TIMEOUT_SECS") {
        let secs: u64 = secs.parse().expect("EFA_TIMEOUT_SECS must be a number of seconds");
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let addr: SocketAddr = std::env::var("EFA_BIND")
        .unwrap_or_else(|_| DEFAULT_BIND.to_string())
        .parse()
        .expect("EFA_BIND must be a socket address");

    match std::env::var("EFA_MOCK_DIR") {
        Ok(dir) => {
            warn!(%dir, "serving canned responses, the EFA server will not be contacted");
            let fetcher = MockFetcher::from_dir(&dir).expect("Failed to load mock responses");
            serve(EfaSession::new(config, fetcher), addr).await;
        }
        Err(_) => {
            let fetcher = HttpFetcher::new(&config).expect("Failed to create HTTP client");
            serve(EfaSession::new(config, fetcher), addr).await;
        }
    }
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

async fn serve<F: Fetcher + 'static>(session: EfaSession<F>, addr: SocketAddr) {
    info!(base_url = %session.config().base_url, "using EFA endpoint");
    let app = create_router(AppState::new(session));

    println!("EFA client listening on http://{addr}");
    println!();
    println!("API Endpoints:");
    println!("  GET  /health            - Health check");
    println!("  GET  /capabilities      - Supported features and restrictions");
    println!("  GET  /stations          - Find stations by name or lat/lon");
    println!("  GET  /timetable         - Departures or arrivals at a station");
    println!("  GET  /journeys          - Search journeys");
    println!("  GET  /journeys/later    - Later journeys for the last search");
    println!("  GET  /journeys/earlier  - Earlier journeys for the last search");
    println!("  GET  /journeys/:id      - Legs of a journey from the last search");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
