use std::sync::Arc;

use observability_dashboard::{
    api::view::{self, ViewState},
    client::HttpBackend,
    config::DashboardConfig,
    logging, metrics,
    summary::DashboardSummary,
    Poller,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = logging::init_logger(config.log_format) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // Initialize metrics
    metrics::init_metrics();

    let backend = match HttpBackend::new(&config) {
        Ok(backend) => backend,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(api_url = %config.api_url, "Polling observability API");
    let poller = Poller::new(Arc::new(backend));
    if let Err(e) = poller.start(config.refresh_interval) {
        error!("{}", e);
        std::process::exit(1);
    }

    let mut updates = poller.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let summary = DashboardSummary::from_snapshot(&updates.borrow_and_update().snapshot);
            info!(
                total_requests = summary.total_requests,
                active_alerts = summary.active_alerts,
                avg_llm_cost = %summary.avg_llm_cost,
                drift_detection = summary.drift_detection,
                "Dashboard refreshed"
            );
        }
    });

    let state = ViewState {
        dashboard: poller.subscribe(),
    };
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }
    };

    if let Err(e) = view::start_view_server(&config.bind_addr(), state, shutdown).await {
        error!("{}", e);
    }

    poller.stop().await;
}
