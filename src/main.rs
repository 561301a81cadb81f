use slack_log_forwarder::NotificationAdapter;
use slack_log_forwarder::config::Route;
use slack_log_forwarder::error::Result;
use slack_log_forwarder::ingest::json_lines;
use slack_log_forwarder::logging::init_tracing;
use slack_log_forwarder::record::EnvironmentSnapshot;
use tokio::io::BufReader;
use tokio::signal;

const DEFAULT_ROUTE: &str = "slack://hooks.slack.com";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Load .env file if present
    dotenvy::dotenv().ok();

    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    init_tracing(json_logs);

    tracing::info!("🚀 Starting Slack log forwarder");

    // Route from the first argument, then SLACK_ROUTE
    let route_uri = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SLACK_ROUTE").ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| DEFAULT_ROUTE.to_string());
    let route = Route::parse(&route_uri)?;
    tracing::debug!(address = %route.address, options = route.options.len(), "Route parsed");

    let env = EnvironmentSnapshot::capture();
    let adapter = match NotificationAdapter::create(&route, env) {
        Ok(adapter) => adapter,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create Slack adapter");
            return Err(e);
        }
    };
    tracing::info!("✅ Adapter ready, reading log records from stdin");

    let records = json_lines(BufReader::new(tokio::io::stdin()));

    let shutdown = async {
        let signal_name = shutdown_signal().await;
        tracing::info!(
            signal = %signal_name,
            "Received shutdown signal, finishing current record"
        );
    };
    let summary = adapter.run_until(records, shutdown).await;
    tracing::info!(
        received = summary.received,
        delivered = summary.delivered,
        failed = summary.failed,
        "Shutting down"
    );

    Ok(())
}

/// Wait for SIGINT (Ctrl+C), SIGTERM, or SIGQUIT on Unix systems
async fn shutdown_signal() -> String {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        let (Ok(mut sigint), Ok(mut sigterm), Ok(mut sigquit)) = (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
            signal(SignalKind::quit()),
        ) else {
            tracing::warn!("Failed to install signal handlers, running until input closes");
            return std::future::pending().await;
        };

        tokio::select! {
            _ = sigint.recv() => "SIGINT (Ctrl+C)".to_string(),
            _ = sigterm.recv() => "SIGTERM".to_string(),
            _ = sigquit.recv() => "SIGQUIT".to_string(),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            return std::future::pending().await;
        }
        "Ctrl+C".to_string()
    }
}
