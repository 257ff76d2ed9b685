//! Monitoring pipeline worker binary.
//!
//! Analyzes the images given on the command line and records any threats,
//! escalating high-confidence alerts per the configured destinations.

use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vigil_classify::ClassifyProfile;
use vigil_escalate::{EscalationRouter, LogTransport};
use vigil_store::AlertStore;
use vigil_vision::VisionClient;
use vigil_worker::{DetectionPipeline, WorkerConfig};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vigil=info".parse().unwrap())
        .add_directive("sqlx=warn".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting vigil-worker");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    if let Some(addr) = &config.metrics_addr {
        match addr.parse::<std::net::SocketAddr>() {
            Ok(socket) => {
                if let Err(e) = metrics_exporter_prometheus::PrometheusBuilder::new()
                    .with_http_listener(socket)
                    .install()
                {
                    warn!("Failed to install metrics exporter: {}", e);
                }
            }
            Err(e) => warn!(addr = %addr, "Invalid metrics address: {}", e),
        }
    }

    let vision = match VisionClient::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to create vision client: {}", e);
            std::process::exit(1);
        }
    };

    let store = match AlertStore::connect(&config.database_url).await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to open alert store: {}", e);
            std::process::exit(1);
        }
    };

    // The router shares the store's pool; the store gets the router injected
    // and invokes it after each successful insert.
    let router = Arc::new(EscalationRouter::new(
        store.clone(),
        Arc::new(LogTransport),
    ));
    let store = store.with_escalator(router);

    let pipeline = DetectionPipeline::new(vision, store);

    let location = std::env::var("VIGIL_LOCATION").ok();
    let images: Vec<String> = std::env::args().skip(1).collect();
    if images.is_empty() {
        error!("Usage: vigil-worker <image> [image ...]");
        std::process::exit(2);
    }

    let mut failed = false;
    for path in &images {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) => {
                error!(path = %path, "Failed to read image: {}", e);
                failed = true;
                continue;
            }
        };

        match pipeline
            .analyze_image(
                &bytes,
                path,
                location.as_deref(),
                ClassifyProfile::SingleImage,
            )
            .await
        {
            Ok(outcome) if outcome.is_clear() => {
                info!(path = %path, "image clear, no threats detected");
            }
            Ok(outcome) => {
                for alert in &outcome.alerts {
                    info!(
                        alert_id = alert.id,
                        threat = %alert.threat,
                        confidence = alert.confidence,
                        "{}",
                        alert.summary()
                    );
                }
            }
            Err(e) if e.is_recoverable() => {
                warn!(path = %path, "analysis failed, skipping image: {}", e);
                failed = true;
            }
            Err(e) => {
                error!(path = %path, "fatal pipeline error: {}", e);
                std::process::exit(1);
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}
