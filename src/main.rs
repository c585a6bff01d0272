use anyhow::Result;
use cachemon::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let topology = topology::SharedTopology::new(
        topology::Topology::load_from_file(&app_config.topology.path).await?,
    );
    let capacity = app_config.monitor.result_channel_capacity;
    let (handler, result_rx) = if app_config.monitor.precompute {
        cache::Handler::new_precompute(capacity, topology.clone())
    } else {
        cache::Handler::new(capacity)
    };
    tracing::info!(
        precompute = handler.precompute(),
        capacity,
        "cache handler ready"
    );

    let history = Arc::new(history::HistoryStore::new(app_config.monitor.max_history));
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let consumer_handle = worker::spawn_result_consumer(
        result_rx,
        history.clone(),
        worker::ConsumerConfig {
            stats_log_interval_secs: app_config.monitor.stats_log_interval_secs,
        },
        shutdown_rx,
    );
    let reload_handle = worker::spawn_topology_reload(
        topology.clone(),
        app_config.topology.path.clone(),
        app_config.topology.reload_interval_secs,
    );

    let app = routes::app(handler, history, topology);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                use tokio::signal::unix::{SignalKind, signal};
                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            reload_handle.abort();
            let _ = shutdown_tx.send(());
            let _ = consumer_handle.await;
        }
    }

    Ok(())
}
