use crate::di::UseCases;
use kubecent_application::ports::CacheMaintenancePort;
use kubecent_domain::{Config, CostQuery, CostWindow};
use kubecent_jobs::{hot_queries, CacheCleanupJob, CostRefreshJob, JobRunner};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

const STATS_LOG_INTERVAL: Duration = Duration::from_secs(60);

fn log_cache_stats(use_cases: &UseCases) {
    let stats = use_cases.cache_stats.execute();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        expired = stats.expired,
        cached_items = stats.cached_items,
        hit_rate = format!("{:.1}%", stats.hit_rate()),
        "Cache statistics"
    );
}

/// Populates the hot keys once so the first refresh interval is not spent cold.
async fn warm_up(maintenance: &dyn CacheMaintenancePort, queries: &[CostQuery]) {
    match maintenance.run_refresh_cycle(queries).await {
        Ok(outcome) => info!(
            refreshed = outcome.refreshed,
            failed = outcome.failed,
            "Cache warm-up completed"
        ),
        Err(e) => warn!(error = %e, code = e.code(), "Cache warm-up failed, continuing"),
    }
}

/// Runs the refresh and cleanup jobs until Ctrl-C.
///
/// The cache lives in this process only. Nothing is served or persisted, so
/// the one-shot query subcommands always start from a cold cache and never
/// see entries warmed here.
pub async fn run(config: &Config, use_cases: &UseCases) -> anyhow::Result<()> {
    let windows = config
        .refresh
        .windows
        .iter()
        .map(|w| CostWindow::parse(w))
        .collect::<Result<Vec<_>, _>>()?;

    let shutdown = CancellationToken::new();
    let mut runner = JobRunner::new()
        .with_cache_cleanup(
            CacheCleanupJob::new(use_cases.maintenance.clone())
                .with_interval(config.cache.cleanup_interval()),
        )
        .with_shutdown_token(shutdown.clone());

    if config.refresh.enabled {
        warm_up(use_cases.maintenance.as_ref(), &hot_queries(&windows)).await;
        for window in &windows {
            runner = runner.with_cost_refresh(
                CostRefreshJob::new(
                    use_cases.maintenance.clone(),
                    hot_queries(std::slice::from_ref(window)),
                )
                .with_interval(config.refresh.interval()),
            );
        }
    } else {
        info!("Background refresh disabled");
    }

    let handles = runner.start().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut ticker = tokio::time::interval(STATS_LOG_INTERVAL);
    ticker.tick().await;

    loop {
        tokio::select! {
            signal = &mut ctrl_c => {
                signal?;
                break;
            }
            _ = ticker.tick() => log_cache_stats(use_cases),
        }
    }

    info!("Shutdown requested, stopping background jobs");
    shutdown.cancel();
    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "Background job ended abnormally");
        }
    }

    log_cache_stats(use_cases);
    info!("Shutdown complete");
    Ok(())
}
