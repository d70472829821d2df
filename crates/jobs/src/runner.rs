use crate::{CacheCleanupJob, CostRefreshJob};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub trait SpawnableJob: Send + Sync + 'static {
    fn with_cancellation(self, token: CancellationToken) -> Self;
    fn start_job(self: Arc<Self>) -> JoinHandle<()>;
}

macro_rules! impl_spawnable_job {
    ($t:ty) => {
        impl SpawnableJob for $t {
            fn with_cancellation(self, token: CancellationToken) -> Self {
                self.with_cancellation(token)
            }

            fn start_job(self: Arc<Self>) -> JoinHandle<()> {
                tokio::spawn(async move { self.start().await })
            }
        }
    };
}

impl_spawnable_job!(CostRefreshJob);
impl_spawnable_job!(CacheCleanupJob);

fn spawn_jobs<J: SpawnableJob>(
    jobs: impl IntoIterator<Item = J>,
    shutdown: &Option<CancellationToken>,
    handles: &mut Vec<JoinHandle<()>>,
) {
    for job in jobs {
        let job = match shutdown {
            Some(token) => job.with_cancellation(token.clone()),
            None => job,
        };
        handles.push(Arc::new(job).start_job());
    }
}

pub struct JobRunner {
    cost_refresh: Vec<CostRefreshJob>,
    cache_cleanup: Option<CacheCleanupJob>,
    shutdown: Option<CancellationToken>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self {
            cost_refresh: Vec::new(),
            cache_cleanup: None,
            shutdown: None,
        }
    }

    /// Adds a refresh job. Each one runs its own loop, so a stalled cycle in
    /// one job never delays another job's keys.
    pub fn with_cost_refresh(mut self, job: CostRefreshJob) -> Self {
        self.cost_refresh.push(job);
        self
    }

    pub fn with_cache_cleanup(mut self, job: CacheCleanupJob) -> Self {
        self.cache_cleanup = Some(job);
        self
    }

    pub fn with_shutdown_token(mut self, token: CancellationToken) -> Self {
        self.shutdown = Some(token);
        self
    }

    /// Spawns every configured job. Awaiting the returned handles after
    /// cancelling the shutdown token waits for the loops to exit.
    pub async fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");

        let mut handles = Vec::with_capacity(self.cost_refresh.len() + 1);
        spawn_jobs(self.cost_refresh, &self.shutdown, &mut handles);
        spawn_jobs(self.cache_cleanup, &self.shutdown, &mut handles);

        info!(jobs = handles.len(), "All background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
