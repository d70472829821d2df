use kubecent_application::ports::CostSource;
use kubecent_application::services::CostCache;
use kubecent_domain::Config;
use kubecent_infrastructure::opencost::OpenCostClient;
use std::sync::Arc;
use tracing::info;

pub struct Services {
    pub source: Arc<dyn CostSource>,
    pub cache: Arc<CostCache>,
}

impl Services {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = OpenCostClient::from_config(&config.opencost)?;
        info!(
            url = client.base_url(),
            timeout_secs = config.opencost.timeout_secs,
            max_attempts = config.opencost.max_attempts,
            "OpenCost client ready"
        );

        Ok(Self {
            source: Arc::new(client),
            cache: Arc::new(CostCache::new(config.cache.ttl())),
        })
    }
}
