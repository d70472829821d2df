use super::Services;
use kubecent_application::ports::CacheMaintenancePort;
use kubecent_application::use_cases::{
    CheckUpstreamHealthUseCase, GetCacheStatsUseCase, GetClusterCostUseCase,
    GetCostHistoryUseCase, GetEfficiencyUseCase, GetIdleCostsUseCase, GetMonthlyCostUseCase,
    GetNamespaceCostsUseCase, GetOptimizationReportUseCase, GetPodCostsUseCase, GetSavingsUseCase,
};
use kubecent_domain::Config;
use kubecent_infrastructure::cache_maintenance::CostCacheMaintenance;
use std::sync::Arc;

pub struct UseCases {
    pub cluster: Arc<GetClusterCostUseCase>,
    pub namespaces: Arc<GetNamespaceCostsUseCase>,
    pub pods: Arc<GetPodCostsUseCase>,
    pub monthly: Arc<GetMonthlyCostUseCase>,
    pub history: Arc<GetCostHistoryUseCase>,
    pub savings: Arc<GetSavingsUseCase>,
    pub efficiency: Arc<GetEfficiencyUseCase>,
    pub idle: Arc<GetIdleCostsUseCase>,
    pub report: Arc<GetOptimizationReportUseCase>,
    pub health: Arc<CheckUpstreamHealthUseCase>,
    pub cache_stats: Arc<GetCacheStatsUseCase>,
    pub maintenance: Arc<dyn CacheMaintenancePort>,
}

impl UseCases {
    pub fn new(services: &Services, config: &Config) -> Self {
        let source = &services.source;
        let cache = &services.cache;

        let cluster = Arc::new(GetClusterCostUseCase::new(
            source.clone(),
            cache.clone(),
            config.analysis.cluster_name.as_str(),
        ));
        let namespaces = Arc::new(GetNamespaceCostsUseCase::new(source.clone(), cache.clone()));
        let pods = Arc::new(GetPodCostsUseCase::new(source.clone(), cache.clone()));
        let monthly = Arc::new(GetMonthlyCostUseCase::new(source.clone(), cache.clone()));
        let history = Arc::new(GetCostHistoryUseCase::new(source.clone(), cache.clone()));

        let maintenance = Arc::new(CostCacheMaintenance::new(
            cache.clone(),
            cluster.clone(),
            namespaces.clone(),
            pods.clone(),
            monthly.clone(),
            history.clone(),
        ));

        Self {
            savings: Arc::new(GetSavingsUseCase::new(
                namespaces.clone(),
                pods.clone(),
                config.analysis.savings_limit,
            )),
            efficiency: Arc::new(GetEfficiencyUseCase::new(namespaces.clone())),
            idle: Arc::new(GetIdleCostsUseCase::new(namespaces.clone())),
            report: Arc::new(GetOptimizationReportUseCase::new(
                namespaces.clone(),
                pods.clone(),
                config.analysis.clone(),
            )),
            health: Arc::new(CheckUpstreamHealthUseCase::new(source.clone(), cache.clone())),
            cache_stats: Arc::new(GetCacheStatsUseCase::new(cache.clone())),
            maintenance,
            cluster,
            namespaces,
            pods,
            monthly,
            history,
        }
    }
}
