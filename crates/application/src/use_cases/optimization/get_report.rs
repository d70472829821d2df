use crate::services::analyzer;
use crate::use_cases::costs::{GetNamespaceCostsUseCase, GetPodCostsUseCase};
use chrono::Utc;
use kubecent_domain::config::AnalysisConfig;
use kubecent_domain::{CostWindow, DomainError, OptimizationReport};
use std::sync::Arc;
use tracing::info;

pub struct GetOptimizationReportUseCase {
    namespaces: Arc<GetNamespaceCostsUseCase>,
    pods: Arc<GetPodCostsUseCase>,
    config: AnalysisConfig,
}

impl GetOptimizationReportUseCase {
    pub fn new(
        namespaces: Arc<GetNamespaceCostsUseCase>,
        pods: Arc<GetPodCostsUseCase>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            namespaces,
            pods,
            config,
        }
    }

    pub async fn execute(&self, window: &CostWindow) -> Result<OptimizationReport, DomainError> {
        let (namespaces, pods) = tokio::try_join!(
            self.namespaces.execute(window, false),
            self.pods.execute(None, window, false),
        )?;

        let report = analyzer::optimization_report(&self.config, &pods, &namespaces, Utc::now());
        info!(
            window = %window,
            suggestions = report.total_suggestions,
            estimated_savings = %report.estimated_total_savings,
            "Optimization report generated"
        );
        Ok(report)
    }
}
