use crate::services::analyzer;
use crate::use_cases::costs::{GetNamespaceCostsUseCase, GetPodCostsUseCase};
use kubecent_domain::{CostWindow, DomainError, SavingsReport};
use std::sync::Arc;
use tracing::info;

pub struct GetSavingsUseCase {
    namespaces: Arc<GetNamespaceCostsUseCase>,
    pods: Arc<GetPodCostsUseCase>,
    limit: usize,
}

impl GetSavingsUseCase {
    pub fn new(
        namespaces: Arc<GetNamespaceCostsUseCase>,
        pods: Arc<GetPodCostsUseCase>,
        limit: usize,
    ) -> Self {
        Self {
            namespaces,
            pods,
            limit,
        }
    }

    /// Namespace rightsizing recommendations from idle-inclusive costs.
    pub async fn execute(&self, window: &CostWindow) -> Result<SavingsReport, DomainError> {
        let report = self.namespaces.execute(window, true).await?;
        let savings = analyzer::namespace_savings(&report, self.limit);
        info!(
            window = %window,
            recommendations = savings.summary.total_recommendations,
            potential_savings = %savings.total_potential_savings,
            "Namespace savings analyzed"
        );
        Ok(savings)
    }

    /// Pod-level idle reduction recommendations.
    pub async fn execute_for_pods(
        &self,
        namespace: Option<&str>,
        window: &CostWindow,
    ) -> Result<SavingsReport, DomainError> {
        let report = self.pods.execute(namespace, window, true).await?;
        let savings = analyzer::pod_savings(&report, self.limit);
        info!(
            window = %window,
            recommendations = savings.summary.total_recommendations,
            potential_savings = %savings.total_potential_savings,
            "Pod savings analyzed"
        );
        Ok(savings)
    }
}
