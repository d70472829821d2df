use crate::services::analyzer;
use crate::use_cases::costs::GetNamespaceCostsUseCase;
use kubecent_domain::{CostWindow, DomainError, EfficiencyReport};
use std::sync::Arc;

pub struct GetEfficiencyUseCase {
    namespaces: Arc<GetNamespaceCostsUseCase>,
}

impl GetEfficiencyUseCase {
    pub fn new(namespaces: Arc<GetNamespaceCostsUseCase>) -> Self {
        Self { namespaces }
    }

    pub async fn execute(&self, window: &CostWindow) -> Result<EfficiencyReport, DomainError> {
        let report = self.namespaces.execute(window, true).await?;
        Ok(analyzer::efficiency(&report))
    }
}
