use crate::services::analyzer;
use crate::use_cases::costs::GetNamespaceCostsUseCase;
use kubecent_domain::{CostWindow, DomainError, IdleCostReport};
use std::sync::Arc;

pub struct GetIdleCostsUseCase {
    namespaces: Arc<GetNamespaceCostsUseCase>,
}

impl GetIdleCostsUseCase {
    pub fn new(namespaces: Arc<GetNamespaceCostsUseCase>) -> Self {
        Self { namespaces }
    }

    pub async fn execute(&self, window: &CostWindow) -> Result<IdleCostReport, DomainError> {
        let report = self.namespaces.execute(window, true).await?;
        Ok(analyzer::idle_costs(&report))
    }
}
