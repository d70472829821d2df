use crate::ports::CostSource;
use crate::services::normalizer::normalize_namespaces;
use crate::services::{CostCache, CostSnapshot};
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use kubecent_domain::{
    AggregateLevel, CostQuery, CostWindow, Decimal, DomainError, MonthlyCost, MonthlyCostReport,
};
use std::sync::Arc;
use tracing::{debug, info};

pub const MAX_MONTHS: u32 = 24;

pub struct GetMonthlyCostUseCase {
    source: Arc<dyn CostSource>,
    cache: Arc<CostCache>,
}

impl GetMonthlyCostUseCase {
    pub fn new(source: Arc<dyn CostSource>, cache: Arc<CostCache>) -> Self {
        Self { source, cache }
    }

    /// Cost of the last `months` calendar months, oldest first. The current
    /// month is covered up to now.
    pub async fn execute(&self, months: u32) -> Result<Arc<MonthlyCostReport>, DomainError> {
        validate_months(months)?;
        let key = CostQuery::Monthly { months }.cache_key();
        self.cache
            .get_or_set(&key, || async {
                self.fetch(months, Utc::now())
                    .await
                    .map(CostSnapshot::Monthly)
            })
            .await?
            .into_monthly()
    }

    pub async fn refresh(&self, months: u32) -> Result<Arc<MonthlyCostReport>, DomainError> {
        validate_months(months)?;
        let report = self.fetch(months, Utc::now()).await?;
        self.cache.set(
            &CostQuery::Monthly { months }.cache_key(),
            CostSnapshot::Monthly(Arc::clone(&report)),
        );
        Ok(report)
    }

    async fn fetch(
        &self,
        months: u32,
        now: DateTime<Utc>,
    ) -> Result<Arc<MonthlyCostReport>, DomainError> {
        let mut entries = Vec::with_capacity(months as usize);
        let mut total = Decimal::ZERO;

        for back in (0..months).rev() {
            let (label, window) = month_window(now, back)?;
            debug!(month = %label, window = %window, "Fetching monthly cost");

            let raw = self
                .source
                .get_allocation(AggregateLevel::Namespace, &window, false)
                .await?;
            let namespaces = normalize_namespaces(&raw);

            let month_total = namespaces
                .iter()
                .fold(Decimal::ZERO, |acc, ns| acc.saturating_add(ns.allocation.total_cost));
            let pods = namespaces
                .iter()
                .map(|ns| ns.pod_count.unwrap_or(0))
                .fold(0u64, u64::saturating_add);

            total = total.saturating_add(month_total);
            entries.push(MonthlyCost {
                month: label,
                total_cost: month_total,
                daily_average: month_total / Decimal::from(window.days()),
                namespaces: namespaces.len(),
                pods,
            });
        }

        info!(months, total = %total, "Monthly costs computed");
        Ok(Arc::new(MonthlyCostReport {
            months: entries,
            total,
            period: if months == 1 {
                "1 month".to_string()
            } else {
                format!("{} months", months)
            },
        }))
    }
}

fn validate_months(months: u32) -> Result<(), DomainError> {
    if months == 0 || months > MAX_MONTHS {
        return Err(DomainError::InvalidWindow(format!(
            "months must be between 1 and {}, got {}",
            MAX_MONTHS, months
        )));
    }
    Ok(())
}

/// `YYYY-MM` label and explicit range window for the month `back` months
/// before the one containing `now`.
pub fn month_window(now: DateTime<Utc>, back: u32) -> Result<(String, CostWindow), DomainError> {
    let (year, month) = shift_month(now, back);
    let start = month_start(year, month)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = month_start(next_year, next_month)?
        .min(now)
        .max(start + ChronoDuration::hours(1));

    let window = CostWindow::range(start, end)?;
    Ok((format!("{:04}-{:02}", year, month), window))
}

fn shift_month(now: DateTime<Utc>, back: u32) -> (i32, u32) {
    use chrono::Datelike;
    let index = now.year() * 12 + now.month0() as i32 - back as i32;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

fn month_start(year: i32, month: u32) -> Result<DateTime<Utc>, DomainError> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| DomainError::Internal(format!("invalid month {}-{}", year, month)))
}
