mod run;

pub use run::run;

use crate::di::UseCases;
use crate::Command;
use kubecent_application::use_cases::HealthStatus;
use kubecent_domain::DomainError;
use serde::Serialize;
use std::process::ExitCode;
use tracing::error;

const DEGRADED_EXIT: u8 = 2;

#[derive(Serialize)]
struct DegradedResponse<'a> {
    degraded: bool,
    error: String,
    code: &'a str,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the result as JSON. An unreachable or failing upstream yields a
/// degraded document and a non-zero exit; other errors are returned.
fn render<T: Serialize>(result: Result<T, DomainError>) -> anyhow::Result<ExitCode> {
    match result {
        Ok(value) => {
            print_json(&value)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_upstream_degraded() => {
            error!(error = %e, code = e.code(), "Cost API unavailable");
            print_json(&DegradedResponse {
                degraded: true,
                error: e.to_string(),
                code: e.code(),
            })?;
            Ok(ExitCode::from(DEGRADED_EXIT))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn query(command: Command, use_cases: &UseCases) -> anyhow::Result<ExitCode> {
    match command {
        Command::Cluster { window } => render(use_cases.cluster.execute(&window).await),
        Command::Namespaces { window, idle } => {
            render(use_cases.namespaces.execute(&window, idle).await)
        }
        Command::Pods {
            namespace,
            window,
            idle,
        } => render(
            use_cases
                .pods
                .execute(namespace.as_deref(), &window, idle)
                .await,
        ),
        Command::Monthly { months } => render(use_cases.monthly.execute(months).await),
        Command::History { window } => render(use_cases.history.execute(&window).await),
        Command::Savings {
            window,
            pods: true,
            namespace,
            ..
        } => render(
            use_cases
                .savings
                .execute_for_pods(namespace.as_deref(), &window)
                .await,
        ),
        Command::Savings { window, .. } => render(use_cases.savings.execute(&window).await),
        Command::Efficiency { window } => render(use_cases.efficiency.execute(&window).await),
        Command::Idle { window } => render(use_cases.idle.execute(&window).await),
        Command::Report { window } => render(use_cases.report.execute(&window).await),
        Command::Health => {
            let report = use_cases.health.execute().await;
            print_json(&report)?;
            Ok(match report.status {
                HealthStatus::Healthy => ExitCode::SUCCESS,
                HealthStatus::Degraded => ExitCode::from(DEGRADED_EXIT),
            })
        }
        Command::Run | Command::InitConfig { .. } => {
            anyhow::bail!("not a query command")
        }
    }
}
