use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use kubecent_domain::{CliOverrides, CostWindow};
use std::process::ExitCode;
use tracing::info;

mod bootstrap;
mod commands;
mod di;

#[derive(Parser)]
#[command(name = "kubecent")]
#[command(version)]
#[command(about = "Kubecent - Kubernetes cost aggregation over OpenCost")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, global = true, value_name = "FILE")]
    config: Option<String>,

    /// OpenCost base URL
    #[arg(long, global = true, value_name = "URL")]
    opencost_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Cache TTL in seconds
    #[arg(long, global = true, value_name = "SECS")]
    cache_ttl: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Cluster-wide cost summary
    Cluster {
        #[arg(short, long, default_value = "7d")]
        window: CostWindow,
    },

    /// Cost per namespace
    Namespaces {
        #[arg(short, long, default_value = "7d")]
        window: CostWindow,

        /// Include idle cost
        #[arg(long)]
        idle: bool,
    },

    /// Cost per pod
    Pods {
        /// Only pods in this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        #[arg(short, long, default_value = "7d")]
        window: CostWindow,

        /// Include idle cost
        #[arg(long)]
        idle: bool,
    },

    /// Cost of the last N calendar months
    Monthly {
        #[arg(short, long, default_value_t = 1)]
        months: u32,
    },

    /// Daily cost history
    History {
        #[arg(short, long, default_value = "7d")]
        window: CostWindow,
    },

    /// Savings recommendations
    Savings {
        #[arg(short, long, default_value = "7d")]
        window: CostWindow,

        /// Recommend per pod instead of per namespace
        #[arg(long)]
        pods: bool,

        /// Restrict pod recommendations to one namespace
        #[arg(short, long, requires = "pods")]
        namespace: Option<String>,

        /// Maximum number of recommendations, 1 to 50 (defaults to analysis.savings_limit)
        #[arg(short, long, value_parser = RangedU64ValueParser::<usize>::new().range(1..=50))]
        limit: Option<usize>,
    },

    /// Resource efficiency scores
    Efficiency {
        #[arg(short, long, default_value = "7d")]
        window: CostWindow,
    },

    /// Idle cost breakdown
    Idle {
        #[arg(short, long, default_value = "7d")]
        window: CostWindow,
    },

    /// Optimization suggestions
    Report {
        #[arg(short, long, default_value = "7d")]
        window: CostWindow,
    },

    /// Probe OpenCost and report cache statistics
    Health,

    /// Keep an in-process cache warm until Ctrl-C (not shared with other subcommands)
    Run,

    /// Write the effective configuration to a file
    InitConfig {
        #[arg(default_value = "kubecent.toml")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        opencost_url: cli.opencost_url.clone(),
        cache_ttl_secs: cli.cache_ttl,
        log_level: cli.log_level.clone(),
    };

    let mut config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;
    bootstrap::init_logging(&config.logging);

    if let Command::InitConfig { path } = &cli.command {
        config.save(path)?;
        info!(path = %path, "Configuration written");
        return Ok(ExitCode::SUCCESS);
    }

    if let Command::Savings {
        limit: Some(limit), ..
    } = &cli.command
    {
        config.analysis.savings_limit = *limit;
    }

    let services = di::Services::new(&config)?;
    let use_cases = di::UseCases::new(&services, &config);

    match cli.command {
        Command::Run => {
            info!("Starting Kubecent v{}", env!("CARGO_PKG_VERSION"));
            commands::run(&config, &use_cases).await?;
            Ok(ExitCode::SUCCESS)
        }
        command => commands::query(command, &use_cases).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_pods_subcommand_parses_window_and_filter() {
        let cli = Cli::parse_from(["kubecent", "pods", "-n", "default", "-w", "30d", "--idle"]);
        match cli.command {
            Command::Pods {
                namespace,
                window,
                idle,
            } => {
                assert_eq!(namespace.as_deref(), Some("default"));
                assert_eq!(window.as_str(), "30d");
                assert!(idle);
            }
            _ => panic!("expected pods subcommand"),
        }
    }

    #[test]
    fn test_invalid_window_is_rejected_at_parse_time() {
        assert!(Cli::try_parse_from(["kubecent", "cluster", "--window", "soon"]).is_err());
    }

    #[test]
    fn test_global_overrides_after_subcommand() {
        let cli = Cli::parse_from([
            "kubecent",
            "namespaces",
            "--opencost-url",
            "http://localhost:9003",
            "--cache-ttl",
            "60",
        ]);
        assert_eq!(cli.opencost_url.as_deref(), Some("http://localhost:9003"));
        assert_eq!(cli.cache_ttl, Some(60));
    }

    #[test]
    fn test_savings_limit_bounded_at_parse_time() {
        for limit in ["0", "51"] {
            assert!(
                Cli::try_parse_from(["kubecent", "savings", "--limit", limit]).is_err(),
                "limit {} accepted",
                limit
            );
        }

        let cli = Cli::parse_from(["kubecent", "savings", "--limit", "10"]);
        match cli.command {
            Command::Savings { limit, .. } => assert_eq!(limit, Some(10)),
            _ => panic!("expected savings subcommand"),
        }
    }

    #[test]
    fn test_run_help_states_cache_is_in_process() {
        let command = Cli::command();
        let about = command
            .find_subcommand("run")
            .and_then(|run| run.get_about())
            .map(|about| about.to_string())
            .unwrap_or_default();
        assert!(about.contains("in-process"), "{}", about);
    }
}
