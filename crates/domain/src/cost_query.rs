use crate::window::CostWindow;
use std::fmt;
use std::sync::Arc;

/// A cacheable cost query.
///
/// The cache key is derived from the query alone, so the request path and the
/// background refresher always agree on which entry a query lives in.
/// Keys follow `cost:<dimension>:<window>[:<filter>][:idle=<True|False>]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CostQuery {
    Cluster {
        window: CostWindow,
    },
    Namespaces {
        window: CostWindow,
        include_idle: bool,
    },
    Pods {
        window: CostWindow,
        namespace: Option<Arc<str>>,
        include_idle: bool,
    },
    Monthly {
        months: u32,
    },
    History {
        window: CostWindow,
    },
}

impl CostQuery {
    pub fn dimension(&self) -> &'static str {
        match self {
            Self::Cluster { .. } => "cluster",
            Self::Namespaces { .. } => "namespaces",
            Self::Pods { .. } => "pods",
            Self::Monthly { .. } => "monthly",
            Self::History { .. } => "history",
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            Self::Cluster { window } => format!("cost:cluster:{}", window),
            Self::Namespaces {
                window,
                include_idle,
            } => format!("cost:namespaces:{}:idle={}", window, idle_flag(*include_idle)),
            Self::Pods {
                window,
                namespace: Some(ns),
                include_idle,
            } => format!(
                "cost:pods:{}:{}:idle={}",
                window,
                ns,
                idle_flag(*include_idle)
            ),
            Self::Pods {
                window,
                namespace: None,
                include_idle,
            } => format!("cost:pods:{}:idle={}", window, idle_flag(*include_idle)),
            Self::Monthly { months } => format!("cost:monthly:{}m", months),
            Self::History { window } => format!("cost:history:{}", window),
        }
    }
}

fn idle_flag(include_idle: bool) -> &'static str {
    if include_idle {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for CostQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cache_key())
    }
}
