mod attempts;
mod direct;
mod dispatch;
mod forward;
mod local_validation;
mod metrics;
mod request_entry;
mod request_helpers;
mod runtime_config;
mod trace_log;

pub(crate) use dispatch::{spawn_relay_workers, RelayDispatcher};
pub(crate) use metrics::relay_metrics_prometheus;
pub(crate) use request_entry::{handle_direct_request, handle_enqueue_request};
pub(crate) use runtime_config::{env_usize_or, resolve_bind_addr, RelayConfig, ENV_HTTP_WORKERS};

#[cfg(test)]
mod relay_tests;
