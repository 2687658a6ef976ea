pub(super) use super::attempts::{run_attempts, RelayPolicy, RelayVerdict};
pub(super) use super::direct::direct_response_for_outcome;
pub(super) use super::dispatch::{
    dispatcher_with_sender, report_for_verdict, run_relay_job, DispatchError, RelayJob,
};
pub(super) use super::forward::{is_success_status, parse_reply_text, AttemptOutcome, WebhookReply};
pub(super) use super::local_validation::{
    require_post_method, validate_direct_body, validate_enqueue_body,
};
pub(super) use super::metrics::{
    record_relay_job_started, relay_metrics_prometheus, relay_metrics_snapshot,
};
pub(super) use super::request_helpers::summarize_submission;
pub(super) use super::runtime_config::RelayConfig;
pub(super) use serde_json::{json, Value};
pub(super) use std::sync::mpsc;
pub(super) use std::time::Duration;

mod config_rules;
mod direct_rules;
mod queue_rules;
mod validation_rules;
