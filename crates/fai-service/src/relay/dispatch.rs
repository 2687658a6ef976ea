use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Instant;

use super::attempts::{run_attempts, RelayPolicy, RelayVerdict};
use super::forward::{send_webhook_request, AttemptOutcome};
use super::runtime_config::{webhook_client, RelayConfig};
use super::{metrics, trace_log};

static NEXT_JOB_ID: AtomicU64 = AtomicU64::new(1);

pub(crate) struct RelayJob {
    pub(crate) id: u64,
    pub(crate) body: Vec<u8>,
}

/// Terminal state of one background job, in HTTP terms. Nothing answers the
/// original caller anymore at this point; the report feeds logs and metrics.
pub(super) struct RelayReport {
    pub(super) status_code: u16,
    pub(super) body: Value,
    pub(super) attempts: u32,
}

#[derive(Debug)]
pub(crate) enum DispatchError {
    QueueFull,
    Closed,
}

/// Cloneable handle the HTTP side uses to hand bodies to the worker pool.
/// The channel is bounded, so a slow webhook surfaces as backpressure here
/// instead of unbounded memory growth.
#[derive(Clone)]
pub(crate) struct RelayDispatcher {
    sender: SyncSender<RelayJob>,
}

impl RelayDispatcher {
    pub(crate) fn dispatch(&self, body: Vec<u8>) -> Result<u64, DispatchError> {
        let job = RelayJob {
            id: NEXT_JOB_ID.fetch_add(1, Ordering::Relaxed),
            body,
        };
        let job_id = job.id;
        let body_snapshot_len = job.body.len();
        // Claim the depth slot before the send; once the job is in the
        // channel a worker may decrement at any moment.
        metrics::record_relay_job_offered();
        match self.sender.try_send(job) {
            Ok(()) => {
                metrics::record_relay_job_queued();
                log::info!("relay job {job_id}: queued ({body_snapshot_len} bytes)");
                Ok(job_id)
            }
            Err(TrySendError::Full(_)) => {
                metrics::record_relay_job_refused();
                Err(DispatchError::QueueFull)
            }
            Err(TrySendError::Disconnected(_)) => {
                metrics::record_relay_job_refused();
                Err(DispatchError::Closed)
            }
        }
    }
}

#[cfg(test)]
pub(super) fn dispatcher_with_sender(sender: SyncSender<RelayJob>) -> RelayDispatcher {
    RelayDispatcher { sender }
}

pub(crate) fn spawn_relay_workers(config: Arc<RelayConfig>) -> RelayDispatcher {
    let (tx, rx) = mpsc::sync_channel::<RelayJob>(config.relay_queue_capacity);
    let shared_rx = Arc::new(Mutex::new(rx));
    for _ in 0..config.relay_workers.max(1) {
        let worker_rx = Arc::clone(&shared_rx);
        let worker_config = Arc::clone(&config);
        let _ = thread::spawn(move || loop {
            let job = {
                let Ok(guard) = worker_rx.lock() else {
                    break;
                };
                match guard.recv() {
                    Ok(job) => job,
                    Err(_) => break,
                }
            };
            metrics::record_relay_job_started();
            trace_log::log_job_start(job.id, &job.body);
            let started_at = Instant::now();
            let report = run_relay_job(&job, &worker_config);
            let elapsed_ms = metrics::duration_to_millis(started_at.elapsed());
            metrics::record_relay_job_outcome(report.status_code == 200, elapsed_ms);
            trace_log::log_job_final(job.id, report.status_code, report.attempts, elapsed_ms);
            if report.status_code == 200 {
                log::info!(
                    "relay job {}: finished in {elapsed_ms}ms after {} attempt(s)",
                    job.id,
                    report.attempts
                );
            } else {
                log::warn!(
                    "relay job {}: gave up with status {} after {} attempt(s): {}",
                    job.id,
                    report.status_code,
                    report.attempts,
                    report.body
                );
            }
        });
    }
    RelayDispatcher { sender: tx }
}

/// Run one job to its terminal state: up to `relay_attempts` webhook calls
/// with a growing pause in between, each capped by the per-attempt deadline.
pub(super) fn run_relay_job(job: &RelayJob, config: &RelayConfig) -> RelayReport {
    if job.body.is_empty() {
        // Entry validation already refuses empty bodies; this keeps a
        // hand-crafted job from producing a confusing webhook call.
        return RelayReport {
            status_code: 400,
            body: json!({ "error": "Payload ausente" }),
            attempts: 0,
        };
    }
    let client = webhook_client(config);
    let policy = RelayPolicy {
        max_attempts: config.relay_attempts,
        backoff_step: config.relay_backoff_step,
    };
    let max_attempts = policy.max_attempts;
    let label = format!("relay job {}", job.id);
    let verdict = run_attempts(
        &label,
        &policy,
        |attempt| {
            metrics::record_relay_attempt();
            let outcome =
                send_webhook_request(client, config, &job.body, config.relay_attempt_timeout);
            match &outcome {
                AttemptOutcome::Replied(reply) => trace_log::log_attempt_result(
                    job.id,
                    attempt,
                    max_attempts,
                    Some(reply.status),
                    None,
                ),
                AttemptOutcome::TransportError { name, .. } => {
                    trace_log::log_attempt_result(job.id, attempt, max_attempts, None, Some(name))
                }
            }
            outcome
        },
        thread::sleep,
    );
    report_for_verdict(verdict)
}

pub(super) fn report_for_verdict(verdict: RelayVerdict) -> RelayReport {
    match verdict {
        RelayVerdict::Delivered {
            status,
            data,
            attempts,
        } => RelayReport {
            status_code: 200,
            body: json!({ "proxied": true, "status": status, "data": data }),
            attempts,
        },
        RelayVerdict::Exhausted {
            attempts,
            last_failure,
        } => RelayReport {
            status_code: 502,
            body: json!({
                "error": "Falha ao enviar para ActivePieces",
                "detail": last_failure,
            }),
            attempts,
        },
    }
}
