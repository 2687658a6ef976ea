use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

static ENQUEUE_TOTAL_REQUESTS: AtomicUsize = AtomicUsize::new(0);
static ENQUEUE_ACCEPTED: AtomicUsize = AtomicUsize::new(0);
static ENQUEUE_REJECTED: AtomicUsize = AtomicUsize::new(0);
static RELAY_JOBS_TOTAL: AtomicUsize = AtomicUsize::new(0);
static RELAY_QUEUE_DEPTH: AtomicUsize = AtomicUsize::new(0);
static RELAY_ATTEMPTS_TOTAL: AtomicUsize = AtomicUsize::new(0);
static RELAY_DELIVERED_TOTAL: AtomicUsize = AtomicUsize::new(0);
static RELAY_EXHAUSTED_TOTAL: AtomicUsize = AtomicUsize::new(0);
static RELAY_JOB_DURATION_MS_TOTAL: AtomicU64 = AtomicU64::new(0);
static DIRECT_TOTAL_REQUESTS: AtomicUsize = AtomicUsize::new(0);
static DIRECT_ACTIVE_REQUESTS: AtomicUsize = AtomicUsize::new(0);
static DIRECT_GATEWAY_FAILURES: AtomicUsize = AtomicUsize::new(0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RelayMetricsSnapshot {
    pub enqueue_total_requests: usize,
    pub enqueue_accepted: usize,
    pub enqueue_rejected: usize,
    pub relay_jobs_total: usize,
    pub relay_queue_depth: usize,
    pub relay_attempts_total: usize,
    pub relay_delivered_total: usize,
    pub relay_exhausted_total: usize,
    pub relay_job_duration_ms_total: u64,
    pub direct_total_requests: usize,
    pub direct_active_requests: usize,
    pub direct_gateway_failures: usize,
}

/// Keeps the direct-path active gauge honest across early returns.
pub(crate) struct DirectRequestGuard;

impl Drop for DirectRequestGuard {
    fn drop(&mut self) {
        DIRECT_ACTIVE_REQUESTS.fetch_sub(1, Ordering::Relaxed);
    }
}

pub(crate) fn begin_direct_request() -> DirectRequestGuard {
    DIRECT_TOTAL_REQUESTS.fetch_add(1, Ordering::Relaxed);
    DIRECT_ACTIVE_REQUESTS.fetch_add(1, Ordering::Relaxed);
    DirectRequestGuard
}

pub(crate) fn record_enqueue_request() {
    ENQUEUE_TOTAL_REQUESTS.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_enqueue_accepted() {
    ENQUEUE_ACCEPTED.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_enqueue_rejected() {
    ENQUEUE_REJECTED.fetch_add(1, Ordering::Relaxed);
}

/// Depth rises when a job is offered to the channel, not when the channel
/// accepts it. The worker's decrement is ordered after its `recv`, so a
/// claimed slot always precedes it and the gauge cannot underflow.
pub(crate) fn record_relay_job_offered() {
    RELAY_QUEUE_DEPTH.fetch_add(1, Ordering::Relaxed);
}

/// The channel refused the offered job; its depth slot goes back.
pub(crate) fn record_relay_job_refused() {
    RELAY_QUEUE_DEPTH.fetch_sub(1, Ordering::Relaxed);
}

pub(crate) fn record_relay_job_queued() {
    RELAY_JOBS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_relay_job_started() {
    RELAY_QUEUE_DEPTH.fetch_sub(1, Ordering::Relaxed);
}

pub(crate) fn record_relay_attempt() {
    RELAY_ATTEMPTS_TOTAL.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn record_relay_job_outcome(delivered: bool, duration_ms: u64) {
    if delivered {
        RELAY_DELIVERED_TOTAL.fetch_add(1, Ordering::Relaxed);
    } else {
        RELAY_EXHAUSTED_TOTAL.fetch_add(1, Ordering::Relaxed);
    }
    RELAY_JOB_DURATION_MS_TOTAL.fetch_add(duration_ms, Ordering::Relaxed);
}

pub(crate) fn record_direct_gateway_failure() {
    DIRECT_GATEWAY_FAILURES.fetch_add(1, Ordering::Relaxed);
}

pub(crate) fn duration_to_millis(duration: Duration) -> u64 {
    duration.as_millis().min(u128::from(u64::MAX)) as u64
}

pub(crate) fn relay_metrics_snapshot() -> RelayMetricsSnapshot {
    RelayMetricsSnapshot {
        enqueue_total_requests: ENQUEUE_TOTAL_REQUESTS.load(Ordering::Relaxed),
        enqueue_accepted: ENQUEUE_ACCEPTED.load(Ordering::Relaxed),
        enqueue_rejected: ENQUEUE_REJECTED.load(Ordering::Relaxed),
        relay_jobs_total: RELAY_JOBS_TOTAL.load(Ordering::Relaxed),
        relay_queue_depth: RELAY_QUEUE_DEPTH.load(Ordering::Relaxed),
        relay_attempts_total: RELAY_ATTEMPTS_TOTAL.load(Ordering::Relaxed),
        relay_delivered_total: RELAY_DELIVERED_TOTAL.load(Ordering::Relaxed),
        relay_exhausted_total: RELAY_EXHAUSTED_TOTAL.load(Ordering::Relaxed),
        relay_job_duration_ms_total: RELAY_JOB_DURATION_MS_TOTAL.load(Ordering::Relaxed),
        direct_total_requests: DIRECT_TOTAL_REQUESTS.load(Ordering::Relaxed),
        direct_active_requests: DIRECT_ACTIVE_REQUESTS.load(Ordering::Relaxed),
        direct_gateway_failures: DIRECT_GATEWAY_FAILURES.load(Ordering::Relaxed),
    }
}

pub(crate) fn relay_metrics_prometheus() -> String {
    let m = relay_metrics_snapshot();
    format!(
        "fai_enqueue_requests_total {}\n\
fai_enqueue_accepted_total {}\n\
fai_enqueue_rejected_total {}\n\
fai_relay_jobs_total {}\n\
fai_relay_queue_depth {}\n\
fai_relay_attempts_total {}\n\
fai_relay_delivered_total {}\n\
fai_relay_exhausted_total {}\n\
fai_relay_job_duration_milliseconds_total {}\n\
fai_relay_job_duration_milliseconds_count {}\n\
fai_direct_requests_total {}\n\
fai_direct_requests_active {}\n\
fai_direct_gateway_failures_total {}\n",
        m.enqueue_total_requests,
        m.enqueue_accepted,
        m.enqueue_rejected,
        m.relay_jobs_total,
        m.relay_queue_depth,
        m.relay_attempts_total,
        m.relay_delivered_total,
        m.relay_exhausted_total,
        m.relay_job_duration_ms_total,
        m.relay_delivered_total + m.relay_exhausted_total,
        m.direct_total_requests,
        m.direct_active_requests,
        m.direct_gateway_failures,
    )
}
