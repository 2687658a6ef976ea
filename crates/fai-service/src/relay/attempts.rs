use serde_json::{json, Value};
use std::time::Duration;

use super::forward::{is_success_status, AttemptOutcome};

/// How hard the background path tries before giving up on a job.
pub(super) struct RelayPolicy {
    pub(super) max_attempts: u32,
    pub(super) backoff_step: Duration,
}

pub(super) enum RelayVerdict {
    Delivered {
        status: u16,
        data: Value,
        attempts: u32,
    },
    Exhausted {
        attempts: u32,
        last_failure: Value,
    },
}

/// Drive the attempt loop for one job. The outbound call and the pause
/// between attempts are both injected so tests can script failures and
/// count backoffs without a wire or a wall clock.
///
/// Backoff grows with the attempt number: after attempt n the loop sleeps
/// n × backoff_step, and never sleeps after the final attempt.
pub(super) fn run_attempts<T, S>(
    job_label: &str,
    policy: &RelayPolicy,
    mut send_attempt: T,
    mut sleep: S,
) -> RelayVerdict
where
    T: FnMut(u32) -> AttemptOutcome,
    S: FnMut(Duration),
{
    let mut last_failure = Value::Null;
    for attempt in 1..=policy.max_attempts {
        match send_attempt(attempt) {
            AttemptOutcome::Replied(reply) if is_success_status(reply.status) => {
                log::info!(
                    "{job_label}: delivered on attempt {attempt}/{} status={}",
                    policy.max_attempts,
                    reply.status
                );
                return RelayVerdict::Delivered {
                    status: reply.status,
                    data: reply.data,
                    attempts: attempt,
                };
            }
            AttemptOutcome::Replied(reply) => {
                log::warn!(
                    "{job_label}: webhook refused attempt {attempt}/{} status={}",
                    policy.max_attempts,
                    reply.status
                );
                last_failure = json!({ "status": reply.status, "data": reply.data });
            }
            AttemptOutcome::TransportError { name, message, .. } => {
                log::warn!(
                    "{job_label}: attempt {attempt}/{} failed in transport ({name})",
                    policy.max_attempts
                );
                last_failure = json!({ "name": name, "message": message });
            }
        }
        if attempt < policy.max_attempts {
            sleep(policy.backoff_step * attempt);
        }
    }
    RelayVerdict::Exhausted {
        attempts: policy.max_attempts,
        last_failure,
    }
}
