use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

static TRACE_FILE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const ENV_TRACE_LOG_PATH: &str = "FAI_TRACE_LOG_PATH";

/// Tracing is opt-in. Without a configured path every log_* call below is a
/// cheap no-op, which keeps the hot path clean in normal deployments.
fn trace_file_path() -> Option<PathBuf> {
    std::env::var(ENV_TRACE_LOG_PATH)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

fn sanitize_text(value: &str) -> String {
    value.replace(['\r', '\n'], " ")
}

/// Submission bodies never land in the trace; lines carry this fingerprint
/// so repeated deliveries of the same payload can still be correlated.
fn short_fingerprint(value: &[u8]) -> String {
    let mut hash: u64 = 14695981039346656037;
    for byte in value {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(1099511628211);
    }
    format!("{hash:016x}")
}

fn now_ts() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn append_trace_line(line: &str) {
    let Some(file_path) = trace_file_path() else {
        return;
    };
    let lock = TRACE_FILE_LOCK.get_or_init(|| Mutex::new(()));
    let Ok(_guard) = lock.lock() else {
        return;
    };
    let mut file = match OpenOptions::new()
        .create(true)
        .append(true)
        .open(&file_path)
    {
        Ok(file) => file,
        Err(err) => {
            log::warn!(
                "relay trace open failed: path={}, err={}",
                file_path.display(),
                err
            );
            return;
        }
    };
    if let Err(err) = writeln!(file, "{line}") {
        log::warn!(
            "relay trace write failed: path={}, err={}",
            file_path.display(),
            err
        );
    }
}

pub(crate) fn log_job_start(job_id: u64, body: &[u8]) {
    let ts = now_ts();
    let line = format!(
        "ts={ts} event=JOB_START job_id={job_id} body_len={} body_fp={}",
        body.len(),
        short_fingerprint(body),
    );
    append_trace_line(&line);
}

pub(crate) fn log_attempt_result(
    job_id: u64,
    attempt: u32,
    max_attempts: u32,
    status_code: Option<u16>,
    error: Option<&str>,
) {
    let ts = now_ts();
    let status = status_code
        .map(|code| code.to_string())
        .unwrap_or_else(|| "-".to_string());
    let error = error.unwrap_or("-");
    let line = format!(
        "ts={ts} event=ATTEMPT_RESULT job_id={job_id} attempt={attempt}/{max_attempts} status={status} error={}",
        sanitize_text(error),
    );
    append_trace_line(&line);
}

pub(crate) fn log_job_final(job_id: u64, status_code: u16, attempts: u32, elapsed_ms: u64) {
    let ts = now_ts();
    let line = format!(
        "ts={ts} event=JOB_FINAL job_id={job_id} status={status_code} attempts={attempts} elapsed_ms={elapsed_ms}"
    );
    append_trace_line(&line);
}

pub(crate) fn log_direct_result(status_code: u16, body_len: usize, elapsed_ms: u64) {
    let ts = now_ts();
    let line = format!(
        "ts={ts} event=DIRECT_RESULT status={status_code} body_len={body_len} elapsed_ms={elapsed_ms}"
    );
    append_trace_line(&line);
}
