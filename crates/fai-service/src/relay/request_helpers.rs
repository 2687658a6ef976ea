use fai_core::Submission;
use sha2::{Digest, Sha256};

/// Best-effort one-line digest of an incoming submission for the info log.
/// Bodies are forwarded opaquely, so anything that does not parse as a
/// submission simply logs nothing. Free-text fields stay out of the logs;
/// the student only ever appears as a short fingerprint.
pub(crate) fn summarize_submission(body: &[u8]) -> Option<String> {
    let submission = serde_json::from_slice::<Submission>(body).ok()?;
    let aluno_fp = short_fingerprint(submission.meta.aluno.trim());
    Some(format!(
        "aluno_fp={aluno_fp} grau={} pct={:.2} all_answered={} responses={}",
        submission.summary.grau.as_str(),
        submission.summary.percentage,
        submission.summary.all_answered,
        submission.responses.len(),
    ))
}

pub(crate) fn short_fingerprint(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    digest[..8]
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>()
}
