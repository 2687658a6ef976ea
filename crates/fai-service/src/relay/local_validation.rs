use std::io::Read;
use tiny_http::Request;

/// Rejection decided locally, before anything leaves for the webhook.
pub(super) struct LocalValidationError {
    pub(super) status_code: u16,
    pub(super) message: String,
}

impl LocalValidationError {
    pub(super) fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }
}

pub(super) fn require_post_method(method: &str) -> Result<(), LocalValidationError> {
    if method == "POST" {
        return Ok(());
    }
    Err(LocalValidationError::new(405, "Método não permitido"))
}

/// Drain the request body, but never buffer more than one byte past the
/// route's ceiling. The extra byte is what tells an at-the-limit body apart
/// from an oversized one.
pub(super) fn read_request_body(request: &mut Request, max_bytes: usize) -> Vec<u8> {
    let mut body = Vec::new();
    let cap = max_bytes.saturating_add(1) as u64;
    let _ = request.as_reader().take(cap).read_to_end(&mut body);
    body
}

pub(super) fn validate_enqueue_body(
    body: &[u8],
    max_bytes: usize,
) -> Result<(), LocalValidationError> {
    if body.is_empty() {
        return Err(LocalValidationError::new(400, "Payload ausente"));
    }
    if body.len() > max_bytes {
        return Err(LocalValidationError::new(413, "Payload muito grande"));
    }
    Ok(())
}

pub(super) fn validate_direct_body(
    body: &[u8],
    max_bytes: usize,
) -> Result<(), LocalValidationError> {
    if body.is_empty() || body.len() > max_bytes {
        return Err(LocalValidationError::new(
            400,
            "Payload inválido ou muito grande",
        ));
    }
    Ok(())
}
