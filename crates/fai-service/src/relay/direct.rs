use serde_json::{json, Value};

use super::forward::{is_success_status, send_webhook_request, AttemptOutcome};
use super::metrics;
use super::runtime_config::{webhook_client, RelayConfig};

/// Synchronous path: one webhook call under the direct-route deadline, no
/// retries. The caller gets the downstream status passed through verbatim.
pub(super) fn relay_once(config: &RelayConfig, body: &[u8]) -> (u16, Value) {
    let client = webhook_client(config);
    let outcome = send_webhook_request(client, config, body, config.direct_timeout);
    if let AttemptOutcome::TransportError { name, message, .. } = &outcome {
        metrics::record_direct_gateway_failure();
        log::warn!("direct relay transport failure ({name}): {message}");
    }
    direct_response_for_outcome(outcome)
}

/// Timeouts and transport failures both map to 504 here; the message is
/// what tells an elapsed deadline apart from a broken connection.
pub(super) fn direct_response_for_outcome(outcome: AttemptOutcome) -> (u16, Value) {
    match outcome {
        AttemptOutcome::Replied(reply) => (
            reply.status,
            json!({
                "ok": is_success_status(reply.status),
                "status": reply.status,
                "data": reply.data,
            }),
        ),
        AttemptOutcome::TransportError { timed_out: true, .. } => {
            (504, json!({ "error": "Timeout ao contatar o serviço" }))
        }
        AttemptOutcome::TransportError { message, .. } => {
            (504, json!({ "error": format!("Falha ao processar: {message}") }))
        }
    }
}
