use serde_json::Value;
use std::time::Duration;

use super::runtime_config::RelayConfig;

/// What the webhook answered: HTTP status plus the decoded body.
pub(super) struct WebhookReply {
    pub(super) status: u16,
    pub(super) data: Value,
}

/// One outbound call, resolved. Transport failures keep enough shape for
/// the caller to tell a deadline from a refused connection.
pub(super) enum AttemptOutcome {
    Replied(WebhookReply),
    TransportError {
        timed_out: bool,
        name: String,
        message: String,
    },
}

/// Fire a single POST at the webhook with the given per-request deadline.
/// The deadline covers connect through body read, so a stalled response
/// stream cannot pin a worker past it.
pub(super) fn send_webhook_request(
    client: &reqwest::blocking::Client,
    config: &RelayConfig,
    body: &[u8],
    timeout: Duration,
) -> AttemptOutcome {
    let sent = client
        .post(&config.webhook_url)
        .timeout(timeout)
        .header("Content-Type", "application/json")
        .header("x-webhook-secret", config.webhook_secret())
        .body(body.to_vec())
        .send();

    let response = match sent {
        Ok(response) => response,
        Err(err) => return transport_outcome(&err),
    };

    let status = response.status().as_u16();
    match response.text() {
        Ok(text) => AttemptOutcome::Replied(WebhookReply {
            status,
            data: parse_reply_text(&text),
        }),
        Err(err) => transport_outcome(&err),
    }
}

/// The webhook usually answers JSON, but error pages and gateways in front
/// of it do not. An empty body is `null`; anything else that fails to parse
/// is carried along as a plain string.
pub(super) fn parse_reply_text(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn transport_outcome(err: &reqwest::Error) -> AttemptOutcome {
    AttemptOutcome::TransportError {
        timed_out: err.is_timeout(),
        name: transport_error_name(err).to_string(),
        message: err.to_string(),
    }
}

fn transport_error_name(err: &reqwest::Error) -> &'static str {
    if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_request() {
        "request"
    } else {
        "transport"
    }
}

pub(super) fn is_success_status(status: u16) -> bool {
    (200..300).contains(&status)
}
