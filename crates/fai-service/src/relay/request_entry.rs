use serde_json::{json, Value};
use std::time::Instant;
use tiny_http::{Header, Request, Response};

use super::dispatch::{DispatchError, RelayDispatcher};
use super::local_validation::{
    read_request_body, require_post_method, validate_direct_body, validate_enqueue_body,
    LocalValidationError,
};
use super::runtime_config::RelayConfig;
use super::{direct, metrics, request_helpers, trace_log};

/// Fast-ack path: validate locally, hand the body to the worker pool, answer
/// 202 before any webhook traffic happens.
pub(crate) fn handle_enqueue_request(
    mut request: Request,
    config: &RelayConfig,
    dispatcher: &RelayDispatcher,
) {
    metrics::record_enqueue_request();
    if let Err(err) = require_post_method(request.method().as_str()) {
        metrics::record_enqueue_rejected();
        respond_validation_error(request, err);
        return;
    }
    let body = read_request_body(&mut request, config.enqueue_max_body_bytes);
    if let Err(err) = validate_enqueue_body(&body, config.enqueue_max_body_bytes) {
        metrics::record_enqueue_rejected();
        respond_validation_error(request, err);
        return;
    }
    if let Some(summary) = request_helpers::summarize_submission(&body) {
        log::info!("enqueue: {summary}");
    }
    match dispatcher.dispatch(body) {
        Ok(_) => {
            metrics::record_enqueue_accepted();
            respond_json(
                request,
                202,
                &json!({
                    "accepted": true,
                    "message": "Pedido aceito. Processamento em segundo plano.",
                }),
            );
        }
        Err(DispatchError::QueueFull) => {
            metrics::record_enqueue_rejected();
            log::warn!("enqueue: relay queue full, refusing submission");
            respond_json(
                request,
                503,
                &json!({ "error": "Serviço ocupado. Tente novamente." }),
            );
        }
        Err(DispatchError::Closed) => {
            metrics::record_enqueue_rejected();
            log::error!("enqueue: relay worker pool is gone");
            respond_json(request, 500, &json!({ "error": "Falha interna no serviço" }));
        }
    }
}

/// Synchronous path: same validation, then one webhook call whose status is
/// passed through to the caller.
pub(crate) fn handle_direct_request(mut request: Request, config: &RelayConfig) {
    let _guard = metrics::begin_direct_request();
    if let Err(err) = require_post_method(request.method().as_str()) {
        respond_validation_error(request, err);
        return;
    }
    let body = read_request_body(&mut request, config.direct_max_body_bytes);
    if let Err(err) = validate_direct_body(&body, config.direct_max_body_bytes) {
        respond_validation_error(request, err);
        return;
    }
    if let Some(summary) = request_helpers::summarize_submission(&body) {
        log::info!("direct: {summary}");
    }
    let started_at = Instant::now();
    let (status_code, payload) = direct::relay_once(config, &body);
    let elapsed_ms = metrics::duration_to_millis(started_at.elapsed());
    log::info!("direct: answered {status_code} in {elapsed_ms}ms");
    trace_log::log_direct_result(status_code, body.len(), elapsed_ms);
    respond_json(request, status_code, &payload);
}

pub(super) fn respond_json(request: Request, status_code: u16, body: &Value) {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());
    let mut response = Response::from_string(json).with_status_code(status_code);
    if let Ok(content_type) = Header::from_bytes(b"Content-Type", b"application/json") {
        response = response.with_header(content_type);
    }
    let _ = request.respond(response);
}

fn respond_validation_error(request: Request, err: LocalValidationError) {
    let json = serde_json::to_string(&json!({ "error": err.message }))
        .unwrap_or_else(|_| "{}".to_string());
    let mut response = Response::from_string(json).with_status_code(err.status_code);
    if let Ok(content_type) = Header::from_bytes(b"Content-Type", b"application/json") {
        response = response.with_header(content_type);
    }
    if err.status_code == 405 {
        if let Ok(allow) = Header::from_bytes(b"Allow", b"POST") {
            response = response.with_header(allow);
        }
    }
    let _ = request.respond(response);
}
