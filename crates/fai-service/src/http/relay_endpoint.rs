use tiny_http::{Header, Request, Response};

use super::server::ServerContext;

pub(crate) fn handle_enqueue(request: Request, context: &ServerContext) {
    crate::relay::handle_enqueue_request(request, &context.config, &context.dispatcher);
}

pub(crate) fn handle_direct(request: Request, context: &ServerContext) {
    crate::relay::handle_direct_request(request, &context.config);
}

pub(crate) fn handle_metrics(request: Request) {
    let body = crate::relay::relay_metrics_prometheus();
    let mut response = Response::from_string(body);
    if let Ok(content_type) = Header::from_bytes(b"Content-Type", b"text/plain; version=0.0.4") {
        response = response.with_header(content_type);
    }
    let _ = request.respond(response);
}
