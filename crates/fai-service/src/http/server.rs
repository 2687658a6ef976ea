use std::io;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use tiny_http::{Request, Response, Server};

use crate::relay::{self, RelayConfig, RelayDispatcher};

const HTTP_WORKER_FACTOR: usize = 4;
const HTTP_WORKER_MIN: usize = 8;
const HTTP_QUEUE_FACTOR: usize = 4;
const HTTP_QUEUE_MIN: usize = 32;

/// Everything the request handlers need, wired once at startup.
pub(crate) struct ServerContext {
    pub(crate) config: Arc<RelayConfig>,
    pub(crate) dispatcher: RelayDispatcher,
}

fn http_worker_count() -> usize {
    let configured = relay::env_usize_or(relay::ENV_HTTP_WORKERS, 0);
    if configured > 0 {
        return configured;
    }
    // Direct-relay calls can hold a worker for the full downstream timeout;
    // a fixed pool keeps a burst of them from spawning without bound.
    let cpus = thread::available_parallelism()
        .map(|v| v.get())
        .unwrap_or(4);
    (cpus * HTTP_WORKER_FACTOR).max(HTTP_WORKER_MIN)
}

fn http_queue_size(worker_count: usize) -> usize {
    worker_count
        .saturating_mul(HTTP_QUEUE_FACTOR)
        .max(HTTP_QUEUE_MIN)
}

fn spawn_request_workers(
    worker_count: usize,
    rx: mpsc::Receiver<Request>,
    context: Arc<ServerContext>,
) {
    let shared_rx = Arc::new(Mutex::new(rx));
    for _ in 0..worker_count {
        let worker_rx = Arc::clone(&shared_rx);
        let worker_context = Arc::clone(&context);
        let _ = thread::spawn(move || loop {
            let request = {
                let Ok(guard) = worker_rx.lock() else {
                    break;
                };
                match guard.recv() {
                    Ok(request) => request,
                    Err(_) => break,
                }
            };
            route_request(request, &worker_context);
        });
    }
}

fn bind_server(addr: &str) -> io::Result<Server> {
    Server::http(addr).map_err(|err| io::Error::new(io::ErrorKind::Other, err))
}

pub fn start_http(addr: &str) -> io::Result<()> {
    let config = Arc::new(RelayConfig::from_env());
    let dispatcher = relay::spawn_relay_workers(Arc::clone(&config));
    let context = Arc::new(ServerContext { config, dispatcher });

    let server = bind_server(addr)?;
    let worker_count = http_worker_count();
    let queue_size = http_queue_size(worker_count);
    let (tx, rx) = mpsc::sync_channel::<Request>(queue_size);
    spawn_request_workers(worker_count, rx, context);
    log::info!("listening on {addr} with {worker_count} http worker(s)");

    for request in server.incoming_requests() {
        if crate::shutdown_requested() || request.url() == "/__shutdown" {
            let _ = request.respond(Response::from_string("shutdown"));
            break;
        }
        if tx.send(request).is_err() {
            break;
        }
    }
    Ok(())
}

pub(crate) fn route_request(request: Request, context: &ServerContext) {
    let path = request.url().to_string();
    if path == "/health" {
        let _ = request.respond(Response::from_string("ok"));
        return;
    }
    if request.method().as_str() == "GET" && path == "/metrics" {
        crate::http::relay_endpoint::handle_metrics(request);
        return;
    }
    if path == "/enqueue" {
        crate::http::relay_endpoint::handle_enqueue(request, context);
        return;
    }
    if path == "/enviar" {
        crate::http::relay_endpoint::handle_direct(request, context);
        return;
    }
    let _ = request.respond(Response::from_string("not found").with_status_code(404));
}
