use reqwest::blocking::Client;
use std::sync::OnceLock;
use std::time::Duration;

static WEBHOOK_CLIENT: OnceLock<Client> = OnceLock::new();

/// Production webhook used when no override is configured.
const DEFAULT_WEBHOOK_URL: &str =
    "https://cloud.activepieces.com/api/v1/webhooks/PYolUaDZ0aNZ0KKEF1WFg/sync";

const DEFAULT_ENQUEUE_MAX_BODY_BYTES: usize = 500_000;
const DEFAULT_DIRECT_MAX_BODY_BYTES: usize = 200_000;
const DEFAULT_RELAY_ATTEMPTS: u32 = 3;
const DEFAULT_RELAY_ATTEMPT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_RELAY_BACKOFF_MS: u64 = 1_000;
const DEFAULT_DIRECT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 15;
const DEFAULT_RELAY_WORKERS: usize = 2;
const DEFAULT_RELAY_QUEUE_CAPACITY: usize = 64;

const ENV_HTTP_ADDR: &str = "FAI_HTTP_ADDR";
const ENV_WEBHOOK_URL: &str = "FAI_WEBHOOK_URL";
const ENV_WEBHOOK_SECRET: &str = "FAI_WEBHOOK_SECRET";
/// Older deployments exported the secret under the queue provider's name.
const ENV_WEBHOOK_SECRET_LEGACY: &str = "ACTIVEPIECES_SECRET";
const ENV_ENQUEUE_MAX_BODY_BYTES: &str = "FAI_ENQUEUE_MAX_BODY_BYTES";
const ENV_DIRECT_MAX_BODY_BYTES: &str = "FAI_DIRECT_MAX_BODY_BYTES";
const ENV_RELAY_ATTEMPTS: &str = "FAI_RELAY_ATTEMPTS";
const ENV_RELAY_ATTEMPT_TIMEOUT_SECS: &str = "FAI_RELAY_ATTEMPT_TIMEOUT_SECS";
const ENV_RELAY_BACKOFF_MS: &str = "FAI_RELAY_BACKOFF_MS";
const ENV_DIRECT_TIMEOUT_SECS: &str = "FAI_DIRECT_TIMEOUT_SECS";
const ENV_CONNECT_TIMEOUT_SECS: &str = "FAI_CONNECT_TIMEOUT_SECS";
const ENV_RELAY_WORKERS: &str = "FAI_RELAY_WORKERS";
const ENV_RELAY_QUEUE_CAPACITY: &str = "FAI_RELAY_QUEUE_CAPACITY";
pub(crate) const ENV_HTTP_WORKERS: &str = "FAI_HTTP_WORKERS";

/// Runtime knobs for both relay paths, resolved once at startup and handed
/// to the routes instead of read from the environment per request.
///
/// Deliberately no `Debug` impl: the struct carries the webhook secret and
/// must never end up in a log line wholesale.
pub(crate) struct RelayConfig {
    pub(crate) webhook_url: String,
    webhook_secret: String,
    pub(crate) enqueue_max_body_bytes: usize,
    pub(crate) direct_max_body_bytes: usize,
    pub(crate) relay_attempts: u32,
    pub(crate) relay_attempt_timeout: Duration,
    pub(crate) relay_backoff_step: Duration,
    pub(crate) direct_timeout: Duration,
    pub(crate) connect_timeout: Duration,
    pub(crate) relay_workers: usize,
    pub(crate) relay_queue_capacity: usize,
}

impl RelayConfig {
    pub(crate) fn from_env() -> Self {
        let webhook_secret = resolve_webhook_secret();
        if webhook_secret.is_empty() {
            log::warn!(
                "no webhook secret configured ({ENV_WEBHOOK_SECRET}); downstream will reject forwarded submissions"
            );
        }
        Self {
            webhook_url: resolve_webhook_url(),
            webhook_secret,
            enqueue_max_body_bytes: env_usize_or(
                ENV_ENQUEUE_MAX_BODY_BYTES,
                DEFAULT_ENQUEUE_MAX_BODY_BYTES,
            ),
            direct_max_body_bytes: env_usize_or(
                ENV_DIRECT_MAX_BODY_BYTES,
                DEFAULT_DIRECT_MAX_BODY_BYTES,
            ),
            relay_attempts: env_u64_or(ENV_RELAY_ATTEMPTS, u64::from(DEFAULT_RELAY_ATTEMPTS))
                .clamp(1, u64::from(u32::MAX)) as u32,
            relay_attempt_timeout: Duration::from_secs(env_u64_or(
                ENV_RELAY_ATTEMPT_TIMEOUT_SECS,
                DEFAULT_RELAY_ATTEMPT_TIMEOUT_SECS,
            )),
            relay_backoff_step: Duration::from_millis(env_u64_or(
                ENV_RELAY_BACKOFF_MS,
                DEFAULT_RELAY_BACKOFF_MS,
            )),
            direct_timeout: Duration::from_secs(env_u64_or(
                ENV_DIRECT_TIMEOUT_SECS,
                DEFAULT_DIRECT_TIMEOUT_SECS,
            )),
            connect_timeout: Duration::from_secs(env_u64_or(
                ENV_CONNECT_TIMEOUT_SECS,
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
            relay_workers: env_usize_or(ENV_RELAY_WORKERS, DEFAULT_RELAY_WORKERS).max(1),
            relay_queue_capacity: env_usize_or(
                ENV_RELAY_QUEUE_CAPACITY,
                DEFAULT_RELAY_QUEUE_CAPACITY,
            )
            .max(1),
        }
    }

    /// Read access to the secret for the outbound header. Kept behind an
    /// accessor so grepping for leaks stays a one-liner.
    pub(crate) fn webhook_secret(&self) -> &str {
        &self.webhook_secret
    }

    #[cfg(test)]
    pub(crate) fn with_webhook(url: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            webhook_url: url.into(),
            webhook_secret: secret.into(),
            enqueue_max_body_bytes: DEFAULT_ENQUEUE_MAX_BODY_BYTES,
            direct_max_body_bytes: DEFAULT_DIRECT_MAX_BODY_BYTES,
            relay_attempts: DEFAULT_RELAY_ATTEMPTS,
            relay_attempt_timeout: Duration::from_secs(DEFAULT_RELAY_ATTEMPT_TIMEOUT_SECS),
            relay_backoff_step: Duration::from_millis(DEFAULT_RELAY_BACKOFF_MS),
            direct_timeout: Duration::from_secs(DEFAULT_DIRECT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            relay_workers: DEFAULT_RELAY_WORKERS,
            relay_queue_capacity: DEFAULT_RELAY_QUEUE_CAPACITY,
        }
    }
}

pub(crate) fn resolve_bind_addr() -> String {
    std::env::var(ENV_HTTP_ADDR)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| crate::DEFAULT_ADDR.to_string())
}

fn resolve_webhook_url() -> String {
    let Some(raw) = std::env::var(ENV_WEBHOOK_URL)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
    else {
        return DEFAULT_WEBHOOK_URL.to_string();
    };
    match url::Url::parse(&raw) {
        Ok(_) => raw,
        Err(err) => {
            log::warn!("ignoring invalid {ENV_WEBHOOK_URL} ({err}); using the default webhook");
            DEFAULT_WEBHOOK_URL.to_string()
        }
    }
}

fn resolve_webhook_secret() -> String {
    for name in [ENV_WEBHOOK_SECRET, ENV_WEBHOOK_SECRET_LEGACY] {
        if let Some(value) = std::env::var(name)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
        {
            return value;
        }
    }
    String::new()
}

/// Shared blocking client for both relay paths. The total timeout stays off
/// on purpose; each call site sets its own per-request deadline.
pub(crate) fn webhook_client(config: &RelayConfig) -> &'static Client {
    let connect_timeout = config.connect_timeout;
    WEBHOOK_CLIENT.get_or_init(|| {
        Client::builder()
            .timeout(None::<Duration>)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(8)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .tcp_keepalive(Some(Duration::from_secs(30)))
            .build()
            .unwrap_or_else(|_| Client::new())
    })
}

pub(crate) fn env_u64_or(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_usize_or(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(default)
}
