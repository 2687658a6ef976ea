pub mod server;

pub(crate) mod relay_endpoint;
