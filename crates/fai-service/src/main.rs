use std::process::ExitCode;

fn main() -> ExitCode {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let addr = fai_service::resolve_bind_addr();
    match fai_service::start_server(&addr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("server failed on {addr}: {err}");
            ExitCode::FAILURE
        }
    }
}
