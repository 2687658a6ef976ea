use super::*;
use std::sync::Mutex;

// `RelayConfig::from_env` reads the process environment, so these tests
// take turns.
static CONFIG_ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn relay_attempt_budget_survives_an_oversized_override() {
    let _lock = CONFIG_ENV_LOCK.lock().expect("env lock");
    std::env::set_var("FAI_RELAY_ATTEMPTS", "4294967296");
    let config = RelayConfig::from_env();
    std::env::remove_var("FAI_RELAY_ATTEMPTS");
    assert_eq!(config.relay_attempts, u32::MAX);
}

#[test]
fn relay_attempt_budget_never_drops_below_one() {
    let _lock = CONFIG_ENV_LOCK.lock().expect("env lock");
    std::env::set_var("FAI_RELAY_ATTEMPTS", "0");
    let config = RelayConfig::from_env();
    std::env::remove_var("FAI_RELAY_ATTEMPTS");
    assert_eq!(config.relay_attempts, 1);
}
