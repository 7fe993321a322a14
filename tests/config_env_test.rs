//! `ClientConfig::from_env` tests.
//!
//! These mutate process environment variables, so they run serially.

use std::path::PathBuf;
use std::time::Duration;

use pointwatch::config::{
    ClientConfig, DEFAULT_API_URL, DEFAULT_SETTLE_DELAY, ENV_API_URL, ENV_COOKIE_PATH,
    ENV_ENVIRONMENT, ENV_SETTLE_DELAY_MS, ENV_TIMEOUT_SECS,
};
use serial_test::serial;

const ALL_VARS: [&str; 5] = [
    ENV_API_URL,
    ENV_ENVIRONMENT,
    ENV_SETTLE_DELAY_MS,
    ENV_TIMEOUT_SECS,
    ENV_COOKIE_PATH,
];

fn clear_env() {
    for var in ALL_VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_defaults_when_unset() {
    clear_env();

    let config = ClientConfig::from_env();

    assert_eq!(config, ClientConfig::default());
    assert_eq!(config.api_base_url, DEFAULT_API_URL);
    assert_eq!(config.settle_delay, DEFAULT_SETTLE_DELAY);
}

#[test]
#[serial]
fn test_from_env_reads_all_variables() {
    clear_env();
    std::env::set_var(ENV_API_URL, "https://api.example.com/");
    std::env::set_var(ENV_ENVIRONMENT, "staging");
    std::env::set_var(ENV_SETTLE_DELAY_MS, "120");
    std::env::set_var(ENV_TIMEOUT_SECS, "7");
    std::env::set_var(ENV_COOKIE_PATH, "/tmp/pointwatch-jar.json");

    let config = ClientConfig::from_env();
    clear_env();

    assert_eq!(config.api_base_url, "https://api.example.com");
    assert_eq!(config.environment, "staging");
    assert_eq!(config.settle_delay, Duration::from_millis(120));
    assert_eq!(config.request_timeout, Duration::from_secs(7));
    assert_eq!(
        config.cookie_path,
        Some(PathBuf::from("/tmp/pointwatch-jar.json"))
    );
}

#[test]
#[serial]
fn test_from_env_ignores_invalid_numbers() {
    clear_env();
    std::env::set_var(ENV_SETTLE_DELAY_MS, "soon");
    std::env::set_var(ENV_TIMEOUT_SECS, "-1");

    let config = ClientConfig::from_env();
    clear_env();

    assert_eq!(config.settle_delay, DEFAULT_SETTLE_DELAY);
    assert_eq!(config.request_timeout, ClientConfig::default().request_timeout);
}

#[test]
#[serial]
fn test_from_env_ignores_blank_url() {
    clear_env();
    std::env::set_var(ENV_API_URL, "   ");

    let config = ClientConfig::from_env();
    clear_env();

    assert_eq!(config.api_base_url, DEFAULT_API_URL);
}
