use support_bot::config::{Config, DEFAULT_DATABASE_URL, DEFAULT_UPTIME_INTERVAL_SECS};
use std::env;
use std::sync::Mutex;

// Mutex to ensure config tests run sequentially to avoid environment variable conflicts
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const VARS: [&str; 6] = [
    "TELEGRAM_BOT_TOKEN",
    "ADMIN_ID",
    "DATABASE_URL",
    "HTTP_PORT",
    "UPTIME_URL",
    "UPTIME_INTERVAL_SECS",
];

fn reset_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    reset_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("ADMIN_ID", "5780499255");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("UPTIME_URL", "https://example.org/");
    env::set_var("UPTIME_INTERVAL_SECS", "60");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.admin_id, 5780499255);
    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.uptime_url.as_deref(), Some("https://example.org/"));
    assert_eq!(config.uptime_interval_secs, 60);

    reset_env();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    reset_env();

    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");
    env::set_var("ADMIN_ID", "42");

    let config = Config::from_env().unwrap();

    assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.uptime_url, None);
    assert_eq!(config.uptime_interval_secs, DEFAULT_UPTIME_INTERVAL_SECS);

    reset_env();
}

#[test]
fn test_config_missing_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    reset_env();
    env::set_var("ADMIN_ID", "42");

    let result = Config::from_env();
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("TELEGRAM_BOT_TOKEN must be set"));

    reset_env();
}

#[test]
fn test_config_missing_or_invalid_admin_id() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    reset_env();
    env::set_var("TELEGRAM_BOT_TOKEN", "token");

    let result = Config::from_env();
    assert!(result.unwrap_err().to_string().contains("ADMIN_ID must be set"));

    env::set_var("ADMIN_ID", "not-a-number");
    let result = Config::from_env();
    assert!(result.unwrap_err().to_string().contains("Invalid ADMIN_ID"));

    env::set_var("ADMIN_ID", "-5");
    assert!(Config::from_env().is_err());

    reset_env();
}

#[test]
fn test_config_invalid_numbers() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    reset_env();
    env::set_var("TELEGRAM_BOT_TOKEN", "token");
    env::set_var("ADMIN_ID", "42");

    env::set_var("HTTP_PORT", "invalid_port");
    assert!(Config::from_env().unwrap_err().to_string().contains("Invalid HTTP_PORT"));
    env::remove_var("HTTP_PORT");

    env::set_var("UPTIME_INTERVAL_SECS", "0");
    assert!(Config::from_env()
        .unwrap_err()
        .to_string()
        .contains("Invalid UPTIME_INTERVAL_SECS"));

    reset_env();
}

#[test]
fn test_blank_uptime_url_disables_pinging() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    reset_env();
    env::set_var("TELEGRAM_BOT_TOKEN", "token");
    env::set_var("ADMIN_ID", "42");
    env::set_var("UPTIME_URL", "   ");

    assert_eq!(Config::from_env().unwrap().uptime_url, None);

    reset_env();
}
