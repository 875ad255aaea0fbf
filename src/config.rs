use anyhow::{anyhow, Result};
use std::env;
use crate::utils::validation::validate_user_id;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:./bot_data/support_bot.db";
pub const DEFAULT_UPTIME_INTERVAL_SECS: u64 = 150;

#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_bot_token: String,
    /// The single identity that receives questions and writes answers.
    pub admin_id: i64,
    pub database_url: String,
    pub http_port: u16,
    /// Site pinged periodically to keep it awake. Pinging is off when unset.
    pub uptime_url: Option<String>,
    pub uptime_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;

        if token.trim().is_empty() {
            return Err(anyhow!("TELEGRAM_BOT_TOKEN must be set"));
        }

        let admin_id = Self::admin_id_from_env()?;

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let database_url = if database_url.trim().is_empty() {
            DEFAULT_DATABASE_URL.to_string()
        } else {
            database_url
        };

        let port_str = env::var("HTTP_PORT")
            .unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str.trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        let uptime_url = env::var("UPTIME_URL")
            .ok()
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        let uptime_interval_secs = match env::var("UPTIME_INTERVAL_SECS") {
            Ok(value) if !value.trim().is_empty() => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| anyhow!("Invalid UPTIME_INTERVAL_SECS"))?,
            _ => DEFAULT_UPTIME_INTERVAL_SECS,
        };

        Ok(Config {
            telegram_bot_token: token,
            admin_id,
            database_url,
            http_port,
            uptime_url,
            uptime_interval_secs,
        })
    }

    fn admin_id_from_env() -> Result<i64> {
        let raw = env::var("ADMIN_ID").map_err(|_| anyhow!("ADMIN_ID must be set"))?;
        let admin_id: i64 = raw
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid ADMIN_ID"))?;
        validate_user_id(admin_id).map_err(|e| anyhow!("Invalid ADMIN_ID: {}", e))?;
        Ok(admin_id)
    }
}
