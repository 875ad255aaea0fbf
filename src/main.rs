//! # Support Bot Main Entry Point
//!
//! Initializes logging, loads configuration, prepares the database, starts the
//! health server and the optional uptime pinger, and runs the Telegram bot
//! until Ctrl-C.

use anyhow::{Context, Result};
use std::time::Duration;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use support_bot::bot::handlers::BotHandler;
use support_bot::config::Config;
use support_bot::conversation::ConversationEngine;
use support_bot::database::{DatabaseManager, Store};
use support_bot::services::health::HealthService;
use support_bot::services::uptime::UptimeService;
use support_bot::utils::logging::log_system_event;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "support_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Support Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Admin: {}",
        config.database_url, config.http_port, config.admin_id
    );

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url)
        .await
        .context("Failed to open database")?;
    db_manager
        .run_migrations()
        .await
        .context("Failed to apply database schema")?;
    let store = Store::new(db_manager);
    info!("Database initialized successfully");

    // Initialize bot
    let bot = Bot::new(&config.telegram_bot_token);
    let engine = ConversationEngine::new(store.clone(), config.admin_id);
    let handler = BotHandler::new(engine);

    let mut dispatcher = Dispatcher::builder(bot, handler.schema())
        .default_handler(|upd| async move {
            tracing::debug!("Unhandled update: {:?}", upd.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .build();
    let shutdown_token = dispatcher.shutdown_token();

    // Optional uptime pinger
    let mut uptime_service = match &config.uptime_url {
        Some(url) => {
            let interval = Duration::from_secs(config.uptime_interval_secs);
            match UptimeService::new(url.clone(), interval).await {
                Ok(mut service) => match service.start().await {
                    Ok(()) => Some(service),
                    Err(e) => {
                        tracing::error!("Failed to start uptime service: {}", e);
                        None
                    }
                },
                Err(e) => {
                    tracing::error!("Failed to create uptime service: {}", e);
                    None
                }
            }
        }
        None => {
            info!("UPTIME_URL not set, uptime pinging disabled");
            None
        }
    };

    // Initialize health service
    let health_service = HealthService::new(store);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .with_context(|| format!("Failed to bind to port {}", config.http_port))?;
    info!("Health check server starting on port {}", config.http_port);

    let (stop_tx, mut stop_rx) = tokio::sync::watch::channel(false);
    let health_task = tokio::spawn(async move {
        let shutdown = async move {
            let _ = stop_rx.changed().await;
        };
        if let Err(e) = axum::serve(listener, health_service.router)
            .with_graceful_shutdown(shutdown)
            .await
        {
            tracing::error!("Health server error: {}", e);
        }
    });

    let mut bot_task = tokio::spawn(async move {
        dispatcher.dispatch().await;
    });
    log_system_event("Bot started", Some("long polling"));

    let bot_finished = tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
            }
            log_system_event("Shutdown requested", None);
            false
        }
        result = &mut bot_task => {
            if let Err(e) = result {
                tracing::error!("Bot task error: {}", e);
            }
            true
        }
    };

    if !bot_finished {
        match shutdown_token.shutdown() {
            Ok(done) => done.await,
            Err(e) => tracing::warn!("Dispatcher was not running: {}", e),
        }
        if let Err(e) = bot_task.await {
            tracing::error!("Bot task error: {}", e);
        }
    }

    let _ = stop_tx.send(true);
    if let Err(e) = health_task.await {
        tracing::error!("Health task error: {}", e);
    }

    if let Some(service) = uptime_service.as_mut() {
        if let Err(e) = service.stop().await {
            tracing::warn!("Error stopping uptime service: {}", e);
        }
    }

    log_system_event("Application stopped", None);
    Ok(())
}
