//! # Support Bot
//!
//! Telegram support bot for the "My Achievements" school portfolio project.
//!
//! ## Features
//! - Users compose a question, review it and send it to support
//! - The administrator answers from inline buttons; the answer is delivered to the user
//! - Every conversation step is persisted in SQLite and survives restarts
//! - Health endpoints and an uptime pinger for the portfolio site

/// Telegram commands, update handlers and effect delivery
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// The conversation state machine and dispatcher
pub mod conversation;
/// Database models, connections, and migrations
pub mod database;
/// Background services: health endpoints and uptime pinging
pub mod services;
/// Utility functions for formatting, validation, and logging
pub mod utils;
