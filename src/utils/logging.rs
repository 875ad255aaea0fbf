use tracing::{debug, error, info, warn};

/// Logs an inbound event with consistent format
pub fn log_event(kind: &str, user: &str, user_id: i64, details: Option<&str>) {
    match details {
        Some(d) => info!("EVENT: {} from {}({}) - {}", kind, user, user_id, d),
        None => info!("EVENT: {} from {}({})", kind, user, user_id),
    }
}

/// Logs a conversation state change with consistent format
pub fn log_transition(user_id: i64, to: Option<&str>) {
    info!("TRANSITION: user {} -> {}", user_id, to.unwrap_or("idle"));
}

/// Logs a rejected action (stale button, missing question) with consistent format
pub fn log_rejected_action(action: &str, user_id: i64, reason: &str) {
    warn!("REJECTED: {} by {} - {}", action, user_id, reason);
}

/// Logs handler failures caught at the dispatcher boundary
pub fn log_handler_error(kind: &str, user_id: i64, error: &str) {
    error!("HANDLER_ERROR: {} for {} - {}", kind, user_id, error);
}

/// Logs database operations with consistent format
pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    match details {
        Some(d) => debug!("DB_OP: {} on {} - {}", operation, table, d),
        None => debug!("DB_OP: {} on {}", operation, table),
    }
}

/// Logs outbound delivery failures with consistent format
pub fn log_delivery_error(target: i64, error: &str) {
    error!("DELIVERY_ERROR: message to {} failed - {}", target, error);
}

/// Logs system events with consistent format
pub fn log_system_event(event: &str, details: Option<&str>) {
    match details {
        Some(d) => info!("SYSTEM: {} - {}", event, d),
        None => info!("SYSTEM: {}", event),
    }
}
