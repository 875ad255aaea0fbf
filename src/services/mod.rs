/// HTTP health endpoints
pub mod health;
/// Periodic uptime pinging of the portfolio site
pub mod uptime;
