/// SQLite connection pool and schema migrations
pub mod connection;
/// Store error type
pub mod error;
/// Row types and their queries
pub mod models;
/// The conversation store used by the engine
pub mod store;

pub use connection::DatabaseManager;
pub use error::{StoreError, StoreResult};
pub use store::{Stats, Store};
