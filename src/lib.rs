pub mod auth;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod constants;
pub mod dashboard;
pub mod database;
pub mod debts;
pub mod error;
pub mod filters;
pub mod models;
pub mod month;
pub mod routes;
pub mod statistics;
pub mod store;
pub mod transaction;
pub mod utils;
pub mod validation;

use std::sync::Arc;

// Re-export types at crate root for convenient importing
pub use crate::clock::Clock;
pub use crate::database::Db;
pub use crate::error::AppError;
pub use crate::transaction::{TransactionError, with_transaction};

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Users and their debts
    pub db: Db,
    /// Decides which day is "today" for classification and statistics
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn today(&self) -> time::Date {
        self.clock.today()
    }
}
