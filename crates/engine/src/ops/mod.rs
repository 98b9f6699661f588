use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    EngineError, ResultEngine,
    notify::{LogSink, NotificationSink},
};

mod access;
mod accounts;
mod history;
mod ledger;
mod savings;
mod statistics;
mod transfers;

pub use history::{MAX_PAGE_SIZE, TransactionFilter};
pub use statistics::{CategoryTotal, MonthTotals, MonthlySummary};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    notifications: Arc<dyn NotificationSink>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn require_positive_amount(amount: i64) -> ResultEngine<()> {
    if amount <= 0 {
        return Err(EngineError::InvalidAmount(
            "amount must be > 0".to_string(),
        ));
    }
    Ok(())
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional free-text field, falling back to a default label.
fn normalize_description(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => text.to_string(),
        None => default.to_string(),
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    notifications: Option<Arc<dyn NotificationSink>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass a notification sink (defaults to [`LogSink`]).
    pub fn notifications(mut self, sink: Arc<dyn NotificationSink>) -> EngineBuilder {
        self.notifications = Some(sink);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            notifications: self
                .notifications
                .unwrap_or_else(|| Arc::new(LogSink)),
        })
    }
}
