use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod analytics;
mod categories;
mod expenses;
mod users;

pub use analytics::{CategoryBreakdownRow, DashboardSummary, MonthlyBucket};
pub use categories::CategoryPatch;
pub use expenses::{DEFAULT_LIST_LIMIT, ExpenseListFilter, ExpensePatch};

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
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_email(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(EngineError::InvalidName(
            "invalid email address".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
