pub use categories::CategoryKind;
pub use error::EngineError;
pub use ops::{
    CategoryBreakdownRow, CategoryPatch, DEFAULT_LIST_LIMIT, DashboardSummary, Engine,
    EngineBuilder, ExpenseListFilter, ExpensePatch, MonthlyBucket,
};

pub mod categories;
mod error;
pub mod expenses;
mod ops;
pub mod users;

type ResultEngine<T> = Result<T, EngineError>;
