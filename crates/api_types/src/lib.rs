use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub mod user {
    use super::*;

    /// Registration payload.
    ///
    /// The password travels only in this direction; responses never carry it.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub email: String,
        pub first_name: String,
        pub last_name: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub email: String,
        pub first_name: String,
        pub last_name: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod auth {
    use super::*;

    /// Login form (form-encoded, OAuth2 password-flow field names).
    ///
    /// `username` carries the email.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TokenResponse {
        pub access_token: String,
        /// Always `"bearer"`.
        pub token_type: String,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        /// `"income"` or `"expense"`.
        #[serde(rename = "type")]
        pub kind: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        #[serde(rename = "type")]
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i32,
        pub user_id: i32,
        pub name: String,
        #[serde(rename = "type")]
        pub kind: String,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub category_id: i32,
        pub amount: f64,
        pub description: String,
        pub date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub category_id: Option<i32>,
        pub amount: Option<f64>,
        pub description: Option<String>,
        pub date: Option<NaiveDate>,
    }

    /// Query string for the expense list endpoint.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        pub skip: Option<u64>,
        /// 1..=100, defaults to 100.
        pub limit: Option<u64>,
        pub category_id: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: i32,
        pub user_id: i32,
        pub category_id: i32,
        pub amount: f64,
        pub description: String,
        pub date: NaiveDate,
        pub created_at: DateTime<Utc>,
    }
}

pub mod analytics {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardSummary {
        pub total_income: f64,
        pub total_expenses: f64,
        pub net_balance: f64,
        pub top_expense_category: Option<String>,
        pub top_income_category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryBreakdownRow {
        pub category_id: i32,
        pub category_name: String,
        #[serde(rename = "category_type")]
        pub category_kind: String,
        pub total_amount: f64,
        pub transaction_count: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MonthlyQuery {
        /// 1..=12, defaults to 6.
        pub months: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummary {
        /// `"YYYY-MM"`.
        pub month: String,
        pub total_income: f64,
        pub total_expenses: f64,
        pub net_balance: f64,
    }
}
