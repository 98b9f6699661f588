//! Wire-facing DTOs consumed by the (external) presentation layer.
//!
//! Monetary fields on these views carry decimal euros, converted from the
//! engine's integer cents exactly once at this boundary (see [`eur`]). The
//! engine itself never stores or compares floating-point values.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod eur {
    //! Conversion between decimal display euros and stored integer cents.
    //!
    //! The engine stores cents only; a decimal value exists exactly at the
    //! API request/response boundary.

    /// Converts a decimal euro amount to integer cents.
    ///
    /// The scaled value is rounded half away from zero, so `0.125` becomes
    /// 13 cents and `-0.125` becomes -13.
    #[must_use]
    pub fn euros_to_cents(euros: f64) -> i64 {
        (euros * 100.0).round() as i64
    }

    /// Converts integer cents to a decimal euro amount with two decimals.
    #[must_use]
    pub fn cents_to_euros(cents: i64) -> f64 {
        cents as f64 / 100.0
    }

}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub iban: String,
        /// Balance in euros.
        pub balance: f64,
        pub currency: String,
        pub status: String,
        pub created_at: DateTime<Utc>,
    }

    /// Account balance plus current-month totals.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub balance: f64,
        pub currency: String,
        pub month_income: f64,
        pub month_expenses: f64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: String,
        /// Amount in euros, always positive; direction is carried by `type`.
        pub amount: f64,
        pub currency: String,
        pub description: String,
        pub category: String,
        pub counterpart_name: Option<String>,
        pub counterpart_iban: Option<String>,
        pub status: String,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PaginationView {
        pub page: u64,
        pub limit: u64,
        pub total: u64,
        pub pages: u64,
    }

    impl PaginationView {
        #[must_use]
        pub fn new(page: u64, limit: u64, total: u64) -> Self {
            Self {
                page,
                limit,
                total,
                pages: total.div_ceil(limit.max(1)),
            }
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsPage {
        pub data: Vec<TransactionView>,
        pub pagination: PaginationView,
    }
}

pub mod savings {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_amount: f64,
        pub current_amount: f64,
        pub icon: String,
        pub color: String,
        pub deadline: Option<NaiveDate>,
        pub auto_save_amount: f64,
        pub auto_save_enabled: bool,
        /// Completion percentage with one decimal digit, computed server-side.
        pub progress: f64,
        pub created_at: DateTime<Utc>,
    }
}

pub mod stats {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub category: String,
        pub total: f64,
        pub count: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthView {
        /// Calendar month as `YYYY-MM`.
        pub month: String,
        pub income: f64,
        pub expenses: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct StatsView {
        pub by_category: Vec<CategoryTotalView>,
        pub monthly: Vec<MonthView>,
    }
}
