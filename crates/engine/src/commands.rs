//! Command structs for engine operations.
//!
//! These types group parameters for write operations (transfer, credit,
//! debit, goal management), keeping call sites readable and avoiding long
//! argument lists.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{Category, TransactionKind};

/// Send money to an external IBAN.
#[derive(Clone, Debug)]
pub struct TransferCmd {
    pub user_id: String,
    /// Amount in cents, > 0.
    pub amount: i64,
    pub iban: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TransferCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        amount: i64,
        iban: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            iban: iban.into(),
            description: None,
            created_at,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Record an unfulfilled payment request.
///
/// The resulting ledger entry is `transfer_in`/`pending` and is never
/// settled by the core.
#[derive(Clone, Debug)]
pub struct RequestMoneyCmd {
    pub user_id: String,
    /// Amount in cents, > 0.
    pub amount: i64,
    pub email: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RequestMoneyCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        amount: i64,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            email: email.into(),
            description: None,
            created_at,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Credit the account with incoming funds (salary, refund, cashback).
#[derive(Clone, Debug)]
pub struct CreditCmd {
    pub user_id: String,
    /// Amount in cents, > 0.
    pub amount: i64,
    pub kind: TransactionKind,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub counterpart_name: Option<String>,
    pub counterpart_iban: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CreditCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            kind: TransactionKind::Credit,
            category: None,
            description: None,
            counterpart_name: None,
            counterpart_iban: None,
            created_at,
        }
    }

    /// Record this credit as a cashback reward instead of a plain credit.
    #[must_use]
    pub fn cashback(mut self) -> Self {
        self.kind = TransactionKind::Cashback;
        self
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn counterpart_name(mut self, name: impl Into<String>) -> Self {
        self.counterpart_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn counterpart_iban(mut self, iban: impl Into<String>) -> Self {
        self.counterpart_iban = Some(iban.into());
        self
    }
}

/// Debit the account for an outgoing payment.
#[derive(Clone, Debug)]
pub struct DebitCmd {
    pub user_id: String,
    /// Amount in cents, > 0.
    pub amount: i64,
    pub category: Option<Category>,
    pub description: Option<String>,
    pub counterpart_name: Option<String>,
    pub counterpart_iban: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl DebitCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, amount: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            amount,
            category: None,
            description: None,
            counterpart_name: None,
            counterpart_iban: None,
            created_at,
        }
    }

    #[must_use]
    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn counterpart_name(mut self, name: impl Into<String>) -> Self {
        self.counterpart_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn counterpart_iban(mut self, iban: impl Into<String>) -> Self {
        self.counterpart_iban = Some(iban.into());
        self
    }
}

/// Create a savings goal.
#[derive(Clone, Debug)]
pub struct CreateGoalCmd {
    pub user_id: String,
    pub name: String,
    /// Target amount in cents, > 0.
    pub target_amount: i64,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub auto_save_amount: Option<i64>,
    pub auto_save_enabled: Option<bool>,
    pub created_at: DateTime<Utc>,
}

impl CreateGoalCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        target_amount: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            target_amount,
            icon: None,
            color: None,
            deadline: None,
            auto_save_amount: None,
            auto_save_enabled: None,
            created_at,
        }
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn auto_save(mut self, amount: i64, enabled: bool) -> Self {
        self.auto_save_amount = Some(amount);
        self.auto_save_enabled = Some(enabled);
        self
    }
}

/// Partially update a savings goal.
///
/// Fields left as `None` keep their stored value; `current_amount` is never
/// touched by an update.
#[derive(Clone, Debug)]
pub struct UpdateGoalCmd {
    pub user_id: String,
    pub goal_id: Uuid,
    pub name: Option<String>,
    pub target_amount: Option<i64>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub auto_save_amount: Option<i64>,
    pub auto_save_enabled: Option<bool>,
}

impl UpdateGoalCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, goal_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            goal_id,
            name: None,
            target_amount: None,
            icon: None,
            color: None,
            deadline: None,
            auto_save_amount: None,
            auto_save_enabled: None,
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn target_amount(mut self, target_amount: i64) -> Self {
        self.target_amount = Some(target_amount);
        self
    }

    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn auto_save_amount(mut self, amount: i64) -> Self {
        self.auto_save_amount = Some(amount);
        self
    }

    #[must_use]
    pub fn auto_save_enabled(mut self, enabled: bool) -> Self {
        self.auto_save_enabled = Some(enabled);
        self
    }
}
