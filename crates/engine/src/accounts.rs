//! The module contains the `Account` type and its persistence model.
//!
//! Every user owns exactly one account. The balance is an `i64` number of
//! cents and is never written outside a logged ledger operation.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError};

/// Lifecycle status of an account.
///
/// Transitions are driven outside the core; the engine only refuses to move
/// money when the account is not `Active`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    #[default]
    Active,
    Frozen,
    Closed,
}

impl AccountStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Frozen => "frozen",
            Self::Closed => "closed",
        }
    }
}

impl TryFrom<&str> for AccountStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "frozen" => Ok(Self::Frozen),
            "closed" => Ok(Self::Closed),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid account status: {other}"
            ))),
        }
    }
}

/// A user's current account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier, a UUID generated once and persisted.
    pub id: Uuid,
    pub user_id: String,
    /// IBAN-style identifier, unique across accounts.
    pub iban: String,
    /// Balance in cents; never negative.
    pub balance: i64,
    pub currency: Currency,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(user_id: String, iban: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            iban,
            balance: 0,
            currency: Currency::default(),
            status: AccountStatus::Active,
            created_at,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub iban: String,
    pub balance: i64,
    pub currency: String,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            user_id: ActiveValue::Set(account.user_id.clone()),
            iban: ActiveValue::Set(account.iban.clone()),
            balance: ActiveValue::Set(account.balance),
            currency: ActiveValue::Set(account.currency.code().to_string()),
            status: ActiveValue::Set(account.status.as_str().to_string()),
            created_at: ActiveValue::Set(account.created_at),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("account not exists".to_string()))?,
            user_id: model.user_id,
            iban: model.iban,
            balance: model.balance,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            status: AccountStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}
