//! Ledger entry primitives.
//!
//! A `Transaction` is an immutable record of one balance-affecting event.
//! Amounts are always positive; the direction is carried by the kind, never
//! by the sign.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Credit,
    Debit,
    TransferIn,
    TransferOut,
    Cashback,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
            Self::TransferIn => "transfer_in",
            Self::TransferOut => "transfer_out",
            Self::Cashback => "cashback",
        }
    }

    /// Kinds that increase the account balance when settled.
    pub const INCOME: [TransactionKind; 3] = [Self::Credit, Self::TransferIn, Self::Cashback];

    /// Kinds that decrease the account balance when settled.
    pub const EXPENSE: [TransactionKind; 2] = [Self::Debit, Self::TransferOut];

    #[must_use]
    pub fn is_income(self) -> bool {
        Self::INCOME.contains(&self)
    }

    #[must_use]
    pub fn is_expense(self) -> bool {
        Self::EXPENSE.contains(&self)
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "credit" => Ok(Self::Credit),
            "debit" => Ok(Self::Debit),
            "transfer_in" => Ok(Self::TransferIn),
            "transfer_out" => Ok(Self::TransferOut),
            "cashback" => Ok(Self::Cashback),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Spending category attached to a ledger entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Shopping,
    Entertainment,
    Salary,
    Transfer,
    Subscription,
    #[default]
    Other,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Food => "food",
            Self::Transport => "transport",
            Self::Shopping => "shopping",
            Self::Entertainment => "entertainment",
            Self::Salary => "salary",
            Self::Transfer => "transfer",
            Self::Subscription => "subscription",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "food" => Ok(Self::Food),
            "transport" => Ok(Self::Transport),
            "shopping" => Ok(Self::Shopping),
            "entertainment" => Ok(Self::Entertainment),
            "salary" => Ok(Self::Salary),
            "transfer" => Ok(Self::Transfer),
            "subscription" => Ok(Self::Subscription),
            "other" => Ok(Self::Other),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid category: {other}"
            ))),
        }
    }
}

/// Settlement status of a ledger entry.
///
/// `Pending` exists only for unfulfilled payment requests; nothing in the
/// core ever settles a pending entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    #[default]
    Completed,
    Pending,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Pending => "pending",
        }
    }
}

impl TryFrom<&str> for TransactionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid transaction status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub kind: TransactionKind,
    /// Amount in cents, always > 0.
    pub amount: i64,
    pub currency: Currency,
    pub description: String,
    pub category: Category,
    pub counterpart_name: Option<String>,
    pub counterpart_iban: Option<String>,
    pub status: TransactionStatus,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        account_id: Uuid,
        kind: TransactionKind,
        amount: i64,
        description: String,
        category: Category,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            account_id,
            kind,
            amount,
            currency: Currency::default(),
            description,
            category,
            counterpart_name: None,
            counterpart_iban: None,
            status: TransactionStatus::Completed,
            created_at,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub account_id: String,
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub amount: i64,
    pub currency: String,
    pub description: String,
    pub category: String,
    pub counterpart_name: Option<String>,
    pub counterpart_iban: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Accounts,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            account_id: ActiveValue::Set(tx.account_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount: ActiveValue::Set(tx.amount),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            description: ActiveValue::Set(tx.description.clone()),
            category: ActiveValue::Set(tx.category.as_str().to_string()),
            counterpart_name: ActiveValue::Set(tx.counterpart_name.clone()),
            counterpart_iban: ActiveValue::Set(tx.counterpart_iban.clone()),
            status: ActiveValue::Set(tx.status.as_str().to_string()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("transaction not exists".to_string()))?,
            account_id: Uuid::parse_str(&model.account_id)
                .map_err(|_| EngineError::NotFound("account not exists".to_string()))?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: model.amount,
            currency: Currency::try_from(model.currency.as_str()).unwrap_or_default(),
            description: model.description,
            category: Category::try_from(model.category.as_str()).unwrap_or_default(),
            counterpart_name: model.counterpart_name,
            counterpart_iban: model.counterpart_iban,
            status: TransactionStatus::try_from(model.status.as_str())?,
            created_at: model.created_at,
        })
    }
}
