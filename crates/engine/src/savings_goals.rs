//! The module contains the `SavingsGoal` type and its persistence model.
//!
//! A goal is a named sub-ledger holding funds earmarked for a target. Its
//! `current_amount` and the owning account balance are disjoint pools: a
//! cent is either in the account or in a goal, never both.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

pub(crate) const DEFAULT_ICON: &str = "target";
pub(crate) const DEFAULT_COLOR: &str = "#34F288";

/// A savings goal owned by a user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    /// Target amount in cents, always > 0.
    pub target_amount: i64,
    /// Accrued amount in cents; never negative, may exceed the target.
    pub current_amount: i64,
    pub icon: String,
    pub color: String,
    pub deadline: Option<NaiveDate>,
    /// Auto-save policy data; stored but not executed by the core.
    pub auto_save_amount: i64,
    pub auto_save_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl SavingsGoal {
    pub fn new(
        user_id: String,
        name: String,
        target_amount: i64,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        if target_amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "target_amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            target_amount,
            current_amount: 0,
            icon: DEFAULT_ICON.to_string(),
            color: DEFAULT_COLOR.to_string(),
            deadline: None,
            auto_save_amount: 0,
            auto_save_enabled: false,
            created_at,
        })
    }

    /// Completion percentage with one decimal digit.
    ///
    /// Computed on demand and never stored; the ledger only holds the two
    /// integer amounts.
    #[must_use]
    pub fn progress(&self) -> f64 {
        (self.current_amount as f64 / self.target_amount as f64 * 1000.0).round() / 10.0
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "savings_goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount: i64,
    pub current_amount: i64,
    pub icon: String,
    pub color: String,
    pub deadline: Option<Date>,
    pub auto_save_amount: i64,
    pub auto_save_enabled: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&SavingsGoal> for ActiveModel {
    fn from(goal: &SavingsGoal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            user_id: ActiveValue::Set(goal.user_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            target_amount: ActiveValue::Set(goal.target_amount),
            current_amount: ActiveValue::Set(goal.current_amount),
            icon: ActiveValue::Set(goal.icon.clone()),
            color: ActiveValue::Set(goal.color.clone()),
            deadline: ActiveValue::Set(goal.deadline),
            auto_save_amount: ActiveValue::Set(goal.auto_save_amount),
            auto_save_enabled: ActiveValue::Set(goal.auto_save_enabled),
            created_at: ActiveValue::Set(goal.created_at),
        }
    }
}

impl TryFrom<Model> for SavingsGoal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("goal not exists".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            target_amount: model.target_amount,
            current_amount: model.current_amount,
            icon: model.icon,
            color: model.color,
            deadline: model.deadline,
            auto_save_amount: model.auto_save_amount,
            auto_save_enabled: model.auto_save_enabled,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn progress_keeps_one_decimal() {
        let mut goal = SavingsGoal::new(
            "eli".to_string(),
            "Voyage Tokyo".to_string(),
            250_000,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap();
        goal.current_amount = 83_000;

        assert_eq!(goal.progress(), 33.2);
    }

    #[test]
    fn progress_may_exceed_hundred() {
        let mut goal = SavingsGoal::new(
            "eli".to_string(),
            "Urgences".to_string(),
            10_000,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap();
        goal.current_amount = 12_550;

        assert_eq!(goal.progress(), 125.5);
    }

    #[test]
    fn rejects_non_positive_target() {
        let err = SavingsGoal::new(
            "eli".to_string(),
            "Vide".to_string(),
            0,
            Utc.timestamp_opt(0, 0).unwrap(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidAmount("target_amount must be > 0".to_string())
        );
    }
}
