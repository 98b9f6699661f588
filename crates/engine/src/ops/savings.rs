//! Savings goal orchestration.
//!
//! Deposits and withdrawals move cents between the account balance and a
//! goal's accrued amount without changing their sum; goal deletion returns
//! the residual to the account. Every movement appends a ledger entry in
//! the same atomic unit.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, CreateGoalCmd, EngineError, MoneyCents, ResultEngine, SavingsGoal, Transaction,
    TransactionKind, UpdateGoalCmd, savings_goals, transactions,
};

use super::{
    Engine, access::parse_stored_uuid, normalize_required_name, require_positive_amount, with_tx,
};

impl Engine {
    /// Creates a savings goal with `current_amount` 0.
    pub async fn create_goal(&self, cmd: CreateGoalCmd) -> ResultEngine<SavingsGoal> {
        let name = normalize_required_name(&cmd.name, "goal name")?;
        if let Some(auto_save) = cmd.auto_save_amount
            && auto_save < 0
        {
            return Err(EngineError::InvalidAmount(
                "auto_save_amount must be >= 0".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, &cmd.user_id).await?;

            let mut goal =
                SavingsGoal::new(cmd.user_id.clone(), name, cmd.target_amount, cmd.created_at)?;
            if let Some(icon) = cmd.icon {
                goal.icon = icon;
            }
            if let Some(color) = cmd.color {
                goal.color = color;
            }
            goal.deadline = cmd.deadline;
            if let Some(auto_save) = cmd.auto_save_amount {
                goal.auto_save_amount = auto_save;
            }
            if let Some(enabled) = cmd.auto_save_enabled {
                goal.auto_save_enabled = enabled;
            }

            savings_goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Lists the user's goals, newest first.
    pub async fn goals(&self, user_id: &str) -> ResultEngine<Vec<SavingsGoal>> {
        let models = savings_goals::Entity::find()
            .filter(savings_goals::Column::UserId.eq(user_id.to_string()))
            .order_by_desc(savings_goals::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let mut out = Vec::with_capacity(models.len());
        for model in models {
            out.push(SavingsGoal::try_from(model)?);
        }
        Ok(out)
    }

    /// Returns one goal owned by `user_id`.
    pub async fn goal(&self, user_id: &str, goal_id: Uuid) -> ResultEngine<SavingsGoal> {
        let model = self.require_goal(&self.database, user_id, goal_id).await?;
        SavingsGoal::try_from(model)
    }

    /// Partially updates a goal; omitted fields keep their stored value.
    ///
    /// `current_amount` cannot be changed here, only through deposits and
    /// withdrawals.
    pub async fn update_goal(&self, cmd: UpdateGoalCmd) -> ResultEngine<SavingsGoal> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, &cmd.user_id, cmd.goal_id).await?;
            let mut goal = SavingsGoal::try_from(model)?;

            if let Some(name) = cmd.name {
                goal.name = normalize_required_name(&name, "goal name")?;
            }
            if let Some(target_amount) = cmd.target_amount {
                if target_amount <= 0 {
                    return Err(EngineError::InvalidAmount(
                        "target_amount must be > 0".to_string(),
                    ));
                }
                goal.target_amount = target_amount;
            }
            if let Some(icon) = cmd.icon {
                goal.icon = icon;
            }
            if let Some(color) = cmd.color {
                goal.color = color;
            }
            if let Some(deadline) = cmd.deadline {
                goal.deadline = Some(deadline);
            }
            if let Some(auto_save) = cmd.auto_save_amount {
                if auto_save < 0 {
                    return Err(EngineError::InvalidAmount(
                        "auto_save_amount must be >= 0".to_string(),
                    ));
                }
                goal.auto_save_amount = auto_save;
            }
            if let Some(enabled) = cmd.auto_save_enabled {
                goal.auto_save_enabled = enabled;
            }

            let goal_model = savings_goals::ActiveModel {
                id: ActiveValue::Set(goal.id.to_string()),
                name: ActiveValue::Set(goal.name.clone()),
                target_amount: ActiveValue::Set(goal.target_amount),
                icon: ActiveValue::Set(goal.icon.clone()),
                color: ActiveValue::Set(goal.color.clone()),
                deadline: ActiveValue::Set(goal.deadline),
                auto_save_amount: ActiveValue::Set(goal.auto_save_amount),
                auto_save_enabled: ActiveValue::Set(goal.auto_save_enabled),
                ..Default::default()
            };
            goal_model.update(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Moves `amount` cents from the account balance into the goal.
    ///
    /// The goal has no upper clamp: `current_amount` may exceed the target.
    pub async fn deposit_to_goal(
        &self,
        user_id: &str,
        goal_id: Uuid,
        amount: i64,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<SavingsGoal> {
        require_positive_amount(amount)?;

        with_tx!(self, |db_tx| {
            let goal_model = self.require_goal(&db_tx, user_id, goal_id).await?;
            let account = self.require_active_account(&db_tx, user_id).await?;
            if account.balance < amount {
                return Err(EngineError::InsufficientFunds(account.iban.clone()));
            }
            let account_id = parse_stored_uuid(&account.id, "account")?;

            let mut goal = SavingsGoal::try_from(goal_model)?;
            goal.current_amount = MoneyCents::new(goal.current_amount)
                .checked_add(MoneyCents::new(amount))
                .ok_or_else(|| {
                    EngineError::InvalidAmount("current_amount out of range".to_string())
                })?
                .cents();

            self.apply_balance_delta(&db_tx, &account, -amount).await?;
            self.persist_goal_amount(&db_tx, &goal).await?;

            let tx = Transaction::new(
                account_id,
                TransactionKind::Debit,
                amount,
                format!("Épargne : {}", goal.name),
                Category::Other,
                created_at,
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Moves `amount` cents from the goal back to the account balance.
    pub async fn withdraw_from_goal(
        &self,
        user_id: &str,
        goal_id: Uuid,
        amount: i64,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<SavingsGoal> {
        require_positive_amount(amount)?;

        with_tx!(self, |db_tx| {
            let goal_model = self.require_goal(&db_tx, user_id, goal_id).await?;
            if goal_model.current_amount < amount {
                return Err(EngineError::InsufficientSavings(goal_model.name.clone()));
            }
            let account = self.require_active_account(&db_tx, user_id).await?;
            let account_id = parse_stored_uuid(&account.id, "account")?;

            let mut goal = SavingsGoal::try_from(goal_model)?;
            goal.current_amount -= amount;

            self.persist_goal_amount(&db_tx, &goal).await?;
            self.apply_balance_delta(&db_tx, &account, amount).await?;

            let tx = Transaction::new(
                account_id,
                TransactionKind::Credit,
                amount,
                format!("Retrait épargne : {}", goal.name),
                Category::Other,
                created_at,
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    /// Deletes a goal, returning any residual funds to the account.
    ///
    /// The returned funds produce a `credit` ledger entry like any other
    /// balance increase.
    pub async fn delete_goal(
        &self,
        user_id: &str,
        goal_id: Uuid,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let goal_model = self.require_goal(&db_tx, user_id, goal_id).await?;

            if goal_model.current_amount > 0 {
                let account = self.require_active_account(&db_tx, user_id).await?;
                let account_id = parse_stored_uuid(&account.id, "account")?;

                self.apply_balance_delta(&db_tx, &account, goal_model.current_amount)
                    .await?;
                let tx = Transaction::new(
                    account_id,
                    TransactionKind::Credit,
                    goal_model.current_amount,
                    format!("Clôture épargne : {}", goal_model.name),
                    Category::Other,
                    created_at,
                )?;
                transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            }

            savings_goals::Entity::delete_by_id(goal_model.id.clone())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    async fn persist_goal_amount(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        goal: &SavingsGoal,
    ) -> ResultEngine<()> {
        let goal_model = savings_goals::ActiveModel {
            id: ActiveValue::Set(goal.id.to_string()),
            current_amount: ActiveValue::Set(goal.current_amount),
            ..Default::default()
        };
        goal_model.update(db_tx).await?;
        Ok(())
    }
}
