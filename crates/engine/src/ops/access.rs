//! Ownership lookups shared by the operation modules.
//!
//! Every lookup is scoped to the calling user; a row owned by someone else
//! is reported as absent, never as a permission failure.

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{AccountStatus, EngineError, ResultEngine, accounts, savings_goals, users};

use super::Engine;

impl Engine {
    pub(super) async fn require_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
    ) -> ResultEngine<users::Model> {
        users::Entity::find_by_id(user_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("user not exists".to_string()))
    }

    pub(super) async fn require_account_for_user<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
    ) -> ResultEngine<accounts::Model> {
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("account not exists".to_string()))
    }

    /// Like [`require_account_for_user`], but also enforces the status gate
    /// shared by every balance-mutating operation.
    ///
    /// [`require_account_for_user`]: Engine::require_account_for_user
    pub(super) async fn require_active_account<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
    ) -> ResultEngine<accounts::Model> {
        let account = self.require_account_for_user(db, user_id).await?;
        let status = AccountStatus::try_from(account.status.as_str())?;
        if status != AccountStatus::Active {
            return Err(EngineError::AccountInactive(account.iban.clone()));
        }
        Ok(account)
    }

    pub(super) async fn require_goal<C: ConnectionTrait>(
        &self,
        db: &C,
        user_id: &str,
        goal_id: Uuid,
    ) -> ResultEngine<savings_goals::Model> {
        savings_goals::Entity::find_by_id(goal_id.to_string())
            .filter(savings_goals::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("goal not exists".to_string()))
    }
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(super) fn parse_stored_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::NotFound(format!("{label} not exists")))
}
