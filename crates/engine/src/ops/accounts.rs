use chrono::{DateTime, Utc};

use sea_orm::{QueryFilter, TransactionTrait, prelude::*};

use crate::{Account, EngineError, ResultEngine, accounts};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Opens the single current account for a user.
    ///
    /// The account starts at balance 0 with status `active`. Called at user
    /// registration time by the (external) onboarding flow.
    pub async fn open_account(
        &self,
        user_id: &str,
        iban: &str,
        created_at: DateTime<Utc>,
    ) -> ResultEngine<Account> {
        let iban = normalize_required_name(iban, "iban")?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;

            let existing = accounts::Entity::find()
                .filter(accounts::Column::UserId.eq(user_id.to_string()))
                .one(&db_tx)
                .await?;
            if existing.is_some() {
                return Err(EngineError::ExistingKey(format!("account for {user_id}")));
            }

            let account = Account::new(user_id.to_string(), iban, created_at);
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account)
        })
    }

    /// Returns the account owned by `user_id`.
    pub async fn account(&self, user_id: &str) -> ResultEngine<Account> {
        let model = accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id.to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("account not exists".to_string()))?;
        Account::try_from(model)
    }
}
