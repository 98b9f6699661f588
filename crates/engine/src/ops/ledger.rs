//! Audited balance mutation: the only code paths that write
//! `accounts.balance`.
//!
//! Each mutation pairs the balance write with exactly one ledger entry
//! inside the same database transaction; there is no way to change a
//! balance without producing its log row.

use sea_orm::{ActiveValue, DatabaseTransaction, TransactionTrait, prelude::*};

use crate::{
    Category, CreditCmd, DebitCmd, EngineError, MoneyCents, ResultEngine, Transaction,
    TransactionKind, accounts, transactions,
};

use super::{
    Engine, access::parse_stored_uuid, normalize_description, require_positive_amount, with_tx,
};

impl Engine {
    /// Adjusts the stored balance of an account by `delta` cents.
    ///
    /// Callers have already validated funds; this only guards the i64 range.
    pub(super) async fn apply_balance_delta(
        &self,
        db_tx: &DatabaseTransaction,
        account: &accounts::Model,
        delta: i64,
    ) -> ResultEngine<()> {
        let new_balance = MoneyCents::new(account.balance)
            .checked_add(MoneyCents::new(delta))
            .ok_or_else(|| EngineError::InvalidAmount("balance out of range".to_string()))?;

        let account_model = accounts::ActiveModel {
            id: ActiveValue::Set(account.id.clone()),
            balance: ActiveValue::Set(new_balance.cents()),
            ..Default::default()
        };
        account_model.update(db_tx).await?;
        Ok(())
    }

    /// Credits the account with incoming funds and appends the matching
    /// ledger entry.
    ///
    /// Credits are accepted regardless of account status: a frozen account
    /// stops outgoing money, not incoming.
    pub async fn credit(&self, cmd: CreditCmd) -> ResultEngine<Transaction> {
        let CreditCmd {
            user_id,
            amount,
            kind,
            category,
            description,
            counterpart_name,
            counterpart_iban,
            created_at,
        } = cmd;
        require_positive_amount(amount)?;
        if !kind.is_income() {
            return Err(EngineError::InvalidAmount(format!(
                "credit kind must be an income kind, got {}",
                kind.as_str()
            )));
        }
        let description = normalize_description(description.as_deref(), "Crédit reçu");

        with_tx!(self, |db_tx| {
            let account = self.require_account_for_user(&db_tx, &user_id).await?;
            let account_id = parse_stored_uuid(&account.id, "account")?;

            let mut tx = Transaction::new(
                account_id,
                kind,
                amount,
                description,
                category.unwrap_or_default(),
                created_at,
            )?;
            tx.counterpart_name = counterpart_name;
            tx.counterpart_iban = counterpart_iban;

            self.apply_balance_delta(&db_tx, &account, amount).await?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }

    /// Debits the account for an outgoing payment and appends the matching
    /// ledger entry.
    pub async fn debit(&self, cmd: DebitCmd) -> ResultEngine<Transaction> {
        let DebitCmd {
            user_id,
            amount,
            category,
            description,
            counterpart_name,
            counterpart_iban,
            created_at,
        } = cmd;
        require_positive_amount(amount)?;
        let description = normalize_description(description.as_deref(), "Paiement");

        with_tx!(self, |db_tx| {
            let account = self.require_active_account(&db_tx, &user_id).await?;
            if account.balance < amount {
                return Err(EngineError::InsufficientFunds(account.iban.clone()));
            }
            let account_id = parse_stored_uuid(&account.id, "account")?;

            let mut tx = Transaction::new(
                account_id,
                TransactionKind::Debit,
                amount,
                description,
                category.unwrap_or(Category::Other),
                created_at,
            )?;
            tx.counterpart_name = counterpart_name;
            tx.counterpart_iban = counterpart_iban;

            self.apply_balance_delta(&db_tx, &account, -amount).await?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }
}
