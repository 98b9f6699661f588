//! Outbound transfers and payment requests.

use sea_orm::{TransactionTrait, prelude::*};

use crate::{
    Category, EngineError, MoneyCents, RequestMoneyCmd, ResultEngine, Transaction,
    TransactionKind, TransactionStatus, TransferCmd, transactions,
};

use super::{
    Engine, access::parse_stored_uuid, normalize_description, normalize_required_name,
    require_positive_amount, with_tx,
};

const TRANSFER_OUT_LABEL: &str = "Virement sortant";
const REQUEST_MONEY_LABEL: &str = "Demande de paiement";

impl Engine {
    /// Sends money to an external IBAN.
    ///
    /// Debits the account and appends a `transfer_out` entry in one atomic
    /// unit, then hands a notification to the sink. The sink runs after
    /// commit and outside any lock: a delivery failure can never roll back
    /// the transfer.
    pub async fn transfer(&self, cmd: TransferCmd) -> ResultEngine<Transaction> {
        let TransferCmd {
            user_id,
            amount,
            iban,
            description,
            created_at,
        } = cmd;
        require_positive_amount(amount)?;
        let iban = normalize_required_name(&iban, "iban")?;
        let description = normalize_description(description.as_deref(), TRANSFER_OUT_LABEL);

        let tx = with_tx!(self, |db_tx| {
            let account = self.require_active_account(&db_tx, &user_id).await?;
            if account.balance < amount {
                return Err(EngineError::InsufficientFunds(account.iban.clone()));
            }
            let account_id = parse_stored_uuid(&account.id, "account")?;

            let mut tx = Transaction::new(
                account_id,
                TransactionKind::TransferOut,
                amount,
                description,
                Category::Transfer,
                created_at,
            )?;
            tx.counterpart_iban = Some(iban.clone());

            self.apply_balance_delta(&db_tx, &account, -amount).await?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok::<Transaction, EngineError>(tx)
        })?;

        self.notifications.notify(
            &user_id,
            "transaction",
            "Virement envoyé",
            &format!("Virement de {} effectué vers {iban}", MoneyCents::new(amount)),
        );
        Ok(tx)
    }

    /// Records a payment request towards `email`.
    ///
    /// Only an inert `transfer_in`/`pending` ledger entry is created; no
    /// balance moves and nothing ever settles the entry.
    pub async fn request_money(&self, cmd: RequestMoneyCmd) -> ResultEngine<Transaction> {
        let RequestMoneyCmd {
            user_id,
            amount,
            email,
            description,
            created_at,
        } = cmd;
        require_positive_amount(amount)?;
        let email = normalize_required_name(&email, "email")?;
        let description = normalize_description(description.as_deref(), REQUEST_MONEY_LABEL);

        with_tx!(self, |db_tx| {
            let account = self.require_account_for_user(&db_tx, &user_id).await?;
            let account_id = parse_stored_uuid(&account.id, "account")?;

            let mut tx = Transaction::new(
                account_id,
                TransactionKind::TransferIn,
                amount,
                description,
                Category::Transfer,
                created_at,
            )?;
            tx.counterpart_name = Some(email);
            tx.status = TransactionStatus::Pending;

            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;
            Ok(tx)
        })
    }
}
