use chrono::{DateTime, Utc};
use uuid::Uuid;

use sea_orm::{PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{
    Category, EngineError, ResultEngine, Transaction, TransactionKind, transactions,
};

use super::{Engine, with_tx};

/// Hard cap on the page size of transaction listings.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Filters for listing ledger entries.
///
/// Both date bounds are inclusive.
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionKind>,
    pub category: Option<Category>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}

fn validate_filter(filter: &TransactionFilter) -> ResultEngine<()> {
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to)
        && from > to
    {
        return Err(EngineError::InvalidAmount(
            "invalid range: date_from must be <= date_to".to_string(),
        ));
    }
    Ok(())
}

trait ApplyTxFilters: QueryFilter + Sized {
    fn apply_tx_filters(self, filter: &TransactionFilter) -> Self;
}

impl<T> ApplyTxFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tx_filters(mut self, filter: &TransactionFilter) -> Self {
        if let Some(kind) = filter.kind {
            self = self.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(category) = filter.category {
            self = self.filter(transactions::Column::Category.eq(category.as_str()));
        }
        if let Some(from) = filter.date_from {
            self = self.filter(transactions::Column::CreatedAt.gte(from));
        }
        if let Some(to) = filter.date_to {
            self = self.filter(transactions::Column::CreatedAt.lte(to));
        }
        self
    }
}

impl Engine {
    /// Lists the account's ledger entries, newest first.
    ///
    /// `page` is 1-based; `page_size` is clamped to [`MAX_PAGE_SIZE`].
    /// Returns the requested page and the total number of matching entries.
    pub async fn transactions(
        &self,
        user_id: &str,
        filter: &TransactionFilter,
        page: u64,
        page_size: u64,
    ) -> ResultEngine<(Vec<Transaction>, u64)> {
        validate_filter(filter)?;
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        with_tx!(self, |db_tx| {
            let account = self.require_account_for_user(&db_tx, user_id).await?;

            let paginator = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(account.id.clone()))
                .apply_tx_filters(filter)
                .order_by_desc(transactions::Column::CreatedAt)
                .order_by_desc(transactions::Column::Id)
                .paginate(&db_tx, page_size);

            let total = paginator.num_items().await?;
            let models = paginator.fetch_page(page - 1).await?;

            let mut out = Vec::with_capacity(models.len());
            for model in models {
                out.push(Transaction::try_from(model)?);
            }
            Ok((out, total))
        })
    }

    /// Returns one ledger entry owned by the caller's account.
    ///
    /// Ids belonging to another account come back as `NotFound`.
    pub async fn transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        let account = self.account(user_id).await?;
        let model = transactions::Entity::find_by_id(transaction_id.to_string())
            .filter(transactions::Column::AccountId.eq(account.id.to_string()))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::NotFound("transaction not exists".to_string()))?;
        Transaction::try_from(model)
    }
}
