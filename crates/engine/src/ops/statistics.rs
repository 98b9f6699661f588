//! Read-only aggregation over the transaction log.
//!
//! Nothing here mutates state; every figure is derived by scanning
//! `transactions` and only `completed` entries count.

use chrono::{DateTime, Utc};

use sea_orm::{Statement, prelude::*};

use crate::{Category, ResultEngine, TransactionKind, TransactionStatus};

use super::Engine;

/// Income/expense totals for a date window, in cents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MonthlySummary {
    pub income: i64,
    pub expenses: i64,
}

/// Spending total and entry count for one category.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: i64,
    pub count: i64,
}

/// Income/expense totals for one calendar month (`YYYY-MM`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthTotals {
    pub month: String,
    pub income: i64,
    pub expenses: i64,
}

fn sql_kind_list(kinds: &[TransactionKind]) -> String {
    kinds
        .iter()
        .map(|kind| format!("'{}'", kind.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Engine {
    async fn sum_kinds_between(
        &self,
        account_id: &str,
        kinds: &[TransactionKind],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ResultEngine<i64> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT COALESCE(SUM(amount), 0) AS sum \
                 FROM transactions \
                 WHERE account_id = ? AND status = ? AND type IN ({kinds}) \
                 AND created_at >= ? AND created_at <= ?",
                kinds = sql_kind_list(kinds)
            ),
            vec![
                account_id.into(),
                TransactionStatus::Completed.as_str().into(),
                from.into(),
                to.into(),
            ],
        );
        let row = self.database.query_one(stmt).await?;
        Ok(row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0))
    }

    /// Income and expense totals over `[from, to]`, both 0 when no entry
    /// matches.
    pub async fn monthly_summary(
        &self,
        user_id: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ResultEngine<MonthlySummary> {
        let account = self.account(user_id).await?;
        let account_id = account.id.to_string();

        let income = self
            .sum_kinds_between(&account_id, &TransactionKind::INCOME, from, to)
            .await?;
        let expenses = self
            .sum_kinds_between(&account_id, &TransactionKind::EXPENSE, from, to)
            .await?;
        Ok(MonthlySummary { income, expenses })
    }

    /// Spending grouped by category since `month_start`, largest total
    /// first.
    pub async fn category_breakdown(
        &self,
        user_id: &str,
        month_start: DateTime<Utc>,
    ) -> ResultEngine<Vec<CategoryTotal>> {
        let account = self.account(user_id).await?;
        let backend = self.database.get_database_backend();

        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT category, COALESCE(SUM(amount), 0) AS total, COUNT(*) AS count \
                 FROM transactions \
                 WHERE account_id = ? AND status = ? AND type IN ({kinds}) \
                 AND created_at >= ? \
                 GROUP BY category \
                 ORDER BY total DESC",
                kinds = sql_kind_list(&TransactionKind::EXPENSE)
            ),
            vec![
                account.id.to_string().into(),
                TransactionStatus::Completed.as_str().into(),
                month_start.into(),
            ],
        );
        let rows = self.database.query_all(stmt).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            let category: String = row.try_get("", "category")?;
            out.push(CategoryTotal {
                category: Category::try_from(category.as_str()).unwrap_or_default(),
                total: row.try_get("", "total")?,
                count: row.try_get("", "count")?,
            });
        }
        Ok(out)
    }

    /// Income and expenses per calendar month, most recent 6 months first.
    pub async fn monthly_trend(&self, user_id: &str) -> ResultEngine<Vec<MonthTotals>> {
        let account = self.account(user_id).await?;
        let backend = self.database.get_database_backend();

        // created_at is stored as ISO-8601 text; its first 7 chars are `YYYY-MM`.
        let stmt = Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT substr(created_at, 1, 7) AS month, \
                 SUM(CASE WHEN type IN ({income}) THEN amount ELSE 0 END) AS income, \
                 SUM(CASE WHEN type IN ({expense}) THEN amount ELSE 0 END) AS expenses \
                 FROM transactions \
                 WHERE account_id = ? AND status = ? \
                 GROUP BY month \
                 ORDER BY month DESC \
                 LIMIT 6",
                income = sql_kind_list(&TransactionKind::INCOME),
                expense = sql_kind_list(&TransactionKind::EXPENSE)
            ),
            vec![
                account.id.to_string().into(),
                TransactionStatus::Completed.as_str().into(),
            ],
        );
        let rows = self.database.query_all(stmt).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(MonthTotals {
                month: row.try_get("", "month")?,
                income: row.try_get("", "income")?,
                expenses: row.try_get("", "expenses")?,
            });
        }
        Ok(out)
    }
}
