use chrono::{DateTime, TimeZone, Utc};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Category, CreditCmd, DebitCmd, Engine, RequestMoneyCmd, TransferCmd,
};
use migration::MigratorTrait;

async fn engine_with_account() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username) VALUES (?)",
        vec!["alice".into()],
    ))
    .await
    .unwrap();

    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine
        .open_account("alice", "BE68 5390 0754 7034", at(2026, 1, 1))
        .await
        .unwrap();
    (engine, db)
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

/// February and March 2026 history used by the summary/breakdown tests.
async fn seed_two_months(engine: &Engine) {
    engine
        .credit(
            CreditCmd::new("alice", 65000, at(2026, 2, 5))
                .category(Category::Salary)
                .description("Salaire"),
        )
        .await
        .unwrap();
    engine
        .debit(
            DebitCmd::new("alice", 5000, at(2026, 2, 10))
                .category(Category::Shopping)
                .description("Zalando"),
        )
        .await
        .unwrap();

    engine
        .credit(
            CreditCmd::new("alice", 65000, at(2026, 3, 5))
                .category(Category::Salary)
                .description("Salaire"),
        )
        .await
        .unwrap();
    engine
        .debit(
            DebitCmd::new("alice", 6230, at(2026, 3, 8))
                .category(Category::Food)
                .description("Courses Delhaize"),
        )
        .await
        .unwrap();
    engine
        .debit(
            DebitCmd::new("alice", 2750, at(2026, 3, 10))
                .category(Category::Food)
                .description("Uber Eats"),
        )
        .await
        .unwrap();
    engine
        .debit(
            DebitCmd::new("alice", 1200, at(2026, 3, 12))
                .category(Category::Transport)
                .description("Abonnement STIB"),
        )
        .await
        .unwrap();
    engine
        .transfer(
            TransferCmd::new("alice", 2500, "BE68 1234 5678 9012", at(2026, 3, 15))
                .description("Remboursement ciné"),
        )
        .await
        .unwrap();
    engine
        .credit(
            CreditCmd::new("alice", 275, at(2026, 3, 18))
                .cashback()
                .description("Cashback — FNAC"),
        )
        .await
        .unwrap();

    // Pending request: must never count towards any aggregate.
    engine
        .request_money(RequestMoneyCmd::new(
            "alice",
            9999,
            "mehdi@example.be",
            at(2026, 3, 16),
        ))
        .await
        .unwrap();
}

#[tokio::test]
async fn monthly_summary_counts_completed_entries_in_window() {
    let (engine, _db) = engine_with_account().await;
    seed_two_months(&engine).await;

    let summary = engine
        .monthly_summary("alice", at(2026, 3, 1), at(2026, 3, 31))
        .await
        .unwrap();

    // Income: salary + cashback; the pending transfer_in is excluded.
    assert_eq!(summary.income, 65275);
    // Expenses: two food debits, transport, and the outbound transfer.
    assert_eq!(summary.expenses, 12680);
}

#[tokio::test]
async fn monthly_summary_is_zero_on_an_empty_window() {
    let (engine, _db) = engine_with_account().await;
    seed_two_months(&engine).await;

    let summary = engine
        .monthly_summary("alice", at(2025, 6, 1), at(2025, 6, 30))
        .await
        .unwrap();
    assert_eq!(summary.income, 0);
    assert_eq!(summary.expenses, 0);
}

#[tokio::test]
async fn category_breakdown_orders_by_total_descending() {
    let (engine, _db) = engine_with_account().await;
    seed_two_months(&engine).await;

    let breakdown = engine
        .category_breakdown("alice", at(2026, 3, 1))
        .await
        .unwrap();

    assert_eq!(breakdown.len(), 3);

    assert_eq!(breakdown[0].category, Category::Food);
    assert_eq!(breakdown[0].total, 8980);
    assert_eq!(breakdown[0].count, 2);

    assert_eq!(breakdown[1].category, Category::Transfer);
    assert_eq!(breakdown[1].total, 2500);
    assert_eq!(breakdown[1].count, 1);

    assert_eq!(breakdown[2].category, Category::Transport);
    assert_eq!(breakdown[2].total, 1200);
    assert_eq!(breakdown[2].count, 1);
}

#[tokio::test]
async fn aggregates_are_idempotent_reads() {
    let (engine, _db) = engine_with_account().await;
    seed_two_months(&engine).await;

    let first = engine
        .monthly_summary("alice", at(2026, 3, 1), at(2026, 3, 31))
        .await
        .unwrap();
    let second = engine
        .monthly_summary("alice", at(2026, 3, 1), at(2026, 3, 31))
        .await
        .unwrap();
    assert_eq!(first, second);

    let first = engine
        .category_breakdown("alice", at(2026, 3, 1))
        .await
        .unwrap();
    let second = engine
        .category_breakdown("alice", at(2026, 3, 1))
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn monthly_trend_returns_latest_six_months() {
    let (engine, _db) = engine_with_account().await;

    // Seven months of history; the oldest must fall off.
    let months = [
        (2025, 9),
        (2025, 10),
        (2025, 11),
        (2025, 12),
        (2026, 1),
        (2026, 2),
        (2026, 3),
    ];
    for (year, month) in months {
        engine
            .credit(
                CreditCmd::new("alice", 65000, at(year, month, 15))
                    .category(Category::Salary)
                    .description("Salaire"),
            )
            .await
            .unwrap();
        engine
            .debit(
                DebitCmd::new("alice", 4000, at(year, month, 20))
                    .category(Category::Food)
                    .description("Courses"),
            )
            .await
            .unwrap();
    }

    let trend = engine.monthly_trend("alice").await.unwrap();

    assert_eq!(trend.len(), 6);
    assert_eq!(trend[0].month, "2026-03");
    assert_eq!(trend[5].month, "2025-10");
    assert!(trend.iter().all(|m| m.income == 65000 && m.expenses == 4000));
    assert!(trend.windows(2).all(|w| w[0].month > w[1].month));
}
