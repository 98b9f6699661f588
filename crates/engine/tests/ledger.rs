use std::sync::{Arc, Mutex};

use chrono::Utc;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

use engine::{
    CreateGoalCmd, CreditCmd, Engine, EngineError, NotificationSink, RequestMoneyCmd,
    TransactionFilter, TransactionKind, TransactionStatus, TransferCmd, UpdateGoalCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    insert_user(&db, "alice").await;
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn insert_user(db: &DatabaseConnection, username: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username) VALUES (?)",
        vec![username.into()],
    ))
    .await
    .unwrap();
}

async fn freeze_account(db: &DatabaseConnection, user_id: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE accounts SET status = 'frozen' WHERE user_id = ?",
        vec![user_id.into()],
    ))
    .await
    .unwrap();
}

/// Opens an account for `alice` and funds it with a single credit.
async fn funded_account(engine: &Engine, balance: i64) {
    engine
        .open_account("alice", "BE68 5390 0754 7034", Utc::now())
        .await
        .unwrap();
    if balance > 0 {
        engine
            .credit(CreditCmd::new("alice", balance, Utc::now()))
            .await
            .unwrap();
    }
}

#[derive(Debug, Default)]
struct RecordingSink(Mutex<Vec<(String, String, String, String)>>);

impl NotificationSink for RecordingSink {
    fn notify(&self, user_id: &str, category: &str, title: &str, message: &str) {
        self.0.lock().unwrap().push((
            user_id.to_string(),
            category.to_string(),
            title.to_string(),
            message.to_string(),
        ));
    }
}

#[tokio::test]
async fn open_account_starts_empty_and_active() {
    let (engine, _db) = engine_with_db().await;

    let account = engine
        .open_account("alice", "BE68 5390 0754 7034", Utc::now())
        .await
        .unwrap();
    assert_eq!(account.balance, 0);
    assert!(account.is_active());

    let fetched = engine.account("alice").await.unwrap();
    assert_eq!(fetched, account);
}

#[tokio::test]
async fn open_account_twice_fails() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 0).await;

    let err = engine
        .open_account("alice", "BE68 9999 9999 9999", Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("account for alice".to_string()));
}

#[tokio::test]
async fn account_lookup_without_account_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.account("alice").await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("account not exists".to_string()));
}

#[tokio::test]
async fn transfer_debits_and_logs_exactly_once() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 184732).await;

    let tx = engine
        .transfer(TransferCmd::new(
            "alice",
            2500,
            "BE68 1234 5678 9012",
            Utc::now(),
        ))
        .await
        .unwrap();

    assert_eq!(tx.kind, TransactionKind::TransferOut);
    assert_eq!(tx.amount, 2500);
    assert_eq!(tx.counterpart_iban.as_deref(), Some("BE68 1234 5678 9012"));
    assert_eq!(tx.description, "Virement sortant");

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.balance, 182232);

    let filter = TransactionFilter {
        kind: Some(TransactionKind::TransferOut),
        ..Default::default()
    };
    let (items, total) = engine.transactions("alice", &filter, 1, 20).await.unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].id, tx.id);
    assert_eq!(items[0].amount, 2500);
}

#[tokio::test]
async fn transfer_with_insufficient_funds_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 5000).await;

    let err = engine
        .transfer(TransferCmd::new(
            "alice",
            10000,
            "BE68 1234 5678 9012",
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientFunds("BE68 5390 0754 7034".to_string())
    );

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.balance, 5000);

    // Only the funding credit is in the log; no partial transfer row.
    let (items, total) = engine
        .transactions("alice", &TransactionFilter::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(items[0].kind, TransactionKind::Credit);
}

#[tokio::test]
async fn transfer_on_frozen_account_is_refused() {
    let (engine, db) = engine_with_db().await;
    funded_account(&engine, 10000).await;
    freeze_account(&db, "alice").await;

    let err = engine
        .transfer(TransferCmd::new(
            "alice",
            1000,
            "BE68 1234 5678 9012",
            Utc::now(),
        ))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::AccountInactive("BE68 5390 0754 7034".to_string())
    );

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.balance, 10000);
}

#[tokio::test]
async fn transfer_rejects_non_positive_amounts() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 10000).await;

    for amount in [0, -100] {
        let err = engine
            .transfer(TransferCmd::new(
                "alice",
                amount,
                "BE68 1234 5678 9012",
                Utc::now(),
            ))
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidAmount("amount must be > 0".to_string()));
    }
}

#[tokio::test]
async fn transfer_notifies_once_on_success_only() {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    insert_user(&db, "alice").await;

    let sink = Arc::new(RecordingSink::default());
    let engine = Engine::builder()
        .database(db.clone())
        .notifications(sink.clone())
        .build()
        .await
        .unwrap();
    funded_account(&engine, 10000).await;

    engine
        .transfer(
            TransferCmd::new("alice", 2500, "BE68 1234 5678 9012", Utc::now())
                .description("Remboursement ciné"),
        )
        .await
        .unwrap();

    engine
        .transfer(TransferCmd::new(
            "alice",
            100000,
            "BE68 1234 5678 9012",
            Utc::now(),
        ))
        .await
        .unwrap_err();

    let events = sink.0.lock().unwrap();
    assert_eq!(events.len(), 1);
    let (user_id, category, title, message) = &events[0];
    assert_eq!(user_id, "alice");
    assert_eq!(category, "transaction");
    assert_eq!(title, "Virement envoyé");
    assert_eq!(message, "Virement de 25.00€ effectué vers BE68 1234 5678 9012");
}

#[tokio::test]
async fn request_money_creates_inert_pending_entry() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 5000).await;

    let tx = engine
        .request_money(RequestMoneyCmd::new(
            "alice",
            1500,
            "mehdi@example.be",
            Utc::now(),
        ))
        .await
        .unwrap();

    assert_eq!(tx.kind, TransactionKind::TransferIn);
    assert_eq!(tx.status, TransactionStatus::Pending);
    assert_eq!(tx.counterpart_name.as_deref(), Some("mehdi@example.be"));
    assert_eq!(tx.description, "Demande de paiement");

    // No balance mutation.
    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.balance, 5000);
}

#[tokio::test]
async fn deposit_moves_funds_and_keeps_the_total() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 100000).await;

    let goal = engine
        .create_goal(CreateGoalCmd::new("alice", "Voyage Tokyo", 250000, Utc::now()))
        .await
        .unwrap();
    let goal = engine
        .deposit_to_goal("alice", goal.id, 78000, Utc::now())
        .await
        .unwrap();

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.balance, 22000);
    assert_eq!(goal.current_amount, 78000);
    assert_eq!(account.balance + goal.current_amount, 100000);

    let goal = engine
        .deposit_to_goal("alice", goal.id, 5000, Utc::now())
        .await
        .unwrap();
    assert_eq!(goal.current_amount, 83000);
    assert_eq!(goal.progress(), 33.2);

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.balance, 17000);
    assert_eq!(account.balance + goal.current_amount, 100000);

    // Each deposit produced one debit entry referencing the goal.
    let filter = TransactionFilter {
        kind: Some(TransactionKind::Debit),
        ..Default::default()
    };
    let (items, total) = engine.transactions("alice", &filter, 1, 20).await.unwrap();
    assert_eq!(total, 2);
    assert!(items.iter().all(|tx| tx.description == "Épargne : Voyage Tokyo"));
}

#[tokio::test]
async fn deposit_with_insufficient_funds_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 4000).await;

    let goal = engine
        .create_goal(CreateGoalCmd::new("alice", "Urgences", 100000, Utc::now()))
        .await
        .unwrap();

    let err = engine
        .deposit_to_goal("alice", goal.id, 5000, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientFunds("BE68 5390 0754 7034".to_string())
    );

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.balance, 4000);
    let goal = engine.goal("alice", goal.id).await.unwrap();
    assert_eq!(goal.current_amount, 0);
}

#[tokio::test]
async fn deposit_on_frozen_account_is_refused() {
    let (engine, db) = engine_with_db().await;
    funded_account(&engine, 10000).await;

    let goal = engine
        .create_goal(CreateGoalCmd::new("alice", "Urgences", 100000, Utc::now()))
        .await
        .unwrap();
    freeze_account(&db, "alice").await;

    let err = engine
        .deposit_to_goal("alice", goal.id, 1000, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::AccountInactive("BE68 5390 0754 7034".to_string())
    );
}

#[tokio::test]
async fn withdraw_beyond_savings_changes_nothing() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 50000).await;

    let goal = engine
        .create_goal(CreateGoalCmd::new("alice", "Urgences", 100000, Utc::now()))
        .await
        .unwrap();
    engine
        .deposit_to_goal("alice", goal.id, 10000, Utc::now())
        .await
        .unwrap();

    let err = engine
        .withdraw_from_goal("alice", goal.id, 15000, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::InsufficientSavings("Urgences".to_string()));

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.balance, 40000);
    let goal = engine.goal("alice", goal.id).await.unwrap();
    assert_eq!(goal.current_amount, 10000);
}

#[tokio::test]
async fn deposit_withdraw_sequence_conserves_money() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 60000).await;

    let goal = engine
        .create_goal(CreateGoalCmd::new("alice", "Voyage Tokyo", 250000, Utc::now()))
        .await
        .unwrap();

    for (deposit, withdraw) in [(20000, 5000), (7500, 7500), (100, 1)] {
        engine
            .deposit_to_goal("alice", goal.id, deposit, Utc::now())
            .await
            .unwrap();
        engine
            .withdraw_from_goal("alice", goal.id, withdraw, Utc::now())
            .await
            .unwrap();
    }

    let account = engine.account("alice").await.unwrap();
    let goal = engine.goal("alice", goal.id).await.unwrap();
    assert_eq!(account.balance + goal.current_amount, 60000);
    assert!(account.balance >= 0);
    assert!(goal.current_amount >= 0);
}

#[tokio::test]
async fn delete_goal_returns_funds_with_a_logged_credit() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 50000).await;

    let goal = engine
        .create_goal(CreateGoalCmd::new("alice", "Voyage Tokyo", 250000, Utc::now()))
        .await
        .unwrap();
    engine
        .deposit_to_goal("alice", goal.id, 42000, Utc::now())
        .await
        .unwrap();

    engine.delete_goal("alice", goal.id, Utc::now()).await.unwrap();

    let account = engine.account("alice").await.unwrap();
    assert_eq!(account.balance, 50000);

    let err = engine.goal("alice", goal.id).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("goal not exists".to_string()));

    let filter = TransactionFilter {
        kind: Some(TransactionKind::Credit),
        ..Default::default()
    };
    let (items, _) = engine.transactions("alice", &filter, 1, 20).await.unwrap();
    assert!(
        items
            .iter()
            .any(|tx| tx.description == "Clôture épargne : Voyage Tokyo" && tx.amount == 42000)
    );
}

#[tokio::test]
async fn delete_empty_goal_is_a_pure_removal() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 0).await;

    let goal = engine
        .create_goal(CreateGoalCmd::new("alice", "Urgences", 100000, Utc::now()))
        .await
        .unwrap();
    engine.delete_goal("alice", goal.id, Utc::now()).await.unwrap();

    let err = engine.goal("alice", goal.id).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("goal not exists".to_string()));

    // No ledger entry for a zero-amount return.
    let (_, total) = engine
        .transactions("alice", &TransactionFilter::default(), 1, 20)
        .await
        .unwrap();
    assert_eq!(total, 0);
}

#[tokio::test]
async fn update_goal_coalesces_partial_fields() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 20000).await;

    let goal = engine
        .create_goal(
            CreateGoalCmd::new("alice", "Voyage Tokyo", 250000, Utc::now())
                .icon("plane")
                .color("#4F9DF2"),
        )
        .await
        .unwrap();
    engine
        .deposit_to_goal("alice", goal.id, 10000, Utc::now())
        .await
        .unwrap();

    let updated = engine
        .update_goal(UpdateGoalCmd::new("alice", goal.id).name("Voyage Kyoto"))
        .await
        .unwrap();

    assert_eq!(updated.name, "Voyage Kyoto");
    assert_eq!(updated.target_amount, 250000);
    assert_eq!(updated.icon, "plane");
    assert_eq!(updated.color, "#4F9DF2");
    assert_eq!(updated.current_amount, 10000);

    let err = engine
        .update_goal(UpdateGoalCmd::new("alice", goal.id).target_amount(0))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("target_amount must be > 0".to_string())
    );
}

#[tokio::test]
async fn goals_of_another_user_are_invisible() {
    let (engine, db) = engine_with_db().await;
    funded_account(&engine, 10000).await;
    insert_user(&db, "bob").await;
    engine
        .open_account("bob", "BE68 1111 2222 3333", Utc::now())
        .await
        .unwrap();

    let goal = engine
        .create_goal(CreateGoalCmd::new("alice", "Voyage Tokyo", 250000, Utc::now()))
        .await
        .unwrap();

    let err = engine.goal("bob", goal.id).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("goal not exists".to_string()));

    let err = engine
        .deposit_to_goal("bob", goal.id, 1000, Utc::now())
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("goal not exists".to_string()));
}

#[tokio::test]
async fn transaction_lookup_is_scoped_to_the_owner() {
    let (engine, db) = engine_with_db().await;
    funded_account(&engine, 10000).await;
    insert_user(&db, "bob").await;
    engine
        .open_account("bob", "BE68 1111 2222 3333", Utc::now())
        .await
        .unwrap();

    let tx = engine
        .transfer(TransferCmd::new(
            "alice",
            1000,
            "BE68 1234 5678 9012",
            Utc::now(),
        ))
        .await
        .unwrap();

    let fetched = engine.transaction("alice", tx.id).await.unwrap();
    assert_eq!(fetched, tx);

    // Same id through another account reads as absent.
    let err = engine.transaction("bob", tx.id).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("transaction not exists".to_string()));

    let err = engine.transaction("alice", Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err, EngineError::NotFound("transaction not exists".to_string()));
}

#[tokio::test]
async fn transactions_paginate_newest_first() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 0).await;

    for i in 1..=25 {
        engine
            .credit(
                CreditCmd::new("alice", i * 100, Utc::now())
                    .description(format!("Crédit {i}")),
            )
            .await
            .unwrap();
    }

    let (page1, total) = engine
        .transactions("alice", &TransactionFilter::default(), 1, 10)
        .await
        .unwrap();
    assert_eq!(total, 25);
    assert_eq!(page1.len(), 10);

    let (page3, _) = engine
        .transactions("alice", &TransactionFilter::default(), 3, 10)
        .await
        .unwrap();
    assert_eq!(page3.len(), 5);

    // Newest first across the whole listing.
    let (all, _) = engine
        .transactions("alice", &TransactionFilter::default(), 1, 100)
        .await
        .unwrap();
    assert_eq!(all.len(), 25);
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));
}

#[tokio::test]
async fn transactions_reject_inverted_date_range() {
    let (engine, _db) = engine_with_db().await;
    funded_account(&engine, 0).await;

    let now = Utc::now();
    let filter = TransactionFilter {
        date_from: Some(now),
        date_to: Some(now - chrono::Duration::days(1)),
        ..Default::default()
    };
    let err = engine
        .transactions("alice", &filter, 1, 20)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("invalid range: date_from must be <= date_to".to_string())
    );
}
