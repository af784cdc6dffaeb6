use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};

use engine::{
    Engine, EngineError, LedgerEvent, LedgerNotifier, NewBudgetCmd, NewTransactionCmd,
    TransactionKind, UpdateTransactionCmd,
};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    add_user(&db, "alice", "UTC").await;
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

async fn engine_with_notifier() -> (Engine, DatabaseConnection, Arc<RecordingNotifier>) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    add_user(&db, "alice", "UTC").await;
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = Engine::builder()
        .database(db.clone())
        .notifier(notifier.clone())
        .build()
        .await
        .unwrap();
    (engine, db, notifier)
}

async fn add_user(db: &DatabaseConnection, username: &str, timezone: &str) {
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "INSERT INTO users (username, password, timezone) VALUES (?, ?, ?)",
        vec![username.into(), "password".into(), timezone.into()],
    ))
    .await
    .unwrap();
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Debug, Default)]
struct RecordingNotifier {
    events: Mutex<Vec<LedgerEvent>>,
}

impl RecordingNotifier {
    fn take(&self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events.lock().unwrap())
    }
}

impl LedgerNotifier for RecordingNotifier {
    fn ledger_updated(&self, event: &LedgerEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

#[tokio::test]
async fn linked_expense_tracks_budget_through_update_and_delete() {
    let (engine, _db) = engine_with_db().await;

    let budget_id = engine
        .create_budget(NewBudgetCmd::new("alice", "Groceries", 10_000))
        .await
        .unwrap();

    let tx_id = engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Expense, 500, day(2026, 3, 9))
                .budget_id(budget_id),
        )
        .await
        .unwrap();
    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 500);

    engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx_id).amount_minor(300))
        .await
        .unwrap();
    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 300);

    engine.delete_transaction("alice", tx_id).await.unwrap();
    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 0);
}

#[tokio::test]
async fn savings_funds_goal_and_delete_refunds() {
    let (engine, _db) = engine_with_db().await;

    let goal_id = engine
        .create_goal("alice", "New bike", 100_000)
        .await
        .unwrap();
    engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Savings, 100, day(2026, 3, 1))
                .goal_id(goal_id),
        )
        .await
        .unwrap();

    let second = engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Savings, 200, day(2026, 3, 2))
                .goal_id(goal_id),
        )
        .await
        .unwrap();
    let goal = engine.goal("alice", goal_id).await.unwrap();
    assert_eq!(goal.current_amount_minor, 300);

    engine.delete_transaction("alice", second).await.unwrap();
    let goal = engine.goal("alice", goal_id).await.unwrap();
    assert_eq!(goal.current_amount_minor, 100);
}

#[tokio::test]
async fn unlinked_expense_charges_every_matching_budget() {
    let (engine, _db) = engine_with_db().await;

    let food = engine.create_category("alice", "Food").await.unwrap();
    let travel = engine.create_category("alice", "Travel").await.unwrap();

    let catch_all = engine
        .create_budget(NewBudgetCmd::new("alice", "Everything", 50_000))
        .await
        .unwrap();
    let food_budget = engine
        .create_budget(NewBudgetCmd::new("alice", "Food", 20_000).category_id(food))
        .await
        .unwrap();
    let travel_budget = engine
        .create_budget(NewBudgetCmd::new("alice", "Travel", 20_000).category_id(travel))
        .await
        .unwrap();

    engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Expense, 500, day(2026, 3, 9))
                .category_id(food),
        )
        .await
        .unwrap();

    let catch_all = engine.budget("alice", catch_all).await.unwrap();
    assert_eq!(catch_all.current_spent_minor, 500);
    let food_budget = engine.budget("alice", food_budget).await.unwrap();
    assert_eq!(food_budget.current_spent_minor, 500);
    let travel_budget = engine.budget("alice", travel_budget).await.unwrap();
    assert_eq!(travel_budget.current_spent_minor, 0);
}

#[tokio::test]
async fn budget_window_excludes_out_of_range_expenses() {
    let (engine, _db) = engine_with_db().await;

    let march = engine
        .create_budget(
            NewBudgetCmd::new("alice", "March", 10_000)
                .window(day(2026, 3, 1), day(2026, 3, 31)),
        )
        .await
        .unwrap();

    engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            400,
            day(2026, 3, 15),
        ))
        .await
        .unwrap();
    engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            999,
            day(2026, 4, 2),
        ))
        .await
        .unwrap();

    let march = engine.budget("alice", march).await.unwrap();
    assert_eq!(march.current_spent_minor, 400);
}

#[tokio::test]
async fn archived_budget_skips_matching_but_honors_explicit_link() {
    let (engine, _db) = engine_with_db().await;

    let budget_id = engine
        .create_budget(NewBudgetCmd::new("alice", "Old envelope", 10_000))
        .await
        .unwrap();
    engine.archive_budget("alice", budget_id).await.unwrap();

    engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            500,
            day(2026, 3, 9),
        ))
        .await
        .unwrap();
    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 0);

    engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Expense, 250, day(2026, 3, 9))
                .budget_id(budget_id),
        )
        .await
        .unwrap();
    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 250);
}

#[tokio::test]
async fn deleting_expense_older_than_budget_floors_at_zero() {
    let (engine, _db) = engine_with_db().await;

    let tx_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            500,
            day(2026, 3, 9),
        ))
        .await
        .unwrap();

    // The budget appears after the expense, so its total never saw the +500.
    let budget_id = engine
        .create_budget(NewBudgetCmd::new("alice", "Late envelope", 10_000))
        .await
        .unwrap();

    engine.delete_transaction("alice", tx_id).await.unwrap();
    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 0);
}

#[tokio::test]
async fn goal_total_floors_at_zero_on_reversal() {
    let (engine, db) = engine_with_db().await;

    let goal_id = engine
        .create_goal("alice", "Emergency fund", 50_000)
        .await
        .unwrap();
    let tx_id = engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Savings, 200, day(2026, 3, 9))
                .goal_id(goal_id),
        )
        .await
        .unwrap();

    // Drift the stored total below the pending reversal.
    let backend = db.get_database_backend();
    db.execute(Statement::from_sql_and_values(
        backend,
        "UPDATE savings_goals SET current_amount_minor = ? WHERE id = ?",
        vec![50i64.into(), goal_id.to_string().into()],
    ))
    .await
    .unwrap();

    engine.delete_transaction("alice", tx_id).await.unwrap();
    let goal = engine.goal("alice", goal_id).await.unwrap();
    assert_eq!(goal.current_amount_minor, 0);
}

#[tokio::test]
async fn income_and_loan_leave_budgets_untouched() {
    let (engine, _db) = engine_with_db().await;

    let budget_id = engine
        .create_budget(NewBudgetCmd::new("alice", "Everything", 10_000))
        .await
        .unwrap();

    for kind in [
        TransactionKind::Income,
        TransactionKind::Loan,
        TransactionKind::Transfer,
    ] {
        engine
            .create_transaction(NewTransactionCmd::new("alice", kind, 1_000, day(2026, 3, 9)))
            .await
            .unwrap();
    }

    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 0);
    let txs = engine.list_transactions("alice", None).await.unwrap();
    assert_eq!(txs.len(), 3);
}

#[tokio::test]
async fn savings_without_goal_link_is_recorded_without_impact() {
    let (engine, _db, notifier) = engine_with_notifier().await;

    let tx_id = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Savings,
            200,
            day(2026, 3, 9),
        ))
        .await
        .unwrap();

    let tx = engine.transaction("alice", tx_id).await.unwrap();
    assert_eq!(tx.kind, TransactionKind::Savings);
    assert!(notifier.take().is_empty());
}

#[tokio::test]
async fn foreign_links_read_as_missing_and_leave_totals_alone() {
    let (engine, db) = engine_with_db().await;
    add_user(&db, "bob", "UTC").await;

    let bobs_budget = engine
        .create_budget(NewBudgetCmd::new("bob", "Bob's envelope", 10_000))
        .await
        .unwrap();

    let err = engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Expense, 500, day(2026, 3, 9))
                .budget_id(bobs_budget),
        )
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::KeyNotFound("budget not exists".to_string())
    );

    let budget = engine.budget("bob", bobs_budget).await.unwrap();
    assert_eq!(budget.current_spent_minor, 0);
    let txs = engine.list_transactions("alice", None).await.unwrap();
    assert!(txs.is_empty());
}

#[tokio::test]
async fn duplicate_idempotency_key_returns_existing_row() {
    let (engine, _db) = engine_with_db().await;

    let budget_id = engine
        .create_budget(NewBudgetCmd::new("alice", "Groceries", 10_000))
        .await
        .unwrap();
    let cmd = NewTransactionCmd::new("alice", TransactionKind::Expense, 500, day(2026, 3, 9))
        .budget_id(budget_id)
        .idempotency_key("weekly-shop-11");

    let first = engine.create_transaction(cmd.clone()).await.unwrap();
    let second = engine.create_transaction(cmd).await.unwrap();
    assert_eq!(first, second);

    let txs = engine.list_transactions("alice", None).await.unwrap();
    assert_eq!(txs.len(), 1);
    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 500);
}

#[tokio::test]
async fn notifier_fires_on_create_and_update_but_not_delete() {
    let (engine, _db, notifier) = engine_with_notifier().await;

    let goal_id = engine
        .create_goal("alice", "New bike", 100_000)
        .await
        .unwrap();
    let tx_id = engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Savings, 200, day(2026, 3, 9))
                .goal_id(goal_id),
        )
        .await
        .unwrap();
    assert_eq!(
        notifier.take(),
        vec![LedgerEvent::GoalFunded {
            goal_id,
            user_id: "alice".to_string(),
            current_minor: 200,
            target_minor: 100_000,
        }]
    );

    engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx_id).amount_minor(300))
        .await
        .unwrap();
    assert_eq!(
        notifier.take(),
        vec![
            LedgerEvent::GoalFunded {
                goal_id,
                user_id: "alice".to_string(),
                current_minor: 0,
                target_minor: 100_000,
            },
            LedgerEvent::GoalFunded {
                goal_id,
                user_id: "alice".to_string(),
                current_minor: 300,
                target_minor: 100_000,
            },
        ]
    );

    engine.delete_transaction("alice", tx_id).await.unwrap();
    assert!(notifier.take().is_empty());
    let goal = engine.goal("alice", goal_id).await.unwrap();
    assert_eq!(goal.current_amount_minor, 0);
}

#[tokio::test]
async fn kind_change_moves_impact_between_ledgers() {
    let (engine, _db) = engine_with_db().await;

    let goal_id = engine
        .create_goal("alice", "New bike", 100_000)
        .await
        .unwrap();
    let budget_id = engine
        .create_budget(NewBudgetCmd::new("alice", "Everything", 10_000))
        .await
        .unwrap();

    let tx_id = engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Savings, 200, day(2026, 3, 9))
                .goal_id(goal_id),
        )
        .await
        .unwrap();
    let goal = engine.goal("alice", goal_id).await.unwrap();
    assert_eq!(goal.current_amount_minor, 200);

    engine
        .update_transaction(
            UpdateTransactionCmd::new("alice", tx_id).kind(TransactionKind::Expense),
        )
        .await
        .unwrap();

    let goal = engine.goal("alice", goal_id).await.unwrap();
    assert_eq!(goal.current_amount_minor, 0);
    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 200);
}

#[tokio::test]
async fn non_positive_amounts_are_rejected() {
    let (engine, _db) = engine_with_db().await;

    let budget_id = engine
        .create_budget(NewBudgetCmd::new("alice", "Groceries", 10_000))
        .await
        .unwrap();

    let err = engine
        .create_transaction(NewTransactionCmd::new(
            "alice",
            TransactionKind::Expense,
            0,
            day(2026, 3, 9),
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let tx_id = engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Expense, 500, day(2026, 3, 9))
                .budget_id(budget_id),
        )
        .await
        .unwrap();
    let err = engine
        .update_transaction(UpdateTransactionCmd::new("alice", tx_id).amount_minor(-5))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let budget = engine.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 500);
}

#[tokio::test]
async fn budget_validation_rejects_bad_inputs() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .create_budget(NewBudgetCmd::new("alice", "Zero", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidAmount(_)));

    let err = engine
        .create_budget(
            NewBudgetCmd::new("alice", "Backwards", 1_000)
                .window(day(2026, 3, 31), day(2026, 3, 1)),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidDate(_)));
}

#[tokio::test]
async fn category_names_deduplicate_after_normalization() {
    let (engine, _db) = engine_with_db().await;

    engine.create_category("alice", "Food").await.unwrap();
    let err = engine
        .create_category("alice", "  FOOD  ")
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("FOOD".to_string()));

    let categories = engine.list_categories("alice").await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Food");
}

#[tokio::test]
async fn restart_engine_reads_same_totals() {
    let root =
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();
    let path = root.join(format!("engine_{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    add_user(&db, "alice", "UTC").await;
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();

    let budget_id = engine
        .create_budget(NewBudgetCmd::new("alice", "Groceries", 10_000))
        .await
        .unwrap();
    engine
        .create_transaction(
            NewTransactionCmd::new("alice", TransactionKind::Expense, 750, day(2026, 3, 9))
                .budget_id(budget_id),
        )
        .await
        .unwrap();

    drop(engine);
    drop(db);

    let db2 = Database::connect(&url).await.unwrap();
    let engine2 = Engine::builder()
        .database(db2.clone())
        .build()
        .await
        .unwrap();

    let budget = engine2.budget("alice", budget_id).await.unwrap();
    assert_eq!(budget.current_spent_minor, 750);

    drop(db2);
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn transactions_list_newest_occurrence_first() {
    let (engine, _db) = engine_with_db().await;

    for (amount, date) in [
        (100, day(2026, 3, 1)),
        (300, day(2026, 3, 20)),
        (200, day(2026, 3, 10)),
    ] {
        engine
            .create_transaction(NewTransactionCmd::new(
                "alice",
                TransactionKind::Expense,
                amount,
                date,
            ))
            .await
            .unwrap();
    }

    let txs = engine.list_transactions("alice", None).await.unwrap();
    let amounts: Vec<i64> = txs.iter().map(|tx| tx.amount_minor).collect();
    assert_eq!(amounts, vec![300, 200, 100]);

    let limited = engine.list_transactions("alice", Some(2)).await.unwrap();
    assert_eq!(limited.len(), 2);
}
