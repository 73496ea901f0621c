use chrono::{Local, NaiveDate};
use engine::{CategoryKind, Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::Database;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn register(engine: &Engine, email: &str) -> i32 {
    engine
        .register_user(email, "Ada", "Lovelace", "hash")
        .await
        .unwrap()
        .id
}

async fn category(engine: &Engine, owner: i32, name: &str, kind: CategoryKind) -> i32 {
    engine
        .create_category(owner, name, kind)
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn dashboard_is_empty_for_a_fresh_user() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;

    let summary = engine.dashboard_summary(alice).await.unwrap();
    assert_eq!(summary.total_income, 0.0);
    assert_eq!(summary.total_expenses, 0.0);
    assert_eq!(summary.net_balance, 0.0);
    assert!(summary.top_income_category.is_none());
    assert!(summary.top_expense_category.is_none());
}

#[tokio::test]
async fn dashboard_sums_by_kind_and_picks_top_categories() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let salary = category(&engine, alice, "Salary", CategoryKind::Income).await;
    let food = category(&engine, alice, "Food", CategoryKind::Expense).await;
    let rent = category(&engine, alice, "Rent", CategoryKind::Expense).await;
    let today = Local::now().date_naive();

    engine
        .create_expense(alice, salary, 1500.0, "january", today)
        .await
        .unwrap();
    engine
        .create_expense(alice, food, 60.0, "groceries", today)
        .await
        .unwrap();
    engine
        .create_expense(alice, rent, 500.0, "january", today)
        .await
        .unwrap();

    let summary = engine.dashboard_summary(alice).await.unwrap();
    assert_eq!(summary.total_income, 1500.0);
    assert_eq!(summary.total_expenses, 560.0);
    assert_eq!(summary.net_balance, 940.0);
    assert_eq!(summary.top_income_category.as_deref(), Some("Salary"));
    assert_eq!(summary.top_expense_category.as_deref(), Some("Rent"));
}

#[tokio::test]
async fn dashboard_ignores_other_users() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let bob = register(&engine, "bob@x.com").await;
    let bob_salary = category(&engine, bob, "Salary", CategoryKind::Income).await;
    let today = Local::now().date_naive();

    engine
        .create_expense(bob, bob_salary, 9000.0, "bonus", today)
        .await
        .unwrap();

    let summary = engine.dashboard_summary(alice).await.unwrap();
    assert_eq!(summary.total_income, 0.0);
    assert!(summary.top_income_category.is_none());
}

#[tokio::test]
async fn breakdown_excludes_categories_without_expenses() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let food = category(&engine, alice, "Food", CategoryKind::Expense).await;
    let _empty = category(&engine, alice, "Travel", CategoryKind::Expense).await;
    let today = Local::now().date_naive();

    engine
        .create_expense(alice, food, 50.0, "lunch", today)
        .await
        .unwrap();

    let rows = engine.category_breakdown(alice).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_name, "Food");
}

#[tokio::test]
async fn breakdown_aggregates_and_sorts_by_total_descending() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let food = category(&engine, alice, "Food", CategoryKind::Expense).await;
    let rent = category(&engine, alice, "Rent", CategoryKind::Expense).await;
    let today = Local::now().date_naive();

    for amount in [10.0, 20.0, 30.0] {
        engine
            .create_expense(alice, food, amount, "meal", today)
            .await
            .unwrap();
    }
    engine
        .create_expense(alice, rent, 500.0, "january", today)
        .await
        .unwrap();

    let rows = engine.category_breakdown(alice).await.unwrap();
    assert_eq!(rows.len(), 2);

    assert_eq!(rows[0].category_name, "Rent");
    assert_eq!(rows[0].total_amount, 500.0);
    assert_eq!(rows[0].transaction_count, 1);

    assert_eq!(rows[1].category_name, "Food");
    assert_eq!(rows[1].category_id, food);
    assert_eq!(rows[1].category_kind, CategoryKind::Expense);
    assert_eq!(rows[1].total_amount, 60.0);
    assert_eq!(rows[1].transaction_count, 3);
}

#[tokio::test]
async fn registered_user_single_expense_scenario() {
    let engine = engine_with_db().await;
    let user = register(&engine, "a@x.com").await;
    let food = category(&engine, user, "Food", CategoryKind::Expense).await;
    let today = Local::now().date_naive();

    engine
        .create_expense(user, food, 50.0, "lunch", today)
        .await
        .unwrap();

    let rows = engine.category_breakdown(user).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category_name, "Food");
    assert_eq!(rows[0].total_amount, 50.0);
    assert_eq!(rows[0].transaction_count, 1);
}

#[tokio::test]
async fn monthly_merges_kinds_per_month() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let salary = category(&engine, alice, "Salary", CategoryKind::Income).await;
    let food = category(&engine, alice, "Food", CategoryKind::Expense).await;

    let date = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
    // March has both kinds, February only an expense, January only income.
    engine
        .create_expense(alice, salary, 1000.0, "january", date(2025, 1, 15))
        .await
        .unwrap();
    engine
        .create_expense(alice, food, 200.0, "meals", date(2025, 2, 10))
        .await
        .unwrap();
    engine
        .create_expense(alice, salary, 500.0, "march", date(2025, 3, 5))
        .await
        .unwrap();
    engine
        .create_expense(alice, food, 100.0, "meals", date(2025, 3, 20))
        .await
        .unwrap();

    let buckets = engine.monthly_summary(alice, 6).await.unwrap();
    let months: Vec<_> = buckets.iter().map(|b| b.month.as_str()).collect();
    assert_eq!(months, ["2025-03", "2025-02", "2025-01"]);

    assert_eq!(buckets[0].total_income, 500.0);
    assert_eq!(buckets[0].total_expenses, 100.0);
    assert_eq!(buckets[0].net_balance, 400.0);

    assert_eq!(buckets[1].total_income, 0.0);
    assert_eq!(buckets[1].total_expenses, 200.0);
    assert_eq!(buckets[1].net_balance, -200.0);

    assert_eq!(buckets[2].total_income, 1000.0);
    assert_eq!(buckets[2].total_expenses, 0.0);
    assert_eq!(buckets[2].net_balance, 1000.0);
}

#[tokio::test]
async fn monthly_caps_distinct_month_buckets_not_rows() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let salary = category(&engine, alice, "Salary", CategoryKind::Income).await;
    let food = category(&engine, alice, "Food", CategoryKind::Expense).await;

    let date = |m, d| NaiveDate::from_ymd_opt(2025, m, d).unwrap();
    // Four months, each with a single kind: a raw-row cap of months*2 would
    // return them all, the bucket cap must stop at three.
    engine
        .create_expense(alice, salary, 100.0, "one", date(1, 1))
        .await
        .unwrap();
    engine
        .create_expense(alice, food, 200.0, "two", date(2, 1))
        .await
        .unwrap();
    engine
        .create_expense(alice, salary, 300.0, "three", date(3, 1))
        .await
        .unwrap();
    engine
        .create_expense(alice, food, 400.0, "four", date(4, 1))
        .await
        .unwrap();

    let buckets = engine.monthly_summary(alice, 3).await.unwrap();
    let months: Vec<_> = buckets.iter().map(|b| b.month.as_str()).collect();
    assert_eq!(months, ["2025-04", "2025-03", "2025-02"]);

    assert_eq!(buckets[0].total_expenses, 400.0);
    assert_eq!(buckets[0].total_income, 0.0);
    assert_eq!(buckets[1].total_income, 300.0);
    assert_eq!(buckets[2].total_expenses, 200.0);
}

#[tokio::test]
async fn monthly_rejects_out_of_range_months() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;

    for months in [0, 13] {
        let err = engine.monthly_summary(alice, months).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidAmount(_)));
    }
}
