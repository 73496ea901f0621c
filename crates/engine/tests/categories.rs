use chrono::Local;
use engine::{CategoryKind, CategoryPatch, Engine, EngineError};
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

#[tokio::test]
async fn create_and_get_round_trip() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;

    let created = engine
        .create_category(alice, "Food", CategoryKind::Expense)
        .await
        .unwrap();

    let fetched = engine.category(alice, created.id).await.unwrap();
    assert_eq!(fetched.name, "Food");
    assert_eq!(fetched.kind, "expense");
    assert_eq!(fetched.user_id, alice);
}

#[tokio::test]
async fn kind_string_must_be_income_or_expense() {
    let err = CategoryKind::try_from("food").unwrap_err();
    assert!(matches!(err, EngineError::InvalidKind(_)));

    assert_eq!(CategoryKind::try_from("income").unwrap(), CategoryKind::Income);
    assert_eq!(
        CategoryKind::try_from("expense").unwrap(),
        CategoryKind::Expense
    );
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;

    let err = engine
        .create_category(alice, "   ", CategoryKind::Expense)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn list_returns_only_own_categories() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let bob = register(&engine, "bob@x.com").await;

    engine
        .create_category(alice, "Food", CategoryKind::Expense)
        .await
        .unwrap();
    engine
        .create_category(bob, "Rent", CategoryKind::Expense)
        .await
        .unwrap();

    let listed = engine.list_categories(alice).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Food");
}

#[tokio::test]
async fn foreign_category_is_indistinguishable_from_missing() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let bob = register(&engine, "bob@x.com").await;

    let category = engine
        .create_category(alice, "Food", CategoryKind::Expense)
        .await
        .unwrap();

    let foreign = engine.category(bob, category.id).await.unwrap_err();
    let missing = engine.category(bob, 9999).await.unwrap_err();
    assert_eq!(foreign, missing);
}

#[tokio::test]
async fn update_applies_only_provided_fields() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let category = engine
        .create_category(alice, "Food", CategoryKind::Expense)
        .await
        .unwrap();

    let updated = engine
        .update_category(
            alice,
            category.id,
            CategoryPatch {
                name: Some("Groceries".to_string()),
                kind: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Groceries");
    assert_eq!(updated.kind, "expense");

    let updated = engine
        .update_category(
            alice,
            category.id,
            CategoryPatch {
                name: None,
                kind: Some(CategoryKind::Income),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Groceries");
    assert_eq!(updated.kind, "income");
}

#[tokio::test]
async fn update_rejects_empty_name_without_touching_the_row() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let category = engine
        .create_category(alice, "Food", CategoryKind::Expense)
        .await
        .unwrap();

    let err = engine
        .update_category(
            alice,
            category.id,
            CategoryPatch {
                name: Some("".to_string()),
                kind: Some(CategoryKind::Income),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));

    // The valid kind in the same patch must not have been applied.
    let unchanged = engine.category(alice, category.id).await.unwrap();
    assert_eq!(unchanged.kind, "expense");
}

#[tokio::test]
async fn update_of_foreign_category_is_not_found() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let bob = register(&engine, "bob@x.com").await;
    let category = engine
        .create_category(alice, "Food", CategoryKind::Expense)
        .await
        .unwrap();

    let err = engine
        .update_category(
            bob,
            category.id,
            CategoryPatch {
                name: Some("Stolen".to_string()),
                kind: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn delete_cascades_to_expenses() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let food = engine
        .create_category(alice, "Food", CategoryKind::Expense)
        .await
        .unwrap();
    let rent = engine
        .create_category(alice, "Rent", CategoryKind::Expense)
        .await
        .unwrap();

    let today = Local::now().date_naive();
    let mut doomed = Vec::new();
    for n in 1..=3 {
        let expense = engine
            .create_expense(alice, food.id, f64::from(n) * 10.0, "meal", today)
            .await
            .unwrap();
        doomed.push(expense.id);
    }
    let kept = engine
        .create_expense(alice, rent.id, 500.0, "rent", today)
        .await
        .unwrap();

    engine.delete_category(alice, food.id).await.unwrap();

    assert!(matches!(
        engine.category(alice, food.id).await.unwrap_err(),
        EngineError::KeyNotFound(_)
    ));
    for id in doomed {
        assert!(matches!(
            engine.expense(alice, id).await.unwrap_err(),
            EngineError::KeyNotFound(_)
        ));
    }
    // Expenses under other categories survive.
    assert!(engine.expense(alice, kept.id).await.is_ok());
}

#[tokio::test]
async fn delete_of_foreign_category_is_not_found() {
    let engine = engine_with_db().await;
    let alice = register(&engine, "alice@x.com").await;
    let bob = register(&engine, "bob@x.com").await;
    let category = engine
        .create_category(alice, "Food", CategoryKind::Expense)
        .await
        .unwrap();

    let err = engine.delete_category(bob, category.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
    assert!(engine.category(alice, category.id).await.is_ok());
}
