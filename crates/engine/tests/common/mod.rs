#![allow(dead_code)]

use std::path::PathBuf;

use sea_orm::{Database, DatabaseConnection};

use engine::{Account, Category, CategoryKind, Engine, Money, NewWalletCmd, RegisterCmd, Wallet};
use migration::MigratorTrait;
use uuid::Uuid;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();
    (engine, db)
}

/// A file-backed database, so the pool can hand out more than one connection.
pub async fn engine_with_file_db() -> (Engine, DatabaseConnection, PathBuf) {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_dbs");
    std::fs::create_dir_all(&root).unwrap();

    let path = root.join(format!("engine_{}.db", Uuid::new_v4()));
    let url = format!("sqlite:{}?mode=rwc", path.display());

    let db = Database::connect(&url).await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .password_cost(4)
        .build()
        .await
        .unwrap();

    (engine, db, path)
}

pub async fn register(engine: &Engine, name: &str, email: &str) -> Account {
    engine
        .register(RegisterCmd {
            name: name.to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap()
}

pub async fn wallet(engine: &Engine, account_id: i64, name: &str, opening: &str) -> Wallet {
    engine
        .new_wallet(
            NewWalletCmd::new(account_id, name).opening_balance(opening.parse::<Money>().unwrap()),
        )
        .await
        .unwrap()
}

pub async fn category(
    engine: &Engine,
    account_id: i64,
    name: &str,
    kind: CategoryKind,
) -> Category {
    engine.new_category(account_id, name, kind).await.unwrap()
}

pub fn money(value: &str) -> Money {
    value.parse().unwrap()
}
