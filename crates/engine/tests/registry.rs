mod common;

use chrono::NaiveDate;

use engine::{
    CategoryKind, CategoryUpdate, Currency, EngineError, NewTransactionCmd, NewWalletCmd,
    ProfileUpdate, RegisterCmd, WalletUpdate,
};

use common::{category, engine_with_db, money, register, wallet};

#[tokio::test]
async fn register_applies_defaults_and_normalizes_email() {
    let (engine, _db) = engine_with_db().await;

    let account = register(&engine, "  Alice  ", "Alice@Example.COM").await;

    assert_eq!(account.name, "Alice");
    assert_eq!(account.email, "alice@example.com");
    assert_eq!(account.currency, Currency::default());
    assert_eq!(account.timezone, "Asia/Jakarta");
    assert_eq!(account.profile_image_url, None);
    assert_eq!(engine.account(account.id).await.unwrap(), account);
}

#[tokio::test]
async fn duplicate_email_is_conflict_and_first_account_survives() {
    let (engine, _db) = engine_with_db().await;
    let first = register(&engine, "Alice", "alice@example.com").await;

    let err = engine
        .register(RegisterCmd {
            name: "Impostor".to_string(),
            email: "ALICE@example.com".to_string(),
            password: "another-pass".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let still = engine
        .authenticate("alice@example.com", "password123")
        .await
        .unwrap();
    assert_eq!(still, first);
}

#[tokio::test]
async fn register_rejects_bad_input() {
    let (engine, _db) = engine_with_db().await;

    for (name, email, password) in [
        ("Al", "al@example.com", "password123"),
        ("Alice", "not-an-email", "password123"),
        ("Alice", "alice@example.com", "short"),
    ] {
        let err = engine
            .register(RegisterCmd {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)), "{err:?}");
    }
}

#[tokio::test]
async fn authenticate_hides_which_part_was_wrong() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "Alice", "alice@example.com").await;

    let wrong_password = engine
        .authenticate("alice@example.com", "nope-nope")
        .await
        .unwrap_err();
    let unknown_email = engine
        .authenticate("nobody@example.com", "password123")
        .await
        .unwrap_err();

    assert_eq!(wrong_password, unknown_email);
    assert!(matches!(wrong_password, EngineError::Unauthorized(_)));
}

#[tokio::test]
async fn profile_update_touches_only_present_fields() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    let updated = engine
        .update_profile(
            alice.id,
            ProfileUpdate {
                currency: Some("usd".to_string()),
                profile_image_url: Some(Some("https://img.example.com/a.png".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Alice");
    assert_eq!(updated.currency.code(), "USD");
    assert_eq!(
        updated.profile_image_url.as_deref(),
        Some("https://img.example.com/a.png")
    );

    let cleared = engine
        .update_profile(
            alice.id,
            ProfileUpdate {
                profile_image_url: Some(None),
                timezone: Some("Europe/Rome".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.profile_image_url, None);
    assert_eq!(cleared.timezone, "Europe/Rome");
    assert_eq!(cleared.currency.code(), "USD");

    let err = engine
        .update_profile(
            alice.id,
            ProfileUpdate {
                timezone: Some("Mars/Olympus".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn change_password_requires_current_one() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    let err = engine
        .change_password(alice.id, "wrong-password", "brand-new-pass")
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)));

    engine
        .change_password(alice.id, "password123", "brand-new-pass")
        .await
        .unwrap();
    assert!(
        engine
            .authenticate("alice@example.com", "password123")
            .await
            .is_err()
    );
    engine
        .authenticate("alice@example.com", "brand-new-pass")
        .await
        .unwrap();
}

#[tokio::test]
async fn wallet_lifecycle() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    let bca = engine
        .new_wallet(
            NewWalletCmd::new(alice.id, "BCA Savings")
                .bank_name("BCA")
                .opening_balance(money("100000")),
        )
        .await
        .unwrap();
    assert_eq!(bca.currency.code(), "IDR");
    assert_eq!(bca.bank_name.as_deref(), Some("BCA"));
    assert_eq!(bca.balance, money("100000.00"));

    let usd = engine
        .new_wallet(NewWalletCmd::new(alice.id, "Travel").currency("usd"))
        .await
        .unwrap();
    assert_eq!(usd.currency.code(), "USD");
    assert_eq!(usd.balance, money("0"));

    let err = engine
        .new_wallet(NewWalletCmd::new(alice.id, "bca savings"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let renamed = engine
        .update_wallet(
            alice.id,
            bca.id,
            WalletUpdate {
                name: Some("Main account".to_string()),
                bank_name: Some(None),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Main account");
    assert_eq!(renamed.bank_name, None);
    assert_eq!(renamed.balance, bca.balance);

    let listed = engine.wallets(alice.id).await.unwrap();
    let names: Vec<&str> = listed.iter().map(|w| w.name.as_str()).collect();
    assert_eq!(names, vec!["Main account", "Travel"]);

    engine.delete_wallet(alice.id, usd.id).await.unwrap();
    let err = engine.wallet(alice.id, usd.id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound(_)));
}

#[tokio::test]
async fn wallets_are_scoped_to_their_account() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let bob = register(&engine, "Bob", "bob@example.com").await;
    let bob_wallet = wallet(&engine, bob.id, "Wallet", "10").await;

    // Same name is fine across accounts.
    wallet(&engine, alice.id, "Wallet", "0").await;

    assert!(matches!(
        engine.wallet(alice.id, bob_wallet.id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
    assert!(matches!(
        engine
            .update_wallet(alice.id, bob_wallet.id, WalletUpdate::default())
            .await
            .unwrap_err(),
        EngineError::NotFound(_)
    ));
    assert!(matches!(
        engine.delete_wallet(alice.id, bob_wallet.id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
    assert_eq!(engine.wallets(bob.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn referenced_wallet_and_category_cannot_be_deleted() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let cash = wallet(&engine, alice.id, "Cash", "0").await;
    let food = category(&engine, alice.id, "Food", CategoryKind::Expense).await;
    let unused = category(&engine, alice.id, "Unused", CategoryKind::Expense).await;

    engine
        .create_transaction(NewTransactionCmd {
            account_id: alice.id,
            wallet_id: cash.id,
            category_id: food.id,
            amount: money("1"),
            description: None,
            transaction_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        })
        .await
        .unwrap();

    assert!(matches!(
        engine.delete_category(alice.id, food.id).await.unwrap_err(),
        EngineError::Conflict(_)
    ));
    assert!(matches!(
        engine.delete_wallet(alice.id, cash.id).await.unwrap_err(),
        EngineError::Conflict(_)
    ));

    engine.delete_category(alice.id, unused.id).await.unwrap();
    assert!(matches!(
        engine.category(alice.id, unused.id).await.unwrap_err(),
        EngineError::NotFound(_)
    ));
    assert!(engine.category(alice.id, food.id).await.is_ok());
}

#[tokio::test]
async fn category_names_are_unique_per_kind() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    category(&engine, alice.id, "Bonus", CategoryKind::Income).await;
    let err = engine
        .new_category(alice.id, "BONUS", CategoryKind::Income)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // The same label may exist once per kind.
    category(&engine, alice.id, "Bonus", CategoryKind::Expense).await;

    let err = engine
        .new_category(alice.id, "ab", CategoryKind::Income)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn categories_list_filters_by_kind() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    category(&engine, alice.id, "Salary", CategoryKind::Income).await;
    category(&engine, alice.id, "Food", CategoryKind::Expense).await;
    category(&engine, alice.id, "Rent", CategoryKind::Expense).await;

    assert_eq!(engine.categories(alice.id, None).await.unwrap().len(), 3);
    let expenses = engine
        .categories(alice.id, Some(CategoryKind::Expense))
        .await
        .unwrap();
    let names: Vec<&str> = expenses.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Food", "Rent"]);
}

#[tokio::test]
async fn category_kind_is_frozen_once_used() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;
    let cash = wallet(&engine, alice.id, "Cash", "0").await;
    let gift = category(&engine, alice.id, "Gift", CategoryKind::Expense).await;

    let flipped = engine
        .update_category(
            alice.id,
            gift.id,
            CategoryUpdate {
                kind: Some(CategoryKind::Income),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(flipped.kind, CategoryKind::Income);

    engine
        .create_transaction(NewTransactionCmd {
            account_id: alice.id,
            wallet_id: cash.id,
            category_id: gift.id,
            amount: money("5"),
            description: None,
            transaction_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
        })
        .await
        .unwrap();

    let err = engine
        .update_category(
            alice.id,
            gift.id,
            CategoryUpdate {
                kind: Some(CategoryKind::Expense),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let renamed = engine
        .update_category(
            alice.id,
            gift.id,
            CategoryUpdate {
                name: Some("Gifts received".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Gifts received");
    assert_eq!(renamed.kind, CategoryKind::Income);
}

#[tokio::test]
async fn wallet_names_fold_non_ascii_case() {
    let (engine, _db) = engine_with_db().await;
    let alice = register(&engine, "Alice", "alice@example.com").await;

    let gold = wallet(&engine, alice.id, "Émas", "0").await;
    for duplicate in ["Émas", "émas", "ÉMAS"] {
        let err = engine
            .new_wallet(NewWalletCmd::new(alice.id, duplicate))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Conflict(_)), "{duplicate}: {err:?}");
    }

    let savings = wallet(&engine, alice.id, "Ötzi savings", "0").await;
    let err = engine
        .update_wallet(
            alice.id,
            savings.id,
            WalletUpdate {
                name: Some("éMAS".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Renaming to a different casing of its own name is allowed.
    let renamed = engine
        .update_wallet(
            alice.id,
            gold.id,
            WalletUpdate {
                name: Some("ÉMAS".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "ÉMAS");
    assert_eq!(engine.wallets(alice.id).await.unwrap().len(), 2);
}
