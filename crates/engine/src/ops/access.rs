use sea_orm::{DatabaseTransaction, PaginatorTrait, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, accounts, categories, transactions, wallets};

use super::Engine;

/// Generates a `require_*` lookup that only matches rows owned by the given
/// account. A row owned by another account yields the same `NotFound` as a
/// missing one.
macro_rules! impl_owned_lookup {
    ($require_fn:ident, $entity:path, $model:path, $account_col:expr, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            account_id: i64,
            id: i64,
        ) -> ResultEngine<$model> {
            <$entity>::find_by_id(id)
                .filter($account_col.eq(account_id))
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound($err_msg.to_string()))
        }
    };
}

impl Engine {
    impl_owned_lookup!(
        require_wallet,
        wallets::Entity,
        wallets::Model,
        wallets::Column::AccountId,
        "wallet not exists"
    );

    impl_owned_lookup!(
        require_category,
        categories::Entity,
        categories::Model,
        categories::Column::AccountId,
        "category not exists"
    );

    pub(super) async fn require_account(
        &self,
        db: &DatabaseTransaction,
        account_id: i64,
    ) -> ResultEngine<accounts::Model> {
        accounts::Entity::find_by_id(account_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("account not exists".to_string()))
    }

    /// Number of transactions whose `column` points at `id`.
    pub(super) async fn transactions_referencing(
        &self,
        db: &DatabaseTransaction,
        column: transactions::Column,
        id: i64,
    ) -> ResultEngine<u64> {
        transactions::Entity::find()
            .filter(column.eq(id))
            .count(db)
            .await
            .map_err(Into::into)
    }
}
