use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Category, CategoryKind, CategoryUpdate, EngineError, ResultEngine, categories, transactions,
    util::{name_key, normalize_required_name},
};

use super::{Engine, with_tx};

const IN_USE: &str = "category is referenced by transactions";

fn duplicate_name(name: &str, kind: CategoryKind) -> String {
    format!("{} category '{name}' already exists", kind.as_str())
}

/// Inserts the row; the unique `(account, kind, name_norm)` index is the last
/// word when two creations race past the name check.
async fn insert_category(
    db_tx: &DatabaseTransaction,
    account_id: i64,
    name: String,
    kind: CategoryKind,
) -> ResultEngine<categories::Model> {
    let conflict = duplicate_name(&name, kind);
    categories::ActiveModel {
        account_id: ActiveValue::Set(account_id),
        name_norm: ActiveValue::Set(name_key(&name)),
        name: ActiveValue::Set(name),
        kind: ActiveValue::Set(kind.as_str().to_string()),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db_tx)
    .await
    .map_err(|err| EngineError::from_constraint(err, &conflict))
}

impl Engine {
    async fn ensure_category_name_free(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: i64,
        name: &str,
        kind: CategoryKind,
        except: Option<i64>,
    ) -> ResultEngine<()> {
        let mut query = categories::Entity::find()
            .filter(categories::Column::AccountId.eq(account_id))
            .filter(categories::Column::Kind.eq(kind.as_str()))
            .filter(categories::Column::NameNorm.eq(name_key(name)));
        if let Some(id) = except {
            query = query.filter(categories::Column::Id.ne(id));
        }
        if query.one(db_tx).await?.is_some() {
            return Err(EngineError::Conflict(duplicate_name(name, kind)));
        }
        Ok(())
    }

    /// Creates an income or expense category.
    ///
    /// Names are unique per account and kind, compared case-insensitively.
    pub async fn new_category(
        &self,
        account_id: i64,
        name: &str,
        kind: CategoryKind,
    ) -> ResultEngine<Category> {
        let name = normalize_required_name(name, "category")?;

        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, account_id).await?;
            self.ensure_category_name_free(&db_tx, account_id, &name, kind, None)
                .await?;

            let model = insert_category(&db_tx, account_id, name, kind).await?;
            Category::try_from(model)
        })
    }

    /// Categories of an account, optionally restricted to one kind.
    pub async fn categories(
        &self,
        account_id: i64,
        kind: Option<CategoryKind>,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            let mut query =
                categories::Entity::find().filter(categories::Column::AccountId.eq(account_id));
            if let Some(kind) = kind {
                query = query.filter(categories::Column::Kind.eq(kind.as_str()));
            }
            query
                .order_by_asc(categories::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Category::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    pub async fn category(&self, account_id: i64, category_id: i64) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_category(&db_tx, account_id, category_id)
                .await?;
            Category::try_from(model)
        })
    }

    /// Renames a category or flips its kind.
    ///
    /// Changing the kind of a category already used by transactions would
    /// silently invert the meaning of recorded amounts, so it is a `Conflict`.
    pub async fn update_category(
        &self,
        account_id: i64,
        category_id: i64,
        update: CategoryUpdate,
    ) -> ResultEngine<Category> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "category"))
            .transpose()?;

        with_tx!(self, |db_tx| {
            let model = self
                .require_category(&db_tx, account_id, category_id)
                .await?;
            let current_kind = CategoryKind::try_from(model.kind.as_str())?;
            let kind = update.kind.unwrap_or(current_kind);

            if kind != current_kind
                && self
                    .transactions_referencing(&db_tx, transactions::Column::CategoryId, model.id)
                    .await?
                    > 0
            {
                return Err(EngineError::Conflict(IN_USE.to_string()));
            }
            if name.is_none() && kind == current_kind {
                return Category::try_from(model);
            }

            let final_name = name.unwrap_or_else(|| model.name.clone());
            self.ensure_category_name_free(&db_tx, account_id, &final_name, kind, Some(model.id))
                .await?;

            let conflict = duplicate_name(&final_name, kind);
            let mut active: categories::ActiveModel = model.into();
            active.name_norm = ActiveValue::Set(name_key(&final_name));
            active.name = ActiveValue::Set(final_name);
            active.kind = ActiveValue::Set(kind.as_str().to_string());
            let model = active
                .update(&db_tx)
                .await
                .map_err(|err| EngineError::from_constraint(err, &conflict))?;
            Category::try_from(model)
        })
    }

    /// Deletes a category no transaction refers to.
    pub async fn delete_category(&self, account_id: i64, category_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_category(&db_tx, account_id, category_id)
                .await?;
            if self
                .transactions_referencing(&db_tx, transactions::Column::CategoryId, model.id)
                .await?
                > 0
            {
                return Err(EngineError::Conflict(IN_USE.to_string()));
            }
            categories::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await
                .map_err(|err| EngineError::from_constraint(err, IN_USE))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use migration::MigratorTrait;
    use sea_orm::Database;

    use super::*;
    use crate::RegisterCmd;

    #[tokio::test]
    async fn duplicate_insert_hitting_unique_index_is_conflict() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder()
            .database(db.clone())
            .password_cost(4)
            .build()
            .await
            .unwrap();
        let account = engine
            .register(RegisterCmd {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();
        engine
            .new_category(account.id, "Food", CategoryKind::Expense)
            .await
            .unwrap();

        // Skips the name check, as the losing side of a race would.
        let db_tx = db.begin().await.unwrap();
        let err = insert_category(&db_tx, account.id, "FOOD".to_string(), CategoryKind::Expense)
            .await
            .unwrap_err();
        assert!(
            matches!(&err, EngineError::Conflict(msg) if msg == "expense category 'FOOD' already exists"),
            "{err:?}"
        );
    }
}
