//! The ledger: recording a transaction and moving its wallet balance as one
//! unit of work.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    CategoryKind, CategorySnapshot, EngineError, LedgerEntry, NewTransactionCmd, ResultEngine,
    Transaction, TransactionListFilter, Wallet, WalletSnapshot, categories, transactions,
    util::normalize_optional_text, wallets,
};

use super::{Engine, with_tx};

/// What `create_transaction` hands back: the stored entry and the wallet
/// after the balance moved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerReceipt {
    pub transaction: Transaction,
    pub wallet: Wallet,
}

impl Engine {
    /// Records an income or expense against a wallet and applies it to the
    /// wallet balance.
    ///
    /// The kind is taken from the category. Either both the transaction row
    /// and the new balance are stored, or neither is. Concurrent calls on the
    /// same wallet are serialized by the storage row lock taken as the first
    /// statement of the unit of work.
    pub async fn create_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<LedgerReceipt> {
        if !cmd.amount.is_positive() {
            return Err(EngineError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }

        self.record_transaction(cmd)
            .await
            .map_err(EngineError::into_ledger_failure)
    }

    async fn record_transaction(&self, cmd: NewTransactionCmd) -> ResultEngine<LedgerReceipt> {
        let description = normalize_optional_text(cmd.description.as_deref());

        with_tx!(self, |db_tx| {
            let now = Utc::now();
            self.lock_wallet(&db_tx, cmd.account_id, cmd.wallet_id, now)
                .await?;

            let wallet = self
                .require_wallet(&db_tx, cmd.account_id, cmd.wallet_id)
                .await?;
            let category = self
                .require_category(&db_tx, cmd.account_id, cmd.category_id)
                .await?;
            let kind = CategoryKind::try_from(category.kind.as_str())?;

            let model = transactions::ActiveModel {
                account_id: ActiveValue::Set(cmd.account_id),
                wallet_id: ActiveValue::Set(wallet.id),
                category_id: ActiveValue::Set(category.id),
                amount_minor: ActiveValue::Set(cmd.amount.minor()),
                kind: ActiveValue::Set(kind.as_str().to_string()),
                description: ActiveValue::Set(description),
                transaction_date: ActiveValue::Set(cmd.transaction_date),
                created_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(&db_tx)
            .await?;
            let transaction = Transaction::try_from(model)?;

            let current = Wallet::try_from(wallet.clone())?.balance;
            let balance = current
                .checked_add(transaction.signed_amount())
                .ok_or_else(|| {
                    EngineError::Validation("wallet balance out of range".to_string())
                })?;

            let mut active: wallets::ActiveModel = wallet.into();
            active.balance_minor = ActiveValue::Set(balance.minor());
            active.updated_at = ActiveValue::Set(now);
            let wallet = Wallet::try_from(active.update(&db_tx).await?)?;

            tracing::debug!(
                "transaction {} moved wallet {} from {} to {}",
                transaction.id,
                wallet.id,
                current,
                wallet.balance
            );
            Ok(LedgerReceipt {
                transaction,
                wallet,
            })
        })
    }

    /// Takes the write lock on the wallet row before anything reads it.
    ///
    /// A wallet of another account matches no row and is reported exactly like
    /// a missing one.
    async fn lock_wallet(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: i64,
        wallet_id: i64,
        now: chrono::DateTime<Utc>,
    ) -> ResultEngine<()> {
        let res = wallets::Entity::update_many()
            .col_expr(wallets::Column::UpdatedAt, Expr::value(now))
            .filter(wallets::Column::Id.eq(wallet_id))
            .filter(wallets::Column::AccountId.eq(account_id))
            .exec(db_tx)
            .await?;
        if res.rows_affected == 0 {
            return Err(EngineError::NotFound("wallet not exists".to_string()));
        }
        Ok(())
    }

    /// Lists an account's transactions, newest first.
    ///
    /// Ties on `transaction_date` are broken by id, newest first.
    pub async fn list_transactions(
        &self,
        account_id: i64,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<LedgerEntry>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if from > to {
                return Err(EngineError::Validation(
                    "'from' must not be after 'to'".to_string(),
                ));
            }
        }

        with_tx!(self, |db_tx| {
            let mut query = transactions::Entity::find()
                .filter(transactions::Column::AccountId.eq(account_id));
            if let Some(wallet_id) = filter.wallet_id {
                query = query.filter(transactions::Column::WalletId.eq(wallet_id));
            }
            if let Some(category_id) = filter.category_id {
                query = query.filter(transactions::Column::CategoryId.eq(category_id));
            }
            if let Some(kind) = filter.kind {
                query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
            }
            if let Some(from) = filter.from {
                query = query.filter(transactions::Column::TransactionDate.gte(from));
            }
            if let Some(to) = filter.to {
                query = query.filter(transactions::Column::TransactionDate.lte(to));
            }
            let rows = query
                .order_by_desc(transactions::Column::TransactionDate)
                .order_by_desc(transactions::Column::Id)
                .all(&db_tx)
                .await?;

            let wallets: HashMap<i64, WalletSnapshot> = wallets::Entity::find()
                .filter(wallets::Column::AccountId.eq(account_id))
                .all(&db_tx)
                .await?
                .into_iter()
                .map(|w| {
                    (
                        w.id,
                        WalletSnapshot {
                            id: w.id,
                            name: w.name,
                            currency: w.currency,
                        },
                    )
                })
                .collect();
            let categories = self.category_snapshots(&db_tx, account_id).await?;

            rows.into_iter()
                .map(|row| {
                    let transaction = Transaction::try_from(row)?;
                    let wallet = wallets
                        .get(&transaction.wallet_id)
                        .cloned()
                        .ok_or_else(|| EngineError::NotFound("wallet not exists".to_string()))?;
                    let category = categories
                        .get(&transaction.category_id)
                        .cloned()
                        .ok_or_else(|| {
                            EngineError::NotFound("category not exists".to_string())
                        })?;
                    Ok(LedgerEntry {
                        transaction,
                        wallet,
                        category,
                    })
                })
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    async fn category_snapshots(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: i64,
    ) -> ResultEngine<HashMap<i64, CategorySnapshot>> {
        categories::Entity::find()
            .filter(categories::Column::AccountId.eq(account_id))
            .all(db_tx)
            .await?
            .into_iter()
            .map(|c| {
                let kind = CategoryKind::try_from(c.kind.as_str())?;
                Ok((
                    c.id,
                    CategorySnapshot {
                        id: c.id,
                        name: c.name,
                        kind,
                    },
                ))
            })
            .collect()
    }
}
