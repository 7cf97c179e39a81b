use chrono::Utc;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};

use crate::{
    Currency, EngineError, NewWalletCmd, ResultEngine, Wallet, WalletUpdate, transactions,
    util::{name_key, normalize_optional_text, normalize_required_name},
    wallets,
};

use super::{Engine, with_tx};

fn duplicate_name(name: &str) -> String {
    format!("wallet '{name}' already exists")
}

impl Engine {
    async fn ensure_wallet_name_free(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: i64,
        name: &str,
        except: Option<i64>,
    ) -> ResultEngine<()> {
        let mut query = wallets::Entity::find()
            .filter(wallets::Column::AccountId.eq(account_id))
            .filter(wallets::Column::NameNorm.eq(name_key(name)));
        if let Some(id) = except {
            query = query.filter(wallets::Column::Id.ne(id));
        }
        if query.one(db_tx).await?.is_some() {
            return Err(EngineError::Conflict(duplicate_name(name)));
        }
        Ok(())
    }

    /// Add a new wallet for an account.
    ///
    /// The currency defaults to the account's preferred one. The opening
    /// balance is written as-is and may be negative.
    pub async fn new_wallet(&self, cmd: NewWalletCmd) -> ResultEngine<Wallet> {
        let name = normalize_required_name(&cmd.name, "wallet")?;
        let bank_name = normalize_optional_text(cmd.bank_name.as_deref());
        let currency = cmd
            .currency
            .as_deref()
            .map(Currency::try_from)
            .transpose()?;

        with_tx!(self, |db_tx| {
            let account = self.require_account(&db_tx, cmd.account_id).await?;
            self.ensure_wallet_name_free(&db_tx, cmd.account_id, &name, None)
                .await?;
            let currency = match currency {
                Some(currency) => currency,
                None => Currency::try_from(account.currency.as_str())?,
            };

            let now = Utc::now();
            let conflict = duplicate_name(&name);
            let model = wallets::ActiveModel {
                account_id: ActiveValue::Set(cmd.account_id),
                name_norm: ActiveValue::Set(name_key(&name)),
                name: ActiveValue::Set(name),
                bank_name: ActiveValue::Set(bank_name),
                currency: ActiveValue::Set(currency.code().to_string()),
                balance_minor: ActiveValue::Set(cmd.opening_balance.minor()),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(&db_tx)
            .await
            .map_err(|err| EngineError::from_constraint(err, &conflict))?;

            Wallet::try_from(model)
        })
    }

    /// All wallets of an account, oldest first.
    pub async fn wallets(&self, account_id: i64) -> ResultEngine<Vec<Wallet>> {
        with_tx!(self, |db_tx| {
            wallets::Entity::find()
                .filter(wallets::Column::AccountId.eq(account_id))
                .order_by_asc(wallets::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Wallet::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Return a wallet snapshot from DB.
    pub async fn wallet(&self, account_id: i64, wallet_id: i64) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, account_id, wallet_id).await?;
            Wallet::try_from(model)
        })
    }

    /// Renames a wallet and/or changes its bank label.
    ///
    /// The balance is owned by the ledger and cannot be edited here.
    pub async fn update_wallet(
        &self,
        account_id: i64,
        wallet_id: i64,
        update: WalletUpdate,
    ) -> ResultEngine<Wallet> {
        let name = update
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "wallet"))
            .transpose()?;
        let bank_name = update
            .bank_name
            .map(|bank| normalize_optional_text(bank.as_deref()));

        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, account_id, wallet_id).await?;
            if name.is_none() && bank_name.is_none() {
                return Wallet::try_from(model);
            }

            let mut active: wallets::ActiveModel = model.into();
            let conflict = name.as_deref().map(duplicate_name).unwrap_or_default();
            if let Some(name) = name {
                self.ensure_wallet_name_free(&db_tx, account_id, &name, Some(wallet_id))
                    .await?;
                active.name_norm = ActiveValue::Set(name_key(&name));
                active.name = ActiveValue::Set(name);
            }
            if let Some(bank_name) = bank_name {
                active.bank_name = ActiveValue::Set(bank_name);
            }
            active.updated_at = ActiveValue::Set(Utc::now());
            let model = active
                .update(&db_tx)
                .await
                .map_err(|err| EngineError::from_constraint(err, &conflict))?;
            Wallet::try_from(model)
        })
    }

    /// Deletes a wallet that no transaction points at.
    pub async fn delete_wallet(&self, account_id: i64, wallet_id: i64) -> ResultEngine<()> {
        const IN_USE: &str = "wallet is referenced by transactions";

        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, account_id, wallet_id).await?;
            if self
                .transactions_referencing(&db_tx, transactions::Column::WalletId, model.id)
                .await?
                > 0
            {
                return Err(EngineError::Conflict(IN_USE.to_string()));
            }
            wallets::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await
                .map_err(|err| EngineError::from_constraint(err, IN_USE))?;
            Ok(())
        })
    }
}
