//! Transaction primitives.
//!
//! A `Transaction` is an immutable ledger entry that moved exactly one wallet
//! balance. Its `kind` is copied from the category when it is recorded and is
//! never re-derived afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;

use crate::{CategoryKind, EngineError, Money};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount: Money,
    pub kind: CategoryKind,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Signed effect of this entry on its wallet balance.
    #[must_use]
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            CategoryKind::Income => self.amount,
            CategoryKind::Expense => Money::new(-self.amount.minor()),
        }
    }
}

/// Wallet fields shown next to a listed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WalletSnapshot {
    pub id: i64,
    pub name: String,
    pub currency: String,
}

/// Category fields shown next to a listed transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySnapshot {
    pub id: i64,
    pub name: String,
    pub kind: CategoryKind,
}

/// A transaction joined with the wallet and category it points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    pub transaction: Transaction,
    pub wallet: WalletSnapshot,
    pub category: CategorySnapshot,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount_minor: i64,
    pub kind: String,
    pub description: Option<String>,
    pub transaction_date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Account,
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Wallet,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: model.id,
            account_id: model.account_id,
            wallet_id: model.wallet_id,
            category_id: model.category_id,
            amount: Money::new(model.amount_minor),
            kind: CategoryKind::try_from(model.kind.as_str())?,
            description: model.description,
            transaction_date: model.transaction_date,
            created_at: model.created_at,
        })
    }
}
