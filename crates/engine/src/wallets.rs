//! The module contains `Wallet` struct and its table.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Currency, EngineError, Money};

/// A wallet.
///
/// A wallet is a representation of a real wallet, a bank account or anything
/// else where money are kept. Its balance is moved only by the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wallet {
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub bank_name: Option<String>,
    pub currency: Currency,
    pub balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub account_id: i64,
    pub name: String,
    pub name_norm: String,
    pub bank_name: Option<String>,
    pub currency: String,
    pub balance_minor: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Account.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Wallet {
            id: model.id,
            account_id: model.account_id,
            name: model.name,
            bank_name: model.bank_name,
            currency: Currency::try_from(model.currency.as_str())?,
            balance: Money::new(model.balance_minor),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
