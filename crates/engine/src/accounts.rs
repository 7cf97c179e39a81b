//! Accounts table.
//!
//! An account is the owner of every wallet, category and transaction. The
//! password hash never leaves this module's `Model`.

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

use crate::{Currency, EngineError};

/// Timezone used when an account does not pick one.
pub const DEFAULT_TIMEZONE: &str = "Asia/Jakarta";

/// A registered user, as exposed to callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub profile_image_url: Option<String>,
    pub currency: Currency,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub profile_image_url: Option<String>,
    pub currency: String,
    pub timezone: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::wallets::Entity")]
    Wallets,
    #[sea_orm(has_many = "super::categories::Entity")]
    Categories,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Account {
            id: model.id,
            name: model.name,
            email: model.email,
            profile_image_url: model.profile_image_url,
            currency: Currency::try_from(model.currency.as_str())?,
            timezone: model.timezone,
            created_at: model.created_at,
        })
    }
}
