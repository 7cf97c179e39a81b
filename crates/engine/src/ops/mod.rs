use sea_orm::DatabaseConnection;

use crate::{PasswordHasher, ResultEngine};

mod access;
mod accounts;
mod categories;
mod ledger;
mod wallets;

pub use ledger::LedgerReceipt;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// Rollback happens when the uncommitted `DatabaseTransaction` is dropped.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    hasher: PasswordHasher,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Static currency-rate table.
    pub fn exchange_rates(&self) -> crate::ExchangeRates {
        crate::ExchangeRates::current()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    hasher: PasswordHasher,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// bcrypt cost used for new password hashes.
    pub fn password_cost(mut self, cost: u32) -> EngineBuilder {
        self.hasher = PasswordHasher::with_cost(cost);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            hasher: self.hasher,
        })
    }
}
