//! Bookkeeping engine: accounts, wallets, categories and the ledger that keeps
//! wallet balances in step with recorded transactions.
//!
//! Every operation takes the acting account id and scopes its reads and
//! writes to rows owned by that account. Rows owned by someone else are
//! reported exactly like rows that do not exist.

pub use accounts::{Account, DEFAULT_TIMEZONE};
pub use categories::{Category, CategoryKind};
pub use commands::{
    CategoryUpdate, NewTransactionCmd, NewWalletCmd, ProfileUpdate, RegisterCmd,
    TransactionListFilter, WalletUpdate,
};
pub use credentials::PasswordHasher;
pub use currency::{Currency, DEFAULT_CURRENCY};
pub use error::EngineError;
pub use exchange::ExchangeRates;
pub use money::Money;
pub use ops::{Engine, EngineBuilder, LedgerReceipt};
pub use transactions::{CategorySnapshot, LedgerEntry, Transaction, WalletSnapshot};
pub use wallets::Wallet;

mod accounts;
mod categories;
mod commands;
mod credentials;
mod currency;
mod error;
mod exchange;
mod money;
mod ops;
mod transactions;
mod util;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
