//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. Fields typed `Option<_>` on the
//! update commands mean "leave unchanged" when `None`; a nested
//! `Option<Option<_>>` additionally allows clearing a nullable column.

use chrono::NaiveDate;

use crate::{CategoryKind, Money};

/// Register a new account.
#[derive(Clone, Debug)]
pub struct RegisterCmd {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Partial profile update.
#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub currency: Option<String>,
    pub timezone: Option<String>,
    pub profile_image_url: Option<Option<String>>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.currency.is_none()
            && self.timezone.is_none()
            && self.profile_image_url.is_none()
    }
}

/// Create a wallet.
#[derive(Clone, Debug)]
pub struct NewWalletCmd {
    pub account_id: i64,
    pub name: String,
    pub bank_name: Option<String>,
    /// Defaults to the account's preferred currency.
    pub currency: Option<String>,
    pub opening_balance: Money,
}

impl NewWalletCmd {
    #[must_use]
    pub fn new(account_id: i64, name: impl Into<String>) -> Self {
        Self {
            account_id,
            name: name.into(),
            bank_name: None,
            currency: None,
            opening_balance: Money::ZERO,
        }
    }

    #[must_use]
    pub fn bank_name(mut self, bank_name: impl Into<String>) -> Self {
        self.bank_name = Some(bank_name.into());
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn opening_balance(mut self, balance: Money) -> Self {
        self.opening_balance = balance;
        self
    }
}

/// Partial wallet update.
#[derive(Clone, Debug, Default)]
pub struct WalletUpdate {
    pub name: Option<String>,
    pub bank_name: Option<Option<String>>,
}

/// Partial category update.
#[derive(Clone, Debug, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub kind: Option<CategoryKind>,
}

/// Record a transaction against a wallet.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    pub account_id: i64,
    pub wallet_id: i64,
    pub category_id: i64,
    pub amount: Money,
    pub description: Option<String>,
    pub transaction_date: NaiveDate,
}

/// Filters for listing transactions.
///
/// `from` and `to` are both inclusive calendar dates.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub wallet_id: Option<i64>,
    pub category_id: Option<i64>,
    pub kind: Option<CategoryKind>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
