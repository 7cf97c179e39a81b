//! JSON bodies exchanged with the HTTP API.
//!
//! Money travels as decimal strings (`"75000.00"`), ids as integers and
//! calendar dates as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A field of a partial update that distinguishes "not sent" from `null`.
///
/// Use with `#[serde(default)]`: a missing key stays [`Patch::Absent`], an
/// explicit `null` becomes `Present(None)` and clears the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Present(Option<T>),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// `None` when absent, `Some(None)` when cleared.
    pub fn into_option(self) -> Option<Option<T>> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Self::Present)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Absent | Self::Present(None) => serializer.serialize_none(),
            Self::Present(Some(value)) => value.serialize(serializer),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Income,
    Expense,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub name: String,
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        /// Bearer token for the `Authorization` header.
        pub token: String,
        pub expires_at: DateTime<Utc>,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Account {
        pub id: i64,
        pub name: String,
        pub email: String,
        pub profile_image_url: Option<String>,
        pub currency: String,
        pub timezone: String,
        pub created_at: DateTime<Utc>,
    }

    /// Body of `PUT /api/profile`. Every field is optional.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub currency: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub timezone: Option<String>,
        #[serde(default, skip_serializing_if = "Patch::is_absent")]
        pub profile_image_url: Patch<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordChange {
        pub current_password: String,
        pub new_password: String,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        #[serde(default)]
        pub bank_name: Option<String>,
        /// ISO 4217 code; the account currency when omitted.
        #[serde(default)]
        pub currency: Option<String>,
        /// Decimal string, zero when omitted.
        #[serde(default)]
        pub opening_balance: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WalletUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Patch::is_absent")]
        pub bank_name: Patch<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Wallet {
        pub id: i64,
        pub name: String,
        pub bank_name: Option<String>,
        pub currency: String,
        pub balance: String,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: CategoryKind,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub kind: Option<CategoryKind>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryQuery {
        pub kind: Option<CategoryKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Category {
        pub id: i64,
        pub name: String,
        pub kind: CategoryKind,
        pub created_at: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub wallet_id: i64,
        pub category_id: i64,
        /// Positive decimal string, e.g. `"25000"` or `"10.50"`.
        pub amount: String,
        #[serde(default)]
        pub description: Option<String>,
        pub transaction_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Transaction {
        pub id: i64,
        pub wallet_id: i64,
        pub category_id: i64,
        pub amount: String,
        pub kind: CategoryKind,
        pub description: Option<String>,
        pub transaction_date: NaiveDate,
        pub created_at: DateTime<Utc>,
    }

    /// Response of `POST /api/transactions`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub transaction: Transaction,
        pub wallet: super::wallet::Wallet,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletRef {
        pub id: i64,
        pub name: String,
        pub currency: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryRef {
        pub id: i64,
        pub name: String,
        pub kind: CategoryKind,
    }

    /// One row of `GET /api/transactions`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        #[serde(flatten)]
        pub transaction: Transaction,
        pub wallet: WalletRef,
        pub category: CategoryRef,
    }

    /// Query string of `GET /api/transactions`. `from` and `to` are inclusive.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionQuery {
        pub wallet_id: Option<i64>,
        pub category_id: Option<i64>,
        pub kind: Option<CategoryKind>,
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
    }
}

pub mod exchange {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExchangeRates {
        pub base: String,
        pub rates: BTreeMap<String, f64>,
    }
}

#[cfg(test)]
mod tests {
    use super::account::ProfileUpdate;
    use super::*;

    #[test]
    fn patch_tells_missing_from_null() {
        let absent: ProfileUpdate = serde_json::from_str(r#"{"name":"Alice"}"#).unwrap();
        assert_eq!(absent.profile_image_url, Patch::Absent);
        assert_eq!(absent.name.as_deref(), Some("Alice"));

        let cleared: ProfileUpdate =
            serde_json::from_str(r#"{"profile_image_url":null}"#).unwrap();
        assert_eq!(cleared.profile_image_url, Patch::Present(None));
        assert_eq!(cleared.profile_image_url.into_option(), Some(None));

        let set: ProfileUpdate =
            serde_json::from_str(r#"{"profile_image_url":"https://x.test/a.png"}"#).unwrap();
        assert_eq!(
            set.profile_image_url.into_option(),
            Some(Some("https://x.test/a.png".to_string()))
        );
    }

    #[test]
    fn absent_patch_is_not_serialized() {
        let body = serde_json::to_value(ProfileUpdate {
            timezone: Some("Asia/Jakarta".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"timezone": "Asia/Jakarta"}));
    }

    #[test]
    fn category_kind_is_lowercase_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&CategoryKind::Expense).unwrap(),
            r#""expense""#
        );
        assert!(serde_json::from_str::<CategoryKind>(r#""transfer""#).is_err());
    }
}
