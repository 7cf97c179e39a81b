use crate::EngineError;

/// Currency used when an account does not pick one.
pub const DEFAULT_CURRENCY: &str = "IDR";

/// ISO-4217-like currency code attached to accounts and wallets.
///
/// The engine does not convert between currencies; the code is a label that
/// travels with balances. It is always stored upper-cased.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.0
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self(DEFAULT_CURRENCY.to_string())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(EngineError::Validation(format!(
                "unsupported currency: {}",
                value.trim()
            )));
        }
        Ok(Currency(code))
    }
}
