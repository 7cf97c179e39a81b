use std::{fmt, str::FromStr};

use crate::EngineError;

/// Signed amount in minor units, always with two fractional digits.
///
/// Balances and transaction amounts never touch floating point.
///
/// ```rust
/// use engine::Money;
///
/// let spent: Money = "25000".parse().unwrap();
/// assert_eq!(spent.minor(), 2_500_000);
/// assert_eq!(Money::new(-1050).to_string(), "-10.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    #[must_use]
    pub const fn new(minor: i64) -> Self {
        Self(minor)
    }

    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// `None` when the sum leaves the `i64` range.
    #[must_use]
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// The same amount with the opposite sign.
    #[must_use]
    pub(crate) fn negated(self) -> Option<Money> {
        self.0.checked_neg().map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "{}.{:02}", abs / 100, abs % 100)
    }
}

fn digits(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Money {
    type Err = EngineError;

    /// Parses `"100000"`, `"10.5"`, `"-10,50"`; at most two decimals.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let invalid = || EngineError::Validation(format!("invalid amount: {input}"));
        let too_large = || EngineError::Validation("amount too large".to_string());

        let (negative, unsigned) = match input.as_bytes().first() {
            Some(b'-') => (true, &input[1..]),
            Some(b'+') => (false, &input[1..]),
            Some(_) => (false, input),
            None => return Err(EngineError::Validation("empty amount".to_string())),
        };
        let (whole, fraction) = match unsigned.split_once(['.', ',']) {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };
        if !digits(whole) || !(fraction.is_empty() || digits(fraction)) {
            return Err(invalid());
        }
        let cents = match fraction.len() {
            0 => 0,
            1 => i64::from(fraction.as_bytes()[0] - b'0') * 10,
            2 => fraction.parse::<i64>().map_err(|_| invalid())?,
            _ => {
                return Err(EngineError::Validation(
                    "amount has more than 2 decimals".to_string(),
                ));
            }
        };

        let magnitude = whole
            .parse::<i64>()
            .ok()
            .and_then(|units| units.checked_mul(100))
            .and_then(|minor| minor.checked_add(cents))
            .ok_or_else(too_large)?;
        let amount = Money(magnitude);
        if negative {
            amount.negated().ok_or_else(too_large)
        } else {
            Ok(amount)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_always_shows_two_decimals() {
        assert_eq!(Money::ZERO.to_string(), "0.00");
        assert_eq!(Money::new(1).to_string(), "0.01");
        assert_eq!(Money::new(7_500_000).to_string(), "75000.00");
        assert_eq!(Money::new(-1050).to_string(), "-10.50");
        assert_eq!(Money::new(i64::MIN).to_string(), "-92233720368547758.08");
    }

    #[test]
    fn parses_plain_and_decimal_amounts() {
        assert_eq!("100000".parse::<Money>().unwrap(), Money::new(10_000_000));
        assert_eq!("10.5".parse::<Money>().unwrap(), Money::new(1050));
        assert_eq!("10,50".parse::<Money>().unwrap(), Money::new(1050));
        assert_eq!(" -0.01 ".parse::<Money>().unwrap(), Money::new(-1));
        assert_eq!("+1.".parse::<Money>().unwrap(), Money::new(100));
    }

    #[test]
    fn rejects_malformed_amounts() {
        for bad in ["", "-", "12.345", "1.2.3", "abc", ".50", "1,-5", "1e3"] {
            assert!(bad.parse::<Money>().is_err(), "{bad:?} should be rejected");
        }
        assert!("999999999999999999999".parse::<Money>().is_err());
        assert!("92233720368547758.08".parse::<Money>().is_err());
    }

    #[test]
    fn addition_reports_overflow() {
        assert_eq!(Money::new(i64::MAX).checked_add(Money::new(1)), None);
        assert_eq!(
            Money::new(100).checked_add(Money::new(-250)),
            Some(Money::new(-150))
        );
    }
}
