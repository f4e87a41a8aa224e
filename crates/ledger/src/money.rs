use std::{
    fmt,
    ops::{Add, AddAssign, Neg},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::LedgerError;

/// Signed money amount represented as **integer paise** (hundredths).
///
/// Use this type for all monetary values (balances, budget limits, spend
/// totals) to avoid floating-point drift. Positive values are spend/income
/// depending on context; a negative spend delta is a credit.
///
/// # Examples
///
/// ```rust
/// use ledger::MoneyCents;
///
/// let amount = MoneyCents::new(12_50);
/// assert_eq!(amount.cents(), 1250);
/// assert_eq!(amount.to_string(), "₹12.50");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer hundredths.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in hundredths.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns `true` if the amount is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}₹{}.{:02}", abs / 100, abs % 100)
    }
}

impl From<i64> for MoneyCents {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<MoneyCents> for i64 {
    fn from(value: MoneyCents) -> Self {
        value.0
    }
}

impl Add for MoneyCents {
    type Output = MoneyCents;

    fn add(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 + rhs.0)
    }
}

impl AddAssign for MoneyCents {
    fn add_assign(&mut self, rhs: MoneyCents) {
        self.0 += rhs.0;
    }
}

impl Neg for MoneyCents {
    type Output = MoneyCents;

    fn neg(self) -> Self::Output {
        MoneyCents(-self.0)
    }
}

impl FromStr for MoneyCents {
    type Err = LedgerError;

    /// Parses a decimal string into hundredths.
    ///
    /// Accepts `,` as a thousands separator and at most two fractional
    /// digits, so OCR captures like `1,234.56` parse to `123456`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidArgument(format!("invalid amount: {s}"));
        let overflow = || LedgerError::InvalidArgument("amount too large".to_string());

        let trimmed = s.trim();
        let (sign, rest) = match trimmed.strip_prefix('-') {
            Some(stripped) => (-1i64, stripped),
            None => (1i64, trimmed),
        };

        let rest = rest.replace(',', "");
        if rest.is_empty() {
            return Err(invalid());
        }

        let (units_str, frac_str) = match rest.split_once('.') {
            Some((units, frac)) => (units, frac),
            None => (rest.as_str(), ""),
        };

        if units_str.is_empty()
            || !units_str.chars().all(|c| c.is_ascii_digit())
            || !frac_str.chars().all(|c| c.is_ascii_digit())
            || frac_str.len() > 2
        {
            return Err(invalid());
        }

        let units: i64 = units_str.parse().map_err(|_| invalid())?;
        let cents: i64 = match frac_str.len() {
            0 => 0,
            1 => frac_str.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => frac_str.parse::<i64>().map_err(|_| invalid())?,
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Ok(MoneyCents(sign * total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_rupees() {
        assert_eq!(MoneyCents::new(0).to_string(), "₹0.00");
        assert_eq!(MoneyCents::new(1).to_string(), "₹0.01");
        assert_eq!(MoneyCents::new(1250).to_string(), "₹12.50");
        assert_eq!(MoneyCents::new(-1050).to_string(), "-₹10.50");
    }

    #[test]
    fn parse_accepts_thousands_separators() {
        assert_eq!("10".parse::<MoneyCents>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<MoneyCents>().unwrap().cents(), 1050);
        assert_eq!("1,234.56".parse::<MoneyCents>().unwrap().cents(), 123456);
        assert_eq!("-0.01".parse::<MoneyCents>().unwrap().cents(), -1);
    }

    #[test]
    fn serializes_as_a_bare_integer() {
        assert_eq!(serde_json::to_string(&MoneyCents::new(1250)).unwrap(), "1250");
        assert_eq!(
            serde_json::from_str::<MoneyCents>("-50").unwrap(),
            MoneyCents::new(-50)
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("".parse::<MoneyCents>().is_err());
        assert!("12.345".parse::<MoneyCents>().is_err());
        assert!("abc".parse::<MoneyCents>().is_err());
        assert!(".".parse::<MoneyCents>().is_err());
    }
}
