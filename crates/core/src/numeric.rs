//! Numeric form input.
//!
//! Clients post numbers either as JSON numbers or as the raw text of a form
//! field. Both are accepted here. Counts must be whole numbers; money is
//! entered in rupees with at most two decimal places and stored in paise.
//! Anything else is rejected with a validation error naming the field.
//! Nothing non-numeric is ever coerced into a value.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::value_object::Money;

/// A numeric field as received from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    /// Parse as a whole number.
    pub fn to_i64(&self, field: &str) -> DomainResult<i64> {
        match self {
            NumericInput::Number(n) => n
                .as_i64()
                .ok_or_else(|| DomainError::validation(format!("{field} must be a whole number"))),
            NumericInput::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| DomainError::validation(format!("{field} must be a whole number"))),
        }
    }

    /// Parse as a whole number that must not be negative.
    pub fn to_non_negative(&self, field: &str) -> DomainResult<i64> {
        let v = self.to_i64(field)?;
        if v < 0 {
            return Err(DomainError::validation(format!("{field} cannot be negative")));
        }
        Ok(v)
    }

    /// Parse a non-negative rupee amount (`"249.50"`, `249.5`, `250`) into paise.
    pub fn to_money(&self, field: &str) -> DomainResult<Money> {
        let text = match self {
            NumericInput::Number(n) => n.to_string(),
            NumericInput::Text(s) => s.trim().to_string(),
        };
        parse_minor_units(field, &text).map(Money::from_minor)
    }
}

fn parse_minor_units(field: &str, text: &str) -> DomainResult<i64> {
    let not_a_number = || DomainError::validation(format!("{field} must be a number"));
    let out_of_range = || DomainError::validation(format!("{field} is out of range"));

    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !digits(whole) || !digits(frac) {
        return Err(not_a_number());
    }
    if frac.len() > 2 {
        return Err(DomainError::validation(format!(
            "{field} cannot have more than 2 decimal places"
        )));
    }

    let whole = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().map_err(|_| out_of_range())?
    };
    let frac = format!("{frac:0<2}").parse::<i64>().map_err(|_| not_a_number())?;
    let minor = whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(frac))
        .ok_or_else(out_of_range)?;

    if negative && minor != 0 {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    Ok(minor)
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        NumericInput::Number(value.into())
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        NumericInput::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numbers_and_numeric_text() {
        let n: NumericInput = serde_json::from_str("42").unwrap();
        let t: NumericInput = serde_json::from_str("\" 42 \"").unwrap();
        assert_eq!(n.to_i64("qty").unwrap(), 42);
        assert_eq!(t.to_i64("qty").unwrap(), 42);
    }

    #[test]
    fn rejects_non_numeric_text() {
        let err = NumericInput::from("abc").to_i64("current_stock").unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("current_stock must be a whole number")
        );
    }

    #[test]
    fn rejects_fractions_and_empty_text() {
        let frac: NumericInput = serde_json::from_str("1.5").unwrap();
        assert!(frac.to_i64("min_stock").is_err());
        assert!(NumericInput::from("").to_i64("min_stock").is_err());
    }

    #[test]
    fn money_is_entered_in_rupees() {
        let cases: [(NumericInput, i64); 5] = [
            (NumericInput::from("249.50"), 24_950),
            (serde_json::from_str("249.5").unwrap(), 24_950),
            (NumericInput::from("250"), 25_000),
            (NumericInput::from(60), 6_000),
            (NumericInput::from(" .5 "), 50),
        ];
        for (input, paise) in cases {
            assert_eq!(input.to_money("base_price").unwrap(), Money::from_minor(paise), "{input:?}");
        }
    }

    #[test]
    fn money_rejects_sub_paise_and_non_numeric_text() {
        assert_eq!(
            NumericInput::from("12.345").to_money("base_price").unwrap_err(),
            DomainError::validation("base_price cannot have more than 2 decimal places")
        );
        for bad in ["", ".", "12,50", "1e3", "₹250", "abc"] {
            assert_eq!(
                NumericInput::from(bad).to_money("cost_per_unit").unwrap_err(),
                DomainError::validation("cost_per_unit must be a number"),
                "{bad:?}"
            );
        }
        assert_eq!(
            NumericInput::from("-1.50").to_money("base_price").unwrap_err(),
            DomainError::validation("base_price cannot be negative")
        );
        assert!(NumericInput::from("100000000000000000").to_money("base_price").is_err());
    }

    #[test]
    fn negative_values_are_rejected_where_not_allowed() {
        let err = NumericInput::from(-3).to_non_negative("max_stock").unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("negative")));
    }
}
