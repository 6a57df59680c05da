//! Transaction input validation
//!
//! Amounts arrive as JSON numbers or numeric strings and are held as exact
//! decimals. Descriptions are stored verbatim (no trimming, no escaping);
//! safety comes from binding, not from rewriting input.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use super::ValidationError;

/// Maximum description length in characters
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Validated input for a new transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    amount: Decimal,
    description: String,
}

impl NewTransaction {
    /// Create a new transaction input.
    ///
    /// # Example
    /// ```
    /// use rust_decimal::Decimal;
    /// use tally_server::models::NewTransaction;
    ///
    /// assert!(NewTransaction::new(Decimal::new(995, 2), "lunch").is_ok());
    /// assert!(NewTransaction::new(Decimal::ONE, "").is_err());
    /// ```
    pub fn new(amount: Decimal, description: impl Into<String>) -> Result<Self, ValidationError> {
        let description = description.into();
        if description.is_empty() {
            return Err(ValidationError::Empty {
                field: "description",
            });
        }
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description",
                max: MAX_DESCRIPTION_LEN,
            });
        }

        Ok(Self {
            amount,
            description,
        })
    }

    /// Validate loosely-typed JSON fields from a request body.
    pub fn from_json(
        amount: Option<&Value>,
        description: Option<&Value>,
    ) -> Result<Self, ValidationError> {
        let amount = parse_amount(amount)?;
        let description = match description {
            None | Some(Value::Null) => {
                return Err(ValidationError::Empty {
                    field: "description",
                })
            }
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                return Err(ValidationError::InvalidFormat {
                    field: "description",
                    reason: "must be a string",
                })
            }
        };

        Self::new(amount, description)
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

fn parse_amount(value: Option<&Value>) -> Result<Decimal, ValidationError> {
    let invalid = ValidationError::InvalidFormat {
        field: "amount",
        reason: "must be a decimal number",
    };

    match value {
        None | Some(Value::Null) => Err(ValidationError::Empty { field: "amount" }),
        Some(Value::Number(n)) => parse_decimal(&n.to_string()).ok_or(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(ValidationError::Empty { field: "amount" })
        }
        Some(Value::String(s)) => parse_decimal(s.trim()).ok_or(invalid),
        Some(_) => Err(invalid),
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Parse a transaction id given as a JSON number or numeric string.
pub fn parse_transaction_id(value: Option<&Value>) -> Result<i64, ValidationError> {
    let invalid = ValidationError::InvalidFormat {
        field: "id",
        reason: "must be an integer",
    };

    match value {
        None | Some(Value::Null) => Err(ValidationError::Empty { field: "id" }),
        Some(Value::Number(n)) => n.as_i64().ok_or(invalid),
        Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid),
        Some(_) => Err(invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn amount_from_number_or_string() {
        let from_number = NewTransaction::from_json(Some(&json!(12.5)), Some(&json!("a"))).unwrap();
        assert_eq!(from_number.amount(), Decimal::new(125, 1));

        let from_string =
            NewTransaction::from_json(Some(&json!(" 99.95 ")), Some(&json!("a"))).unwrap();
        assert_eq!(from_string.amount(), Decimal::new(9995, 2));

        let from_int = NewTransaction::from_json(Some(&json!(-3)), Some(&json!("a"))).unwrap();
        assert_eq!(from_int.amount(), Decimal::from(-3));
    }

    #[test]
    fn amount_rejects_garbage() {
        for bad in [json!("abc"), json!(true), json!([1]), json!({"v": 1})] {
            let err = NewTransaction::from_json(Some(&bad), Some(&json!("a"))).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidFormat { field: "amount", .. }),
                "{bad} gave {err:?}"
            );
        }
    }

    #[test]
    fn missing_fields_are_empty_errors() {
        let err = NewTransaction::from_json(None, Some(&json!("a"))).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "amount" });

        let err = NewTransaction::from_json(Some(&json!(1)), None).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "description" });

        let err = NewTransaction::from_json(Some(&json!(1)), Some(&json!(""))).unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "description" });
    }

    #[test]
    fn description_kept_verbatim() {
        let raw = "'); DROP TABLE transactions;--";
        let new = NewTransaction::new(Decimal::ONE, raw).unwrap();
        assert_eq!(new.description(), raw);
    }

    #[test]
    fn description_length_limit() {
        let long = "x".repeat(MAX_DESCRIPTION_LEN + 1);
        let err = NewTransaction::new(Decimal::ONE, long).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { .. }));
    }

    #[test]
    fn transaction_id_parsing() {
        assert_eq!(parse_transaction_id(Some(&json!(7))), Ok(7));
        assert_eq!(parse_transaction_id(Some(&json!("42"))), Ok(42));
        assert!(parse_transaction_id(Some(&json!(1.5))).is_err());
        assert!(parse_transaction_id(Some(&json!("seven"))).is_err());
        assert_eq!(
            parse_transaction_id(None),
            Err(ValidationError::Empty { field: "id" })
        );
    }
}
