use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::money::validate_amount;
use crate::core::{AppError, Result};

/// How a payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Check,
    Card,
    Other,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Check => write!(f, "check"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Other => write!(f, "other"),
        }
    }
}

/// A payment recorded against an invoice. Append-only: historical payments
/// are never updated or deleted.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
    pub id: String,
    pub invoice_id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentRequest {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

impl Payment {
    /// Create a payment with basic validation.
    ///
    /// The balance check happens later, under the invoice row lock; this
    /// only rejects inputs that are invalid regardless of invoice state.
    pub fn new(invoice_id: &str, request: RecordPaymentRequest) -> Result<Self> {
        if request.amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Payment amount must be positive, got: {}",
                request.amount
            )));
        }

        validate_amount(request.amount).map_err(AppError::validation)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            invoice_id: invoice_id.to_string(),
            date: request.date,
            amount: request.amount,
            method: request.method,
            reference: request.reference,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_rejects_non_positive_amount() {
        let request = |amount: i64| RecordPaymentRequest {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            amount: Decimal::from(amount),
            method: PaymentMethod::BankTransfer,
            reference: None,
        };

        assert!(Payment::new("inv-1", request(0)).is_err());
        assert!(Payment::new("inv-1", request(-10)).is_err());
        assert!(Payment::new("inv-1", request(10)).is_ok());
    }

    #[test]
    fn test_payment_rejects_sub_cent_precision() {
        let request = RecordPaymentRequest {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            amount: Decimal::new(10_005, 3), // 10.005
            method: PaymentMethod::Cash,
            reference: None,
        };

        assert!(Payment::new("inv-1", request).is_err());
    }

    #[test]
    fn test_payment_method_serialization() {
        let json = serde_json::to_string(&PaymentMethod::BankTransfer).unwrap();
        assert_eq!(json, "\"bank_transfer\"");
        assert_eq!(PaymentMethod::BankTransfer.to_string(), "bank_transfer");
    }
}
