use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A named tax rate configured by a company, e.g. "TVA 20%"
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TaxRate {
    pub id: String,
    #[serde(skip_serializing)]
    pub company_id: String,
    pub name: String,
    pub rate: Decimal,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaxRateRequest {
    pub name: String,
    pub rate: Decimal,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaxRateRequest {
    pub name: Option<String>,
    pub rate: Option<Decimal>,
    pub is_default: Option<bool>,
}

impl TaxRate {
    pub fn new(company_id: &str, request: CreateTaxRateRequest) -> Result<Self> {
        if request.name.trim().is_empty() {
            return Err(AppError::validation("Tax rate name cannot be empty"));
        }
        Self::validate_rate(request.rate)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            name: request.name,
            rate: request.rate,
            is_default: request.is_default,
            created_at: Utc::now(),
        })
    }

    pub fn apply_update(mut self, update: UpdateTaxRateRequest) -> Result<Self> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Tax rate name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(rate) = update.rate {
            Self::validate_rate(rate)?;
            self.rate = rate;
        }
        if let Some(is_default) = update.is_default {
            self.is_default = is_default;
        }
        Ok(self)
    }

    fn validate_rate(rate: Decimal) -> Result<()> {
        if rate < Decimal::ZERO || rate > Decimal::from(100) {
            return Err(AppError::validation(format!(
                "Tax rate must be between 0 and 100, got: {}",
                rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_bounds() {
        let request = |rate: i64| CreateTaxRateRequest {
            name: "TVA".to_string(),
            rate: Decimal::from(rate),
            is_default: false,
        };

        assert!(TaxRate::new("c-1", request(0)).is_ok());
        assert!(TaxRate::new("c-1", request(100)).is_ok());
        assert!(TaxRate::new("c-1", request(101)).is_err());
        assert!(TaxRate::new("c-1", request(-1)).is_err());
    }
}
