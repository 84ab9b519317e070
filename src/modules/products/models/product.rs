use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};

/// A catalog entry used to prefill document line items
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: String,
    #[serde(skip_serializing)]
    pub company_id: String,
    pub name: String,
    pub description: String,
    pub default_price: Decimal,
    pub default_tax_rate: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub default_price: Decimal,
    pub default_tax_rate: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub default_price: Option<Decimal>,
    pub default_tax_rate: Option<Decimal>,
}

impl Product {
    pub fn new(company_id: &str, request: CreateProductRequest) -> Result<Self> {
        if request.name.trim().is_empty() {
            return Err(AppError::validation("Product name cannot be empty"));
        }
        Self::validate_price(request.default_price)?;
        Self::validate_tax_rate(request.default_tax_rate)?;

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            name: request.name,
            description: request.description,
            default_price: request.default_price,
            default_tax_rate: request.default_tax_rate,
            created_at: Utc::now(),
        })
    }

    pub fn apply_update(mut self, update: UpdateProductRequest) -> Result<Self> {
        if let Some(name) = update.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Product name cannot be empty"));
            }
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(default_price) = update.default_price {
            Self::validate_price(default_price)?;
            self.default_price = default_price;
        }
        if let Some(default_tax_rate) = update.default_tax_rate {
            Self::validate_tax_rate(default_tax_rate)?;
            self.default_tax_rate = default_tax_rate;
        }
        Ok(self)
    }

    fn validate_price(price: Decimal) -> Result<()> {
        if price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Default price must be non-negative, got: {}",
                price
            )));
        }
        Ok(())
    }

    fn validate_tax_rate(rate: Decimal) -> Result<()> {
        if rate < Decimal::ZERO || rate > Decimal::from(100) {
            return Err(AppError::validation(format!(
                "Default tax rate must be between 0 and 100, got: {}",
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
    fn test_product_rejects_negative_price() {
        let result = Product::new(
            "c-1",
            CreateProductRequest {
                name: "Audit".to_string(),
                description: String::new(),
                default_price: Decimal::from(-10),
                default_tax_rate: Decimal::from(20),
            },
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_product_rejects_out_of_range_tax_rate() {
        let result = Product::new(
            "c-1",
            CreateProductRequest {
                name: "Audit".to_string(),
                description: String::new(),
                default_price: Decimal::from(100),
                default_tax_rate: Decimal::from(150),
            },
        );

        assert!(result.is_err());
    }
}
