// A line item is one billable row (description, quantity, unit price, tax
// rate) belonging to a document. Quotes and invoices share the same shape;
// they differ only in which table the rows are persisted to.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{AppError, Result};

/// A single billable row of a quote or invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier, assigned on persistence
    #[serde(skip_deserializing)]
    pub id: Option<String>,

    /// Owning document (quote or invoice)
    #[serde(skip_deserializing)]
    pub document_id: Option<String>,

    /// Description of the product or service
    pub description: String,

    /// Quantity, fractional quantities allowed (e.g. hours)
    pub quantity: Decimal,

    /// Price per unit
    pub unit_price: Decimal,

    /// Tax rate as a percentage, 0 to 100
    pub tax_rate: Decimal,
}

/// Request payload for a line item on document create/update
#[derive(Debug, Clone, Deserialize)]
pub struct LineItemRequest {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
}

impl LineItem {
    /// Create a new line item with validation
    pub fn new(
        description: String,
        quantity: Decimal,
        unit_price: Decimal,
        tax_rate: Decimal,
    ) -> Result<Self> {
        Self::validate_description(&description)?;
        Self::validate_quantity(quantity)?;
        Self::validate_unit_price(unit_price)?;
        Self::validate_tax_rate(tax_rate)?;

        Ok(Self {
            id: None,
            document_id: None,
            description,
            quantity,
            unit_price,
            tax_rate,
        })
    }

    /// Build a validated line item from a request payload
    pub fn from_request(request: &LineItemRequest) -> Result<Self> {
        Self::new(
            request.description.clone(),
            request.quantity,
            request.unit_price,
            request.tax_rate,
        )
    }

    /// Group persisted line items by their owning document, preserving the
    /// input order within each group. Items without a document id (never
    /// persisted) are dropped.
    pub fn group_by_document(
        items: impl IntoIterator<Item = LineItem>,
    ) -> HashMap<String, Vec<LineItem>> {
        let mut grouped: HashMap<String, Vec<LineItem>> = HashMap::new();
        for item in items {
            if let Some(document_id) = item.document_id.clone() {
                grouped.entry(document_id).or_default().push(item);
            }
        }
        grouped
    }

    fn validate_description(description: &str) -> Result<()> {
        if description.trim().is_empty() {
            return Err(AppError::validation("Line item description cannot be empty"));
        }

        if description.len() > 255 {
            return Err(AppError::validation(
                "Line item description cannot exceed 255 characters",
            ));
        }

        Ok(())
    }

    fn validate_quantity(quantity: Decimal) -> Result<()> {
        if quantity < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Quantity must be non-negative, got: {}",
                quantity
            )));
        }

        Ok(())
    }

    fn validate_unit_price(unit_price: Decimal) -> Result<()> {
        if unit_price < Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Unit price must be non-negative, got: {}",
                unit_price
            )));
        }

        Ok(())
    }

    fn validate_tax_rate(tax_rate: Decimal) -> Result<()> {
        if tax_rate < Decimal::ZERO || tax_rate > Decimal::from(100) {
            return Err(AppError::validation(format!(
                "Tax rate must be between 0 and 100, got: {}",
                tax_rate
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_line_item_creation_valid() {
        let item = LineItem::new(
            "Consulting".to_string(),
            Decimal::from_str("2.5").unwrap(),
            Decimal::from(120),
            Decimal::from(20),
        );

        assert!(item.is_ok());
        let item = item.unwrap();
        assert_eq!(item.description, "Consulting");
        assert_eq!(item.quantity, Decimal::from_str("2.5").unwrap());
    }

    #[test]
    fn test_line_item_validation_empty_description() {
        let result = LineItem::new(
            "".to_string(),
            Decimal::ONE,
            Decimal::from(100),
            Decimal::ZERO,
        );

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("description cannot be empty"));
    }

    #[test]
    fn test_line_item_validation_negative_quantity() {
        let result = LineItem::new(
            "Product".to_string(),
            Decimal::from(-1),
            Decimal::from(100),
            Decimal::ZERO,
        );

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Quantity must be non-negative"));
    }

    #[test]
    fn test_line_item_validation_negative_price() {
        let result = LineItem::new(
            "Product".to_string(),
            Decimal::ONE,
            Decimal::from(-100),
            Decimal::ZERO,
        );

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unit price must be non-negative"));
    }

    #[test]
    fn test_line_item_validation_tax_rate_over_100() {
        let result = LineItem::new(
            "Product".to_string(),
            Decimal::ONE,
            Decimal::from(100),
            Decimal::from(101),
        );

        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Tax rate must be between 0 and 100"));
    }

    #[test]
    fn test_group_by_document_keeps_order_within_group() {
        let persisted = |doc: &str, description: &str| {
            let mut item = LineItem::new(
                description.to_string(),
                Decimal::ONE,
                Decimal::from(10),
                Decimal::ZERO,
            )
            .unwrap();
            item.document_id = Some(doc.to_string());
            item
        };

        let grouped = LineItem::group_by_document(vec![
            persisted("doc-1", "first"),
            persisted("doc-2", "other"),
            persisted("doc-1", "second"),
        ]);

        assert_eq!(grouped.len(), 2);
        let doc1: Vec<_> = grouped["doc-1"].iter().map(|i| i.description.as_str()).collect();
        assert_eq!(doc1, vec!["first", "second"]);
        assert_eq!(grouped["doc-2"].len(), 1);
    }

    #[test]
    fn test_line_item_zero_quantity_allowed() {
        assert!(LineItem::new(
            "Placeholder".to_string(),
            Decimal::ZERO,
            Decimal::from(100),
            Decimal::from(20),
        )
        .is_ok());
    }
}
