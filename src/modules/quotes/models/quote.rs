// A quote is a line-item-bearing document with derived totals. It can be
// converted one way into an invoice once accepted.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::Result;
use crate::modules::documents::models::{LineItem, LineItemRequest};
use crate::modules::documents::services::{compute_totals, DocumentTotals};

/// Quote status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Accepted,
    Rejected,
}

impl Default for QuoteStatus {
    fn default() -> Self {
        QuoteStatus::Draft
    }
}

impl std::fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuoteStatus::Draft => write!(f, "draft"),
            QuoteStatus::Sent => write!(f, "sent"),
            QuoteStatus::Accepted => write!(f, "accepted"),
            QuoteStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl std::str::FromStr for QuoteStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(QuoteStatus::Draft),
            "sent" => Ok(QuoteStatus::Sent),
            "accepted" => Ok(QuoteStatus::Accepted),
            "rejected" => Ok(QuoteStatus::Rejected),
            _ => Err(format!("Invalid quote status: {}", s)),
        }
    }
}

/// A quote with its derived totals
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Quote {
    pub id: String,
    #[serde(skip_serializing)]
    pub company_id: String,
    pub quote_number: String,
    pub client_id: String,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    pub status: QuoteStatus,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Joined from the quote_items table, ordered by position
    #[sqlx(skip)]
    #[serde(default)]
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuoteRequest {
    pub client_id: String,
    pub date: NaiveDate,
    pub valid_until: NaiveDate,
    #[serde(default)]
    pub status: QuoteStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateQuoteRequest {
    pub client_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub valid_until: Option<NaiveDate>,
    pub status: Option<QuoteStatus>,
    pub notes: Option<String>,
    /// When present, replaces the full line item set and recomputes totals
    pub line_items: Option<Vec<LineItemRequest>>,
}

impl Quote {
    /// Build a new quote from a request, with totals derived from the
    /// validated line items. The quote number is assigned by the caller from
    /// the numbering service.
    pub fn new(
        company_id: &str,
        quote_number: String,
        request: CreateQuoteRequest,
    ) -> Result<Self> {
        let line_items = request
            .line_items
            .iter()
            .map(LineItem::from_request)
            .collect::<Result<Vec<_>>>()?;

        let totals = compute_totals(&line_items);
        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            company_id: company_id.to_string(),
            quote_number,
            client_id: request.client_id,
            date: request.date,
            valid_until: request.valid_until,
            status: request.status,
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            total: totals.total,
            notes: request.notes,
            created_at: now,
            updated_at: now,
            line_items,
        })
    }

    /// Apply a header patch. Line item replacement is handled separately so
    /// totals only change when the items do.
    pub fn apply_update(mut self, update: &UpdateQuoteRequest) -> Self {
        if let Some(client_id) = &update.client_id {
            self.client_id = client_id.clone();
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(valid_until) = update.valid_until {
            self.valid_until = valid_until;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(notes) = &update.notes {
            self.notes = Some(notes.clone());
        }
        self.updated_at = Utc::now();
        self
    }

    /// Replace the line item set and recompute derived totals
    pub fn replace_line_items(&mut self, line_items: Vec<LineItem>) {
        let totals = compute_totals(&line_items);
        self.apply_totals(totals);
        self.line_items = line_items;
    }

    fn apply_totals(&mut self, totals: DocumentTotals) {
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total = totals.total;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateQuoteRequest {
        CreateQuoteRequest {
            client_id: "client-1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            valid_until: NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            status: QuoteStatus::Draft,
            notes: None,
            line_items: vec![
                LineItemRequest {
                    description: "Design".to_string(),
                    quantity: Decimal::from(2),
                    unit_price: Decimal::from(100),
                    tax_rate: Decimal::from(20),
                },
                LineItemRequest {
                    description: "Hosting".to_string(),
                    quantity: Decimal::from(1),
                    unit_price: Decimal::from(50),
                    tax_rate: Decimal::from(10),
                },
            ],
        }
    }

    #[test]
    fn test_quote_totals_derived_on_creation() {
        let quote = Quote::new("c-1", "Q-0001".to_string(), request()).unwrap();

        assert_eq!(quote.subtotal, Decimal::from(250));
        assert_eq!(quote.tax_amount, Decimal::from(45));
        assert_eq!(quote.total, Decimal::from(295));
        assert_eq!(quote.status, QuoteStatus::Draft);
    }

    #[test]
    fn test_quote_with_no_items_has_zero_totals() {
        let mut req = request();
        req.line_items.clear();

        let quote = Quote::new("c-1", "Q-0002".to_string(), req).unwrap();
        assert_eq!(quote.subtotal, Decimal::ZERO);
        assert_eq!(quote.total, Decimal::ZERO);
    }

    #[test]
    fn test_quote_rejects_invalid_line_item() {
        let mut req = request();
        req.line_items[0].quantity = Decimal::from(-1);

        assert!(Quote::new("c-1", "Q-0003".to_string(), req).is_err());
    }

    #[test]
    fn test_replace_line_items_recomputes_totals() {
        let mut quote = Quote::new("c-1", "Q-0004".to_string(), request()).unwrap();

        quote.replace_line_items(vec![LineItem::new(
            "Audit".to_string(),
            Decimal::from(1),
            Decimal::from(500),
            Decimal::ZERO,
        )
        .unwrap()]);

        assert_eq!(quote.subtotal, Decimal::from(500));
        assert_eq!(quote.tax_amount, Decimal::ZERO);
        assert_eq!(quote.total, Decimal::from(500));
    }

    #[test]
    fn test_header_patch_does_not_touch_totals() {
        let quote = Quote::new("c-1", "Q-0005".to_string(), request()).unwrap();
        let total = quote.total;

        let patched = quote.apply_update(&UpdateQuoteRequest {
            client_id: None,
            date: None,
            valid_until: None,
            status: Some(QuoteStatus::Sent),
            notes: Some("Net 30".to_string()),
            line_items: None,
        });

        assert_eq!(patched.status, QuoteStatus::Sent);
        assert_eq!(patched.total, total);
    }
}
