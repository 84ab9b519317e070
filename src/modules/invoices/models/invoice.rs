// An invoice owns an ordered list of line items and an append-only list of
// payments. Totals are derived from the items; paid amount and balance are
// derived from the payments.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::documents::models::{LineItem, LineItemRequest};
use crate::modules::documents::services::{compute_totals, DocumentTotals};
use crate::modules::quotes::models::Quote;

use super::payment::Payment;

/// Invoice status lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(20)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Unpaid,
}

impl Default for InvoiceStatus {
    fn default() -> Self {
        InvoiceStatus::Draft
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvoiceStatus::Draft => write!(f, "draft"),
            InvoiceStatus::Sent => write!(f, "sent"),
            InvoiceStatus::Paid => write!(f, "paid"),
            InvoiceStatus::Overdue => write!(f, "overdue"),
            InvoiceStatus::Unpaid => write!(f, "unpaid"),
        }
    }
}

impl std::str::FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            "unpaid" => Ok(InvoiceStatus::Unpaid),
            _ => Err(format!("Invalid invoice status: {}", s)),
        }
    }
}

impl InvoiceStatus {
    /// Status after a payment brings the paid amount to the given level:
    /// fully covered invoices become paid; a first payment moves a draft to
    /// unpaid; any other status is left as the user set it.
    pub fn after_payment(self, paid_amount: Decimal, total: Decimal) -> InvoiceStatus {
        if paid_amount >= total {
            InvoiceStatus::Paid
        } else if self == InvoiceStatus::Draft {
            InvoiceStatus::Unpaid
        } else {
            self
        }
    }
}

/// An invoice with derived totals and payment state
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Invoice {
    pub id: String,
    #[serde(skip_serializing)]
    pub company_id: String,
    pub invoice_number: String,
    pub client_id: String,
    /// Provenance link when derived from a quote; not an ownership relation
    pub quote_id: Option<String>,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    pub status: InvoiceStatus,
    pub subtotal: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub paid_amount: Decimal,
    pub balance: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Joined from the invoice_items table, ordered by position
    #[sqlx(skip)]
    #[serde(default)]
    pub line_items: Vec<LineItem>,

    /// Joined from the payments table, append-only
    #[sqlx(skip)]
    #[serde(default)]
    pub payments: Vec<Payment>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoiceRequest {
    pub client_id: String,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub line_items: Vec<LineItemRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoiceRequest {
    pub client_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<InvoiceStatus>,
    pub notes: Option<String>,
    /// When present, replaces the full line item set and recomputes totals
    pub line_items: Option<Vec<LineItemRequest>>,
}

impl Invoice {
    /// Build a new invoice from a request, with totals derived from the
    /// validated line items and a zero payment state.
    pub fn new(
        company_id: &str,
        invoice_number: String,
        request: CreateInvoiceRequest,
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
            invoice_number,
            client_id: request.client_id,
            quote_id: None,
            date: request.date,
            due_date: request.due_date,
            status: request.status,
            subtotal: totals.subtotal,
            tax_amount: totals.tax_amount,
            total: totals.total,
            paid_amount: Decimal::ZERO,
            balance: totals.total,
            notes: request.notes,
            created_at: now,
            updated_at: now,
            line_items,
            payments: Vec::new(),
        })
    }

    /// Derive a draft invoice from a quote: line items, totals, and notes
    /// are copied; the payment state starts at zero with the full total
    /// outstanding, and the due date falls `due_days` after the quote date.
    pub fn from_quote(quote: &Quote, invoice_number: String, due_days: i64) -> Self {
        let now = Utc::now();
        let line_items = quote
            .line_items
            .iter()
            .map(|item| LineItem {
                id: None,
                document_id: None,
                description: item.description.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                tax_rate: item.tax_rate,
            })
            .collect();

        Self {
            id: Uuid::new_v4().to_string(),
            company_id: quote.company_id.clone(),
            invoice_number,
            client_id: quote.client_id.clone(),
            quote_id: Some(quote.id.clone()),
            date: quote.date,
            due_date: quote.date + Duration::days(due_days),
            status: InvoiceStatus::Draft,
            subtotal: quote.subtotal,
            tax_amount: quote.tax_amount,
            total: quote.total,
            paid_amount: Decimal::ZERO,
            balance: quote.total,
            notes: quote.notes.clone(),
            created_at: now,
            updated_at: now,
            line_items,
            payments: Vec::new(),
        }
    }

    /// Apply a header patch. Line item replacement is handled separately so
    /// totals only change when the items do.
    pub fn apply_update(mut self, update: &UpdateInvoiceRequest) -> Self {
        if let Some(client_id) = &update.client_id {
            self.client_id = client_id.clone();
        }
        if let Some(date) = update.date {
            self.date = date;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
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

    /// Replace the line item set and recompute totals and balance.
    ///
    /// Payments are append-only, so the ledger invariant `paid_amount <=
    /// total` must keep holding after the totals change: a replacement whose
    /// recomputed total falls below the amount already paid is rejected. When
    /// payments exist the status is re-derived, so an invoice whose lowered
    /// total is now fully covered becomes paid.
    pub fn replace_line_items(&mut self, line_items: Vec<LineItem>) -> Result<()> {
        let totals = compute_totals(&line_items);

        if totals.total < self.paid_amount {
            return Err(AppError::validation(format!(
                "New total {} is below the amount already paid {}",
                totals.total, self.paid_amount
            )));
        }

        self.apply_totals(totals);
        if self.paid_amount > Decimal::ZERO {
            self.status = self.status.after_payment(self.paid_amount, self.total);
        }
        self.line_items = line_items;

        Ok(())
    }

    /// Apply a payment amount against the outstanding balance.
    ///
    /// Enforces the ledger invariant `paid_amount <= total`: the amount must
    /// be positive and no greater than the current balance. On success the
    /// paid amount, balance, and status are recomputed together.
    pub fn apply_payment(&mut self, amount: Decimal) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation(format!(
                "Payment amount must be positive, got: {}",
                amount
            )));
        }

        if amount > self.balance {
            return Err(AppError::validation(format!(
                "Payment amount {} exceeds outstanding balance {}",
                amount, self.balance
            )));
        }

        self.paid_amount += amount;
        self.balance = self.total - self.paid_amount;
        self.status = self.status.after_payment(self.paid_amount, self.total);
        self.updated_at = Utc::now();

        Ok(())
    }

    fn apply_totals(&mut self, totals: DocumentTotals) {
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax_amount;
        self.total = totals.total;
        self.balance = self.total - self.paid_amount;
        self.updated_at = Utc::now();
    }
}
