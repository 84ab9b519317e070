// MySQL CRUD for invoices and their line items.
//
// As with quotes, multi-row writes run inside a caller-provided transaction.
// Payment application additionally locks the invoice row so the balance
// check and the paid-amount update are atomic.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::documents::models::LineItem;
use crate::modules::invoices::models::{Invoice, InvoiceStatus};

/// Repository for invoice database operations
pub struct InvoiceRepository {
    pool: MySqlPool,
}

impl InvoiceRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert an invoice header and its line items
    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        invoice: &Invoice,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, company_id, invoice_number, client_id, quote_id, date, due_date,
                status, subtotal, tax_amount, total, paid_amount, balance, notes,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.company_id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.client_id)
        .bind(&invoice.quote_id)
        .bind(invoice.date)
        .bind(invoice.due_date)
        .bind(invoice.status)
        .bind(invoice.subtotal)
        .bind(invoice.tax_amount)
        .bind(invoice.total)
        .bind(invoice.paid_amount)
        .bind(invoice.balance)
        .bind(&invoice.notes)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Invoice number '{}' already exists",
                        invoice.invoice_number
                    ));
                }
            }
            AppError::Database(e)
        })?;

        self.insert_items_with_tx(tx, &invoice.id, &invoice.line_items)
            .await
    }

    /// Insert line items for an invoice, preserving input order
    pub async fn insert_items_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        invoice_id: &str,
        items: &[LineItem],
    ) -> Result<()> {
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (id, invoice_id, description, quantity, unit_price, tax_rate, position)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(invoice_id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.tax_rate)
            .bind(position as i32)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Delete every line item owned by an invoice
    pub async fn delete_items_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        invoice_id: &str,
    ) -> Result<()> {
        sqlx::query("DELETE FROM invoice_items WHERE invoice_id = ?")
            .bind(invoice_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Find an invoice by id, header only
    pub async fn find_by_id(&self, id: &str, company_id: &str) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, company_id, invoice_number, client_id, quote_id, date, due_date,
                   status, subtotal, tax_amount, total, paid_amount, balance, notes,
                   created_at, updated_at
            FROM invoices
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Find an invoice by id under a row lock. Used by payment application
    /// so the balance check and the paid-amount update are atomic.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, MySql>,
        id: &str,
        company_id: &str,
    ) -> Result<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, company_id, invoice_number, client_id, quote_id, date, due_date,
                   status, subtotal, tax_amount, total, paid_amount, balance, notes,
                   created_at, updated_at
            FROM invoices
            WHERE id = ? AND company_id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(invoice)
    }

    /// List invoice headers for a company, newest first
    pub async fn list(&self, company_id: &str) -> Result<Vec<Invoice>> {
        let invoices = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, company_id, invoice_number, client_id, quote_id, date, due_date,
                   status, subtotal, tax_amount, total, paid_amount, balance, notes,
                   created_at, updated_at
            FROM invoices
            WHERE company_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invoices)
    }

    /// Fetch the line items of an invoice, in document order
    pub async fn find_items(&self, invoice_id: &str) -> Result<Vec<LineItem>> {
        let items = sqlx::query_as::<_, LineItemRow>(
            r#"
            SELECT id, invoice_id AS document_id, description, quantity, unit_price, tax_rate
            FROM invoice_items
            WHERE invoice_id = ?
            ORDER BY position
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items.into_iter().map(LineItemRow::into_line_item).collect())
    }

    /// Fetch the line items of many invoices in one query, grouped by invoice
    pub async fn find_items_batch(
        &self,
        invoice_ids: &[String],
    ) -> Result<HashMap<String, Vec<LineItem>>> {
        if invoice_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; invoice_ids.len()].join(", ");
        let sql = format!(
            "SELECT id, invoice_id AS document_id, description, quantity, unit_price, tax_rate \
             FROM invoice_items WHERE invoice_id IN ({}) ORDER BY invoice_id, position",
            placeholders
        );

        let mut query = sqlx::query_as::<_, LineItemRow>(&sql);
        for id in invoice_ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        Ok(LineItem::group_by_document(
            rows.into_iter().map(LineItemRow::into_line_item),
        ))
    }

    /// Update an invoice header (meta fields and derived totals/balance)
    pub async fn update_header_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        invoice: &Invoice,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET client_id = ?, date = ?, due_date = ?, status = ?,
                subtotal = ?, tax_amount = ?, total = ?, paid_amount = ?, balance = ?,
                notes = ?, updated_at = NOW()
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(&invoice.client_id)
        .bind(invoice.date)
        .bind(invoice.due_date)
        .bind(invoice.status)
        .bind(invoice.subtotal)
        .bind(invoice.tax_amount)
        .bind(invoice.total)
        .bind(invoice.paid_amount)
        .bind(invoice.balance)
        .bind(&invoice.notes)
        .bind(&invoice.id)
        .bind(&invoice.company_id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Invoice '{}' not found",
                invoice.id
            )));
        }

        Ok(())
    }

    /// Update the derived payment state after a payment has been applied
    pub async fn update_payment_state_with_tx(
        tx: &mut Transaction<'_, MySql>,
        id: &str,
        paid_amount: Decimal,
        balance: Decimal,
        status: InvoiceStatus,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE invoices
            SET paid_amount = ?, balance = ?, status = ?, updated_at = NOW()
            WHERE id = ?
            "#,
        )
        .bind(paid_amount)
        .bind(balance)
        .bind(status)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// Delete an invoice; its line items and payments cascade
    pub async fn delete(&self, id: &str, company_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ? AND company_id = ?")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Invoice '{}' not found", id)));
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: String,
    document_id: String,
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
    tax_rate: Decimal,
}

impl LineItemRow {
    fn into_line_item(self) -> LineItem {
        LineItem {
            id: Some(self.id),
            document_id: Some(self.document_id),
            description: self.description,
            quantity: self.quantity,
            unit_price: self.unit_price,
            tax_rate: self.tax_rate,
        }
    }
}
