// MySQL CRUD for quotes and their line items.
//
// Multi-row writes (header + items, replace-all item updates) always run
// inside a caller-provided transaction so a quote is never observable with a
// partial line item set.

use std::collections::HashMap;

use sqlx::{MySql, MySqlPool, Transaction};
use uuid::Uuid;

use crate::core::{AppError, Result};
use crate::modules::documents::models::LineItem;
use crate::modules::quotes::models::{Quote, QuoteStatus};

/// Repository for quote database operations
pub struct QuoteRepository {
    pool: MySqlPool,
}

impl QuoteRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Insert a quote header and its line items
    pub async fn create_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        quote: &Quote,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO quotes (
                id, company_id, quote_number, client_id, date, valid_until,
                status, subtotal, tax_amount, total, notes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&quote.id)
        .bind(&quote.company_id)
        .bind(&quote.quote_number)
        .bind(&quote.client_id)
        .bind(quote.date)
        .bind(quote.valid_until)
        .bind(quote.status)
        .bind(quote.subtotal)
        .bind(quote.tax_amount)
        .bind(quote.total)
        .bind(&quote.notes)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::conflict(format!(
                        "Quote number '{}' already exists",
                        quote.quote_number
                    ));
                }
            }
            AppError::Database(e)
        })?;

        self.insert_items_with_tx(tx, &quote.id, &quote.line_items)
            .await
    }

    /// Insert line items for a quote, preserving input order
    pub async fn insert_items_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        quote_id: &str,
        items: &[LineItem],
    ) -> Result<()> {
        for (position, item) in items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO quote_items (id, quote_id, description, quantity, unit_price, tax_rate, position)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(quote_id)
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

    /// Delete every line item owned by a quote
    pub async fn delete_items_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        quote_id: &str,
    ) -> Result<()> {
        sqlx::query("DELETE FROM quote_items WHERE quote_id = ?")
            .bind(quote_id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Find a quote by id, including line items
    pub async fn find_by_id(&self, id: &str, company_id: &str) -> Result<Option<Quote>> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, company_id, quote_number, client_id, date, valid_until,
                   status, subtotal, tax_amount, total, notes, created_at, updated_at
            FROM quotes
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut quote) = quote else {
            return Ok(None);
        };

        quote.line_items = self.find_items(&quote.id).await?;
        Ok(Some(quote))
    }

    /// Find a quote by id under a row lock, including line items.
    /// Used by quote-to-invoice conversion.
    pub async fn find_by_id_for_update(
        tx: &mut Transaction<'_, MySql>,
        id: &str,
        company_id: &str,
    ) -> Result<Option<Quote>> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, company_id, quote_number, client_id, date, valid_until,
                   status, subtotal, tax_amount, total, notes, created_at, updated_at
            FROM quotes
            WHERE id = ? AND company_id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(company_id)
        .fetch_optional(&mut **tx)
        .await?;

        let Some(mut quote) = quote else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, LineItemRow>(
            r#"
            SELECT id, quote_id AS document_id, description, quantity, unit_price, tax_rate
            FROM quote_items
            WHERE quote_id = ?
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&mut **tx)
        .await?;

        quote.line_items = items.into_iter().map(LineItemRow::into_line_item).collect();
        Ok(Some(quote))
    }

    /// List quote headers for a company, newest first (line items omitted)
    pub async fn list(&self, company_id: &str) -> Result<Vec<Quote>> {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, company_id, quote_number, client_id, date, valid_until,
                   status, subtotal, tax_amount, total, notes, created_at, updated_at
            FROM quotes
            WHERE company_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(quotes)
    }

    /// Fetch the line items of a quote, in document order
    pub async fn find_items(&self, quote_id: &str) -> Result<Vec<LineItem>> {
        let items = sqlx::query_as::<_, LineItemRow>(
            r#"
            SELECT id, quote_id AS document_id, description, quantity, unit_price, tax_rate
            FROM quote_items
            WHERE quote_id = ?
            ORDER BY position
            "#,
        )
        .bind(quote_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items.into_iter().map(LineItemRow::into_line_item).collect())
    }

    /// Fetch the line items of many quotes in one query, grouped by quote
    pub async fn find_items_batch(
        &self,
        quote_ids: &[String],
    ) -> Result<HashMap<String, Vec<LineItem>>> {
        if quote_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; quote_ids.len()].join(", ");
        let sql = format!(
            "SELECT id, quote_id AS document_id, description, quantity, unit_price, tax_rate \
             FROM quote_items WHERE quote_id IN ({}) ORDER BY quote_id, position",
            placeholders
        );

        let mut query = sqlx::query_as::<_, LineItemRow>(&sql);
        for id in quote_ids {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await?;

        Ok(LineItem::group_by_document(
            rows.into_iter().map(LineItemRow::into_line_item),
        ))
    }

    /// Update a quote header (meta fields and derived totals)
    pub async fn update_header_with_tx(
        &self,
        tx: &mut Transaction<'_, MySql>,
        quote: &Quote,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE quotes
            SET client_id = ?, date = ?, valid_until = ?, status = ?,
                subtotal = ?, tax_amount = ?, total = ?, notes = ?, updated_at = NOW()
            WHERE id = ? AND company_id = ?
            "#,
        )
        .bind(&quote.client_id)
        .bind(quote.date)
        .bind(quote.valid_until)
        .bind(quote.status)
        .bind(quote.subtotal)
        .bind(quote.tax_amount)
        .bind(quote.total)
        .bind(&quote.notes)
        .bind(&quote.id)
        .bind(&quote.company_id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!(
                "Quote '{}' not found",
                quote.id
            )));
        }

        Ok(())
    }

    /// Set a quote's status
    pub async fn update_status_with_tx(
        tx: &mut Transaction<'_, MySql>,
        id: &str,
        status: QuoteStatus,
    ) -> Result<()> {
        sqlx::query("UPDATE quotes SET status = ?, updated_at = NOW() WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Delete a quote; its line items cascade
    pub async fn delete(&self, id: &str, company_id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = ? AND company_id = ?")
            .bind(id)
            .bind(company_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Quote '{}' not found", id)));
        }

        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LineItemRow {
    id: String,
    document_id: String,
    description: String,
    quantity: rust_decimal::Decimal,
    unit_price: rust_decimal::Decimal,
    tax_rate: rust_decimal::Decimal,
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
