use sqlx::{MySql, MySqlPool, Transaction};

use crate::core::Result;
use crate::modules::invoices::models::Payment;

/// Repository for the append-only payment ledger
pub struct PaymentRepository {
    pool: MySqlPool,
}

impl PaymentRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Append a payment. Runs in the same transaction that updates the
    /// invoice's paid amount and balance.
    pub async fn create_with_tx(
        tx: &mut Transaction<'_, MySql>,
        payment: &Payment,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments (id, invoice_id, date, amount, method, reference, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&payment.id)
        .bind(&payment.invoice_id)
        .bind(payment.date)
        .bind(payment.amount)
        .bind(payment.method)
        .bind(&payment.reference)
        .bind(payment.created_at)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// List payments for an invoice, oldest first
    pub async fn list_by_invoice(&self, invoice_id: &str) -> Result<Vec<Payment>> {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, invoice_id, date, amount, method, reference, created_at
            FROM payments
            WHERE invoice_id = ?
            ORDER BY created_at
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(payments)
    }
}
