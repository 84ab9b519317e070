use std::sync::Arc;

use crate::core::money::format_amount;
use crate::core::{AppError, Result};
use crate::modules::invoices::models::{Payment, RecordPaymentRequest};
use crate::modules::invoices::repositories::{InvoiceRepository, PaymentRepository};

/// Service for the payment ledger
pub struct PaymentService {
    invoice_repo: Arc<InvoiceRepository>,
    payment_repo: Arc<PaymentRepository>,
}

impl PaymentService {
    pub fn new(invoice_repo: Arc<InvoiceRepository>, payment_repo: Arc<PaymentRepository>) -> Self {
        Self {
            invoice_repo,
            payment_repo,
        }
    }

    /// Record a payment against an invoice.
    ///
    /// The invoice row is locked for the duration of the transaction, so the
    /// balance check and the paid amount update cannot interleave with a
    /// concurrent payment. Overpayment and non-positive amounts are rejected
    /// and leave the ledger untouched.
    pub async fn record_payment(
        &self,
        invoice_id: &str,
        request: RecordPaymentRequest,
        company_id: &str,
    ) -> Result<Payment> {
        let payment = Payment::new(invoice_id, request)?;

        let mut tx = self.invoice_repo.pool().begin().await?;

        let mut invoice = InvoiceRepository::find_by_id_for_update(&mut tx, invoice_id, company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice '{}' not found", invoice_id)))?;

        invoice.apply_payment(payment.amount)?;

        PaymentRepository::create_with_tx(&mut tx, &payment).await?;
        InvoiceRepository::update_payment_state_with_tx(
            &mut tx,
            invoice_id,
            invoice.paid_amount,
            invoice.balance,
            invoice.status,
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            invoice_id = %invoice_id,
            payment_id = %payment.id,
            amount = %format_amount(payment.amount),
            balance = %format_amount(invoice.balance),
            status = %invoice.status,
            "Payment recorded"
        );

        Ok(payment)
    }

    /// List payments for an invoice, oldest first
    pub async fn list_payments(&self, invoice_id: &str, company_id: &str) -> Result<Vec<Payment>> {
        self.invoice_repo
            .find_by_id(invoice_id, company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice '{}' not found", invoice_id)))?;

        self.payment_repo.list_by_invoice(invoice_id).await
    }
}
