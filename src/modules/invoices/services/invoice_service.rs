use std::sync::Arc;

use serde::Serialize;

use crate::core::money::format_amount;
use crate::core::{AppError, Result};
use crate::modules::clients::models::Client;
use crate::modules::clients::repositories::ClientRepository;
use crate::modules::companies::repositories::CompanyRepository;
use crate::modules::documents::models::LineItem;
use crate::modules::invoices::models::{CreateInvoiceRequest, Invoice, UpdateInvoiceRequest};
use crate::modules::invoices::repositories::{InvoiceRepository, PaymentRepository};
use crate::modules::numbering::{DocumentKind, NumberingService};

/// An invoice joined with its client, as returned to the API
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub client: Option<Client>,
}

/// Service for invoice business logic
pub struct InvoiceService {
    invoice_repo: Arc<InvoiceRepository>,
    payment_repo: Arc<PaymentRepository>,
    company_repo: Arc<CompanyRepository>,
    client_repo: Arc<ClientRepository>,
}

impl InvoiceService {
    pub fn new(
        invoice_repo: Arc<InvoiceRepository>,
        payment_repo: Arc<PaymentRepository>,
        company_repo: Arc<CompanyRepository>,
        client_repo: Arc<ClientRepository>,
    ) -> Self {
        Self {
            invoice_repo,
            payment_repo,
            company_repo,
            client_repo,
        }
    }

    /// Create an invoice: number reservation, header insert, and line item
    /// inserts commit or roll back together.
    pub async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
        company_id: &str,
    ) -> Result<InvoiceDetail> {
        let company = self
            .company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::not_found("Company not found"))?;

        let mut tx = self.invoice_repo.pool().begin().await?;

        let number =
            NumberingService::reserve_number(&mut tx, company_id, DocumentKind::Invoice).await?;
        let invoice_number = NumberingService::format_number(
            &company.invoice_prefix,
            number,
            company.number_pad_width as u32,
        );

        let invoice = Invoice::new(company_id, invoice_number, request)?;
        self.invoice_repo.create_with_tx(&mut tx, &invoice).await?;

        tx.commit().await?;

        tracing::info!(
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            total = %format_amount(invoice.total),
            "Invoice created"
        );

        self.get_invoice(&invoice.id, company_id).await
    }

    /// Get an invoice with its line items, payments, and client
    pub async fn get_invoice(&self, id: &str, company_id: &str) -> Result<InvoiceDetail> {
        let mut invoice = self
            .invoice_repo
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice '{}' not found", id)))?;

        invoice.line_items = self.invoice_repo.find_items(id).await?;
        invoice.payments = self.payment_repo.list_by_invoice(id).await?;

        let client = self
            .client_repo
            .find_by_id(&invoice.client_id, company_id)
            .await?;

        Ok(InvoiceDetail { invoice, client })
    }

    /// List invoices for a company, newest first, with line items fetched in
    /// one batched query
    pub async fn list_invoices(&self, company_id: &str) -> Result<Vec<Invoice>> {
        let mut invoices = self.invoice_repo.list(company_id).await?;

        let ids: Vec<String> = invoices.iter().map(|invoice| invoice.id.clone()).collect();
        let mut items = self.invoice_repo.find_items_batch(&ids).await?;
        for invoice in &mut invoices {
            invoice.line_items = items.remove(&invoice.id).unwrap_or_default();
        }

        Ok(invoices)
    }

    /// Update an invoice. When line items are provided the replacement is
    /// all-or-nothing: items are swapped, totals recomputed, and the balance
    /// re-derived against the amount already paid, inside one transaction.
    pub async fn update_invoice(
        &self,
        id: &str,
        request: UpdateInvoiceRequest,
        company_id: &str,
    ) -> Result<InvoiceDetail> {
        let mut tx = self.invoice_repo.pool().begin().await?;

        let invoice = InvoiceRepository::find_by_id_for_update(&mut tx, id, company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Invoice '{}' not found", id)))?;

        let mut merged = invoice.apply_update(&request);

        if let Some(item_requests) = &request.line_items {
            let items = item_requests
                .iter()
                .map(LineItem::from_request)
                .collect::<Result<Vec<_>>>()?;

            merged.replace_line_items(items)?;
            self.invoice_repo.delete_items_with_tx(&mut tx, id).await?;
            self.invoice_repo
                .insert_items_with_tx(&mut tx, id, &merged.line_items)
                .await?;
        }

        self.invoice_repo
            .update_header_with_tx(&mut tx, &merged)
            .await?;
        tx.commit().await?;

        self.get_invoice(id, company_id).await
    }

    /// Delete an invoice with its line items and payments
    pub async fn delete_invoice(&self, id: &str, company_id: &str) -> Result<()> {
        self.invoice_repo.delete(id, company_id).await
    }
}
