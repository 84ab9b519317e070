use std::sync::Arc;

use serde::Serialize;

use crate::core::money::format_amount;
use crate::core::{AppError, Result};
use crate::modules::clients::models::Client;
use crate::modules::clients::repositories::ClientRepository;
use crate::modules::companies::repositories::CompanyRepository;
use crate::modules::documents::models::LineItem;
use crate::modules::invoices::models::Invoice;
use crate::modules::invoices::repositories::InvoiceRepository;
use crate::modules::numbering::{DocumentKind, NumberingService};
use crate::modules::quotes::models::{CreateQuoteRequest, Quote, QuoteStatus, UpdateQuoteRequest};
use crate::modules::quotes::repositories::QuoteRepository;

/// A quote joined with its client, as returned to the API
#[derive(Debug, Serialize)]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,
    pub client: Option<Client>,
}

/// Service for quote business logic
pub struct QuoteService {
    quote_repo: Arc<QuoteRepository>,
    invoice_repo: Arc<InvoiceRepository>,
    company_repo: Arc<CompanyRepository>,
    client_repo: Arc<ClientRepository>,
    /// Days between quote date and the due date of a derived invoice
    due_days: i64,
}

impl QuoteService {
    pub fn new(
        quote_repo: Arc<QuoteRepository>,
        invoice_repo: Arc<InvoiceRepository>,
        company_repo: Arc<CompanyRepository>,
        client_repo: Arc<ClientRepository>,
        due_days: i64,
    ) -> Self {
        Self {
            quote_repo,
            invoice_repo,
            company_repo,
            client_repo,
            due_days,
        }
    }

    /// Create a quote: the number reservation, header insert, and line item
    /// inserts commit or roll back together.
    pub async fn create_quote(
        &self,
        request: CreateQuoteRequest,
        company_id: &str,
    ) -> Result<QuoteDetail> {
        let company = self
            .company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::not_found("Company not found"))?;

        let mut tx = self.quote_repo.pool().begin().await?;

        let number =
            NumberingService::reserve_number(&mut tx, company_id, DocumentKind::Quote).await?;
        let quote_number = NumberingService::format_number(
            &company.quote_prefix,
            number,
            company.number_pad_width as u32,
        );

        let quote = Quote::new(company_id, quote_number, request)?;
        self.quote_repo.create_with_tx(&mut tx, &quote).await?;

        tx.commit().await?;

        tracing::info!(
            quote_id = %quote.id,
            quote_number = %quote.quote_number,
            total = %format_amount(quote.total),
            "Quote created"
        );

        self.get_quote(&quote.id, company_id).await
    }

    /// Get a quote with its line items and client
    pub async fn get_quote(&self, id: &str, company_id: &str) -> Result<QuoteDetail> {
        let quote = self
            .quote_repo
            .find_by_id(id, company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Quote '{}' not found", id)))?;

        let client = self
            .client_repo
            .find_by_id(&quote.client_id, company_id)
            .await?;

        Ok(QuoteDetail { quote, client })
    }

    /// List quotes for a company, newest first, with line items fetched in
    /// one batched query
    pub async fn list_quotes(&self, company_id: &str) -> Result<Vec<Quote>> {
        let mut quotes = self.quote_repo.list(company_id).await?;

        let ids: Vec<String> = quotes.iter().map(|quote| quote.id.clone()).collect();
        let mut items = self.quote_repo.find_items_batch(&ids).await?;
        for quote in &mut quotes {
            quote.line_items = items.remove(&quote.id).unwrap_or_default();
        }

        Ok(quotes)
    }

    /// Update a quote. When line items are provided the replacement is
    /// all-or-nothing: items are swapped and totals recomputed inside the
    /// same transaction as the header patch.
    pub async fn update_quote(
        &self,
        id: &str,
        request: UpdateQuoteRequest,
        company_id: &str,
    ) -> Result<QuoteDetail> {
        let mut tx = self.quote_repo.pool().begin().await?;

        let quote = QuoteRepository::find_by_id_for_update(&mut tx, id, company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Quote '{}' not found", id)))?;

        let mut merged = quote.apply_update(&request);

        if let Some(item_requests) = &request.line_items {
            let items = item_requests
                .iter()
                .map(LineItem::from_request)
                .collect::<Result<Vec<_>>>()?;

            merged.replace_line_items(items);
            self.quote_repo.delete_items_with_tx(&mut tx, id).await?;
            self.quote_repo
                .insert_items_with_tx(&mut tx, id, &merged.line_items)
                .await?;
        }

        self.quote_repo.update_header_with_tx(&mut tx, &merged).await?;
        tx.commit().await?;

        self.get_quote(id, company_id).await
    }

    /// Delete a quote and its line items
    pub async fn delete_quote(&self, id: &str, company_id: &str) -> Result<()> {
        self.quote_repo.delete(id, company_id).await
    }

    /// Convert a quote into a draft invoice.
    ///
    /// One transaction covers the invoice number reservation, the invoice
    /// and line item inserts, and the quote's move to accepted, so the
    /// conversion is all-or-nothing. Marking an already accepted quote is a
    /// no-op; the conversion still produces a new invoice.
    pub async fn convert_to_invoice(&self, quote_id: &str, company_id: &str) -> Result<Invoice> {
        let company = self
            .company_repo
            .find_by_id(company_id)
            .await?
            .ok_or_else(|| AppError::not_found("Company not found"))?;

        let mut tx = self.invoice_repo.pool().begin().await?;

        let quote = QuoteRepository::find_by_id_for_update(&mut tx, quote_id, company_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Quote '{}' not found", quote_id)))?;

        let number =
            NumberingService::reserve_number(&mut tx, company_id, DocumentKind::Invoice).await?;
        let invoice_number = NumberingService::format_number(
            &company.invoice_prefix,
            number,
            company.number_pad_width as u32,
        );

        let invoice = Invoice::from_quote(&quote, invoice_number, self.due_days);
        self.invoice_repo.create_with_tx(&mut tx, &invoice).await?;

        if quote.status != QuoteStatus::Accepted {
            QuoteRepository::update_status_with_tx(&mut tx, quote_id, QuoteStatus::Accepted)
                .await?;
        }

        tx.commit().await?;

        tracing::info!(
            quote_id = %quote_id,
            invoice_id = %invoice.id,
            invoice_number = %invoice.invoice_number,
            "Quote converted to invoice"
        );

        let mut created = self
            .invoice_repo
            .find_by_id(&invoice.id, company_id)
            .await?
            .ok_or_else(|| AppError::internal("Converted invoice missing after commit"))?;
        created.line_items = self.invoice_repo.find_items(&created.id).await?;

        Ok(created)
    }
}
