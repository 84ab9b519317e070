use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::CompanyId;
use crate::modules::invoices::models::{
    CreateInvoiceRequest, RecordPaymentRequest, UpdateInvoiceRequest,
};
use crate::modules::invoices::services::{InvoiceService, PaymentService};

/// Create an invoice
/// POST /invoices
pub async fn create_invoice(
    service: web::Data<Arc<InvoiceService>>,
    company_id: CompanyId,
    request: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .create_invoice(request.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::Created().json(invoice))
}

/// List invoices for the company, newest first
/// GET /invoices
pub async fn list_invoices(
    service: web::Data<Arc<InvoiceService>>,
    company_id: CompanyId,
) -> Result<HttpResponse, AppError> {
    let invoices = service.list_invoices(&company_id.0).await?;

    Ok(HttpResponse::Ok().json(invoices))
}

/// Get an invoice with its line items and payments
/// GET /invoices/{id}
pub async fn get_invoice(
    service: web::Data<Arc<InvoiceService>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .get_invoice(&path.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(invoice))
}

/// Patch an invoice, optionally replacing its line items
/// PUT /invoices/{id}
pub async fn update_invoice(
    service: web::Data<Arc<InvoiceService>>,
    company_id: CompanyId,
    path: web::Path<String>,
    request: web::Json<UpdateInvoiceRequest>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .update_invoice(&path.into_inner(), request.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(invoice))
}

/// Delete an invoice
/// DELETE /invoices/{id}
pub async fn delete_invoice(
    service: web::Data<Arc<InvoiceService>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .delete_invoice(&path.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Record a payment against an invoice
/// POST /invoices/{id}/payments
pub async fn record_payment(
    service: web::Data<Arc<PaymentService>>,
    company_id: CompanyId,
    path: web::Path<String>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = service
        .record_payment(&path.into_inner(), request.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::Created().json(payment))
}

/// List payments for an invoice, oldest first
/// GET /invoices/{id}/payments
pub async fn list_payments(
    service: web::Data<Arc<PaymentService>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let payments = service
        .list_payments(&path.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(payments))
}

/// Configure invoice routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invoices")
            .route("", web::post().to(create_invoice))
            .route("", web::get().to(list_invoices))
            .route("/{id}", web::get().to(get_invoice))
            .route("/{id}", web::put().to(update_invoice))
            .route("/{id}", web::delete().to(delete_invoice))
            .route("/{id}/payments", web::post().to(record_payment))
            .route("/{id}/payments", web::get().to(list_payments)),
    );
}
