use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::CompanyId;
use crate::modules::quotes::models::{CreateQuoteRequest, UpdateQuoteRequest};
use crate::modules::quotes::services::QuoteService;

/// Create a quote
/// POST /quotes
pub async fn create_quote(
    service: web::Data<Arc<QuoteService>>,
    company_id: CompanyId,
    request: web::Json<CreateQuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let quote = service
        .create_quote(request.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::Created().json(quote))
}

/// List quotes for the company, newest first
/// GET /quotes
pub async fn list_quotes(
    service: web::Data<Arc<QuoteService>>,
    company_id: CompanyId,
) -> Result<HttpResponse, AppError> {
    let quotes = service.list_quotes(&company_id.0).await?;

    Ok(HttpResponse::Ok().json(quotes))
}

/// Get a quote with its line items
/// GET /quotes/{id}
pub async fn get_quote(
    service: web::Data<Arc<QuoteService>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let quote = service.get_quote(&path.into_inner(), &company_id.0).await?;

    Ok(HttpResponse::Ok().json(quote))
}

/// Patch a quote, optionally replacing its line items
/// PUT /quotes/{id}
pub async fn update_quote(
    service: web::Data<Arc<QuoteService>>,
    company_id: CompanyId,
    path: web::Path<String>,
    request: web::Json<UpdateQuoteRequest>,
) -> Result<HttpResponse, AppError> {
    let quote = service
        .update_quote(&path.into_inner(), request.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::Ok().json(quote))
}

/// Delete a quote
/// DELETE /quotes/{id}
pub async fn delete_quote(
    service: web::Data<Arc<QuoteService>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    service
        .delete_quote(&path.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Convert a quote into a draft invoice
/// POST /quotes/{id}/convert
pub async fn convert_quote(
    service: web::Data<Arc<QuoteService>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let invoice = service
        .convert_to_invoice(&path.into_inner(), &company_id.0)
        .await?;

    Ok(HttpResponse::Created().json(invoice))
}

/// Configure quote routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotes")
            .route("", web::post().to(create_quote))
            .route("", web::get().to(list_quotes))
            .route("/{id}", web::get().to(get_quote))
            .route("/{id}", web::put().to(update_quote))
            .route("/{id}", web::delete().to(delete_quote))
            .route("/{id}/convert", web::post().to(convert_quote)),
    );
}
