use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::CompanyId;
use crate::modules::taxes::models::{CreateTaxRateRequest, TaxRate, UpdateTaxRateRequest};
use crate::modules::taxes::repositories::TaxRateRepository;

/// Create a tax rate
/// POST /tax-rates
pub async fn create_tax_rate(
    repo: web::Data<Arc<TaxRateRepository>>,
    company_id: CompanyId,
    request: web::Json<CreateTaxRateRequest>,
) -> Result<HttpResponse, AppError> {
    let tax_rate = TaxRate::new(&company_id.0, request.into_inner())?;
    repo.create(&tax_rate).await?;

    Ok(HttpResponse::Created().json(tax_rate))
}

/// List configured tax rates, default rate first
/// GET /tax-rates
pub async fn list_tax_rates(
    repo: web::Data<Arc<TaxRateRepository>>,
    company_id: CompanyId,
) -> Result<HttpResponse, AppError> {
    let tax_rates = repo.list(&company_id.0).await?;

    Ok(HttpResponse::Ok().json(tax_rates))
}

/// Patch a tax rate
/// PUT /tax-rates/{id}
pub async fn update_tax_rate(
    repo: web::Data<Arc<TaxRateRepository>>,
    company_id: CompanyId,
    path: web::Path<String>,
    request: web::Json<UpdateTaxRateRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let tax_rate = repo
        .find_by_id(&id, &company_id.0)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Tax rate '{}' not found", id)))?;

    let merged = tax_rate.apply_update(request.into_inner())?;
    repo.update(&merged).await?;

    Ok(HttpResponse::Ok().json(merged))
}

/// Delete a tax rate
/// DELETE /tax-rates/{id}
pub async fn delete_tax_rate(
    repo: web::Data<Arc<TaxRateRepository>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    repo.delete(&path.into_inner(), &company_id.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure tax rate routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tax-rates")
            .route("", web::post().to(create_tax_rate))
            .route("", web::get().to(list_tax_rates))
            .route("/{id}", web::put().to(update_tax_rate))
            .route("/{id}", web::delete().to(delete_tax_rate)),
    );
}
