use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::CompanyId;
use crate::modules::companies::models::UpdateCompanyRequest;
use crate::modules::companies::repositories::CompanyRepository;

/// Get the authenticated company's settings
/// GET /company
pub async fn get_company(
    repo: web::Data<Arc<CompanyRepository>>,
    company_id: CompanyId,
) -> Result<HttpResponse, AppError> {
    let company = repo
        .find_by_id(&company_id.0)
        .await?
        .ok_or_else(|| AppError::not_found("Company not found"))?;

    Ok(HttpResponse::Ok().json(company))
}

/// Patch the authenticated company's settings
/// PUT /company
pub async fn update_company(
    repo: web::Data<Arc<CompanyRepository>>,
    company_id: CompanyId,
    request: web::Json<UpdateCompanyRequest>,
) -> Result<HttpResponse, AppError> {
    let company = repo
        .find_by_id(&company_id.0)
        .await?
        .ok_or_else(|| AppError::not_found("Company not found"))?;

    let merged = company.apply_update(request.into_inner());
    repo.update(&merged).await?;

    let company = repo
        .find_by_id(&company_id.0)
        .await?
        .ok_or_else(|| AppError::not_found("Company not found"))?;

    Ok(HttpResponse::Ok().json(company))
}

/// Configure company routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/company")
            .route("", web::get().to(get_company))
            .route("", web::put().to(update_company)),
    );
}
