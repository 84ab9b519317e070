use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::CompanyId;
use crate::modules::products::models::{CreateProductRequest, Product, UpdateProductRequest};
use crate::modules::products::repositories::ProductRepository;

/// Create a product
/// POST /products
pub async fn create_product(
    repo: web::Data<Arc<ProductRepository>>,
    company_id: CompanyId,
    request: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let product = Product::new(&company_id.0, request.into_inner())?;
    repo.create(&product).await?;

    Ok(HttpResponse::Created().json(product))
}

/// List products for the company, newest first
/// GET /products
pub async fn list_products(
    repo: web::Data<Arc<ProductRepository>>,
    company_id: CompanyId,
) -> Result<HttpResponse, AppError> {
    let products = repo.list(&company_id.0).await?;

    Ok(HttpResponse::Ok().json(products))
}

/// Get a product by id
/// GET /products/{id}
pub async fn get_product(
    repo: web::Data<Arc<ProductRepository>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = repo
        .find_by_id(&id, &company_id.0)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product '{}' not found", id)))?;

    Ok(HttpResponse::Ok().json(product))
}

/// Patch a product
/// PUT /products/{id}
pub async fn update_product(
    repo: web::Data<Arc<ProductRepository>>,
    company_id: CompanyId,
    path: web::Path<String>,
    request: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = repo
        .find_by_id(&id, &company_id.0)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product '{}' not found", id)))?;

    let merged = product.apply_update(request.into_inner())?;
    repo.update(&merged).await?;

    Ok(HttpResponse::Ok().json(merged))
}

/// Delete a product
/// DELETE /products/{id}
pub async fn delete_product(
    repo: web::Data<Arc<ProductRepository>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    repo.delete(&path.into_inner(), &company_id.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure product routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/products")
            .route("", web::post().to(create_product))
            .route("", web::get().to(list_products))
            .route("/{id}", web::get().to(get_product))
            .route("/{id}", web::put().to(update_product))
            .route("/{id}", web::delete().to(delete_product)),
    );
}
