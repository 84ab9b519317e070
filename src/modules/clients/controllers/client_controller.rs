use std::sync::Arc;

use actix_web::{web, HttpResponse};

use crate::core::AppError;
use crate::middleware::CompanyId;
use crate::modules::clients::models::{Client, CreateClientRequest, UpdateClientRequest};
use crate::modules::clients::repositories::ClientRepository;

/// Create a client
/// POST /clients
pub async fn create_client(
    repo: web::Data<Arc<ClientRepository>>,
    company_id: CompanyId,
    request: web::Json<CreateClientRequest>,
) -> Result<HttpResponse, AppError> {
    let client = Client::new(&company_id.0, request.into_inner())?;
    repo.create(&client).await?;

    Ok(HttpResponse::Created().json(client))
}

/// List clients for the company, newest first
/// GET /clients
pub async fn list_clients(
    repo: web::Data<Arc<ClientRepository>>,
    company_id: CompanyId,
) -> Result<HttpResponse, AppError> {
    let clients = repo.list(&company_id.0).await?;

    Ok(HttpResponse::Ok().json(clients))
}

/// Get a client by id
/// GET /clients/{id}
pub async fn get_client(
    repo: web::Data<Arc<ClientRepository>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let client = repo
        .find_by_id(&id, &company_id.0)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client '{}' not found", id)))?;

    Ok(HttpResponse::Ok().json(client))
}

/// Patch a client
/// PUT /clients/{id}
pub async fn update_client(
    repo: web::Data<Arc<ClientRepository>>,
    company_id: CompanyId,
    path: web::Path<String>,
    request: web::Json<UpdateClientRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let client = repo
        .find_by_id(&id, &company_id.0)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Client '{}' not found", id)))?;

    let merged = client.apply_update(request.into_inner())?;
    repo.update(&merged).await?;

    Ok(HttpResponse::Ok().json(merged))
}

/// Delete a client
/// DELETE /clients/{id}
pub async fn delete_client(
    repo: web::Data<Arc<ClientRepository>>,
    company_id: CompanyId,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    repo.delete(&path.into_inner(), &company_id.0).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// Configure client routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/clients")
            .route("", web::post().to(create_client))
            .route("", web::get().to(list_clients))
            .route("/{id}", web::get().to(get_client))
            .route("/{id}", web::put().to(update_client))
            .route("/{id}", web::delete().to(delete_client)),
    );
}
