use crate::core::AppError;
use actix_web::{
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use sqlx::MySqlPool;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Company identity resolved by [`CompanyAuth`], available to handlers as an
/// extractor.
#[derive(Debug, Clone)]
pub struct CompanyId(pub String);

impl FromRequest for CompanyId {
    type Error = Error;
    type Future = Ready<std::result::Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let company_id = req.extensions().get::<CompanyId>().cloned();

        ready(company_id.ok_or_else(|| {
            Error::from(AppError::unauthorized("Request is not company-scoped"))
        }))
    }
}

/// API key authentication middleware.
///
/// Resolves the `X-API-Key` header to the owning company and stores the
/// company id in request extensions. Every entity in the system belongs to
/// exactly one company, so all downstream queries are scoped by this id.
pub struct CompanyAuth {
    pool: MySqlPool,
}

impl CompanyAuth {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CompanyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = CompanyAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CompanyAuthMiddleware {
            service: Rc::new(service),
            pool: self.pool.clone(),
        }))
    }
}

pub struct CompanyAuthMiddleware<S> {
    service: Rc<S>,
    pool: MySqlPool,
}

impl<S, B> Service<ServiceRequest> for CompanyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();
        let pool = self.pool.clone();

        Box::pin(async move {
            // Health check stays unauthenticated
            let path = req.path();
            if path == "/health" || path == "/" {
                return svc.call(req).await;
            }

            let api_key = req
                .headers()
                .get("X-API-Key")
                .and_then(|h| h.to_str().ok())
                .ok_or_else(|| Error::from(AppError::unauthorized("Missing X-API-Key header")))?
                .to_string();

            let record = resolve_api_key(&pool, &api_key).await.map_err(Error::from)?;

            req.extensions_mut()
                .insert(CompanyId(record.company_id.clone()));

            svc.call(req).await
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct ApiKeyRecord {
    id: String,
    company_id: String,
}

async fn resolve_api_key(pool: &MySqlPool, api_key: &str) -> crate::core::Result<ApiKeyRecord> {
    let record = sqlx::query_as::<_, ApiKeyRecord>(
        r#"
        SELECT id, company_id
        FROM api_keys
        WHERE api_key = ? AND is_active = TRUE
        LIMIT 1
        "#,
    )
    .bind(api_key)
    .fetch_optional(pool)
    .await
    .map_err(AppError::Database)?
    .ok_or_else(|| AppError::unauthorized("Invalid API key"))?;

    // Update last_used_at timestamp (fire and forget)
    let _ = sqlx::query("UPDATE api_keys SET last_used_at = NOW() WHERE id = ?")
        .bind(&record.id)
        .execute(pool)
        .await;

    Ok(record)
}
