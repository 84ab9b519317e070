use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpResponse, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use facturio::config::Config;
use facturio::middleware::CompanyAuth;
use facturio::modules::clients::repositories::ClientRepository;
use facturio::modules::companies::repositories::CompanyRepository;
use facturio::modules::invoices::repositories::{InvoiceRepository, PaymentRepository};
use facturio::modules::invoices::services::{InvoiceService, PaymentService};
use facturio::modules::products::repositories::ProductRepository;
use facturio::modules::quotes::repositories::QuoteRepository;
use facturio::modules::quotes::services::QuoteService;
use facturio::modules::taxes::repositories::TaxRateRepository;
use facturio::modules::{clients, companies, invoices, products, quotes, taxes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "facturio=debug,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().expect("Failed to load configuration");
    config.validate().expect("Configuration validation failed");

    tracing::info!("Starting Facturio Invoicing Backend");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .expect("Failed to create database pool");

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    // Apply pending migrations
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // Repositories
    let company_repo = Arc::new(CompanyRepository::new(db_pool.clone()));
    let client_repo = Arc::new(ClientRepository::new(db_pool.clone()));
    let product_repo = Arc::new(ProductRepository::new(db_pool.clone()));
    let tax_rate_repo = Arc::new(TaxRateRepository::new(db_pool.clone()));
    let quote_repo = Arc::new(QuoteRepository::new(db_pool.clone()));
    let invoice_repo = Arc::new(InvoiceRepository::new(db_pool.clone()));
    let payment_repo = Arc::new(PaymentRepository::new(db_pool.clone()));

    // Services
    let quote_service = Arc::new(QuoteService::new(
        quote_repo.clone(),
        invoice_repo.clone(),
        company_repo.clone(),
        client_repo.clone(),
        config.app.default_due_days,
    ));
    let invoice_service = Arc::new(InvoiceService::new(
        invoice_repo.clone(),
        payment_repo.clone(),
        company_repo.clone(),
        client_repo.clone(),
    ));
    let payment_service = Arc::new(PaymentService::new(
        invoice_repo.clone(),
        payment_repo.clone(),
    ));

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let auth_pool = db_pool.clone();
    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .wrap(CompanyAuth::new(auth_pool.clone()))
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(company_repo.clone()))
            .app_data(web::Data::new(client_repo.clone()))
            .app_data(web::Data::new(product_repo.clone()))
            .app_data(web::Data::new(tax_rate_repo.clone()))
            .app_data(web::Data::new(quote_service.clone()))
            .app_data(web::Data::new(invoice_service.clone()))
            .app_data(web::Data::new(payment_service.clone()))
            .route("/health", web::get().to(health_check))
            .route("/", web::get().to(index))
            .configure(companies::controllers::configure)
            .configure(clients::controllers::configure)
            .configure(products::controllers::configure)
            .configure(taxes::controllers::configure)
            .configure(quotes::controllers::configure)
            .configure(invoices::controllers::configure)
    })
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "facturio"
    }))
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "service": "Facturio Invoicing Backend",
        "version": "0.1.0",
        "status": "running"
    }))
}
