pub mod invoice_repository;
pub mod payment_repository;

pub use invoice_repository::InvoiceRepository;
pub use payment_repository::PaymentRepository;
