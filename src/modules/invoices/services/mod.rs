pub mod invoice_service;
pub mod payment_service;

pub use invoice_service::{InvoiceDetail, InvoiceService};
pub use payment_service::PaymentService;
