pub mod invoice;
pub mod payment;

pub use invoice::{CreateInvoiceRequest, Invoice, InvoiceStatus, UpdateInvoiceRequest};
pub use payment::{Payment, PaymentMethod, RecordPaymentRequest};
