//! Facturio Invoicing Backend Library
//!
//! This library provides the core functionality for the Facturio small
//! business invoicing system.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use modules::clients;
pub use modules::companies;
pub use modules::documents;
pub use modules::invoices;
pub use modules::numbering;
pub use modules::products;
pub use modules::quotes;
pub use modules::taxes;
