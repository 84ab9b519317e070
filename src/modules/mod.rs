pub mod clients;
pub mod companies;
pub mod documents;
pub mod invoices;
pub mod numbering;
pub mod products;
pub mod quotes;
pub mod taxes;
