pub mod quote;

pub use quote::{CreateQuoteRequest, Quote, QuoteStatus, UpdateQuoteRequest};
