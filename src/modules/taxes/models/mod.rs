mod tax_rate;

pub use tax_rate::{CreateTaxRateRequest, TaxRate, UpdateTaxRateRequest};
