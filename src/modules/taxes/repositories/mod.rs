mod tax_rate_repository;

pub use tax_rate_repository::TaxRateRepository;
