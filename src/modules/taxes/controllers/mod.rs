pub mod tax_rate_controller;

pub use tax_rate_controller::configure;
