pub mod auth;

pub use auth::{CompanyAuth, CompanyId};
