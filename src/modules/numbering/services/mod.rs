pub mod numbering_service;

pub use numbering_service::{DocumentKind, NumberingService};
