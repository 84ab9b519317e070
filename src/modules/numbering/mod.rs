pub mod services;

pub use services::{DocumentKind, NumberingService};
