pub mod totals;

pub use totals::{compute_totals, line_tax, line_total, line_total_with_tax, DocumentTotals};
