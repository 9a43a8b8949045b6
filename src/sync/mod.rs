pub mod metrics;
mod reconcile;
mod report;

pub use metrics::current_metrics;
pub use reconcile::ReconciliationEngine;
pub use report::BatchReport;
pub use report::ItemOutcome;
