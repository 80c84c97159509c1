//! Dashboard module
//!
//! Provides an overview of a user's spending: the total, a breakdown by
//! category and the most recent transactions.

mod handlers;
mod summary;

pub use handlers::get_dashboard_summary;
pub use summary::{CategoryTotal, DashboardSummary, RECENT_TRANSACTION_COUNT, get_summary};
