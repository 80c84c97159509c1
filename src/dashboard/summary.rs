//! Summarises a user's spending for the dashboard.

use serde::Serialize;

use crate::{
    Error,
    transaction::{GroupKey, SortOrder, Transaction, TransactionFilter, TransactionStore},
    user::UserID,
};

/// The number of transactions shown in the recent activity list.
pub const RECENT_TRANSACTION_COUNT: u64 = 5;

/// The total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The sum of the amounts in the category.
    pub total: f64,
}

/// An overview of all of a user's transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// The sum of all the user's transaction amounts.
    pub total_expenses: f64,
    /// Totals per category, largest first.
    pub category_breakdown: Vec<CategoryTotal>,
    /// The user's most recent transactions, newest first.
    pub recent_transactions: Vec<Transaction>,
}

/// Compute the dashboard summary for `user_id`.
///
/// The summary always covers all of the user's transactions, it does not
/// take any filters.
///
/// # Errors
/// Returns an error if the store fails.
pub fn get_summary<S: TransactionStore>(
    store: &S,
    user_id: UserID,
) -> Result<DashboardSummary, Error> {
    let filter = TransactionFilter::for_user(user_id);

    let total_expenses = store.sum(&filter)?;
    let category_breakdown = store
        .group_sum(&filter, GroupKey::Category)?
        .into_iter()
        .map(|group| CategoryTotal {
            category: group.key,
            total: group.total,
        })
        .collect();
    let recent_transactions = store.find(
        &filter,
        SortOrder::Descending,
        0,
        Some(RECENT_TRANSACTION_COUNT),
    )?;

    Ok(DashboardSummary {
        total_expenses,
        category_breakdown,
        recent_transactions,
    })
}
