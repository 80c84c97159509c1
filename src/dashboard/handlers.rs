//! Dashboard HTTP handlers.

use axum::{
    Extension, Json,
    extract::{FromRef, State},
};

use crate::{AppState, Error, transaction::SQLiteTransactionStore, user::UserID};

use super::summary::{DashboardSummary, get_summary};

/// The state needed for the dashboard summary.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store for reading transactions.
    pub store: SQLiteTransactionStore,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.transaction_store.clone(),
        }
    }
}

/// A route handler for the caller's dashboard summary.
pub async fn get_dashboard_summary(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<DashboardSummary>, Error> {
    get_summary(&state.store, user_id).map(Json)
}
