//! Spendlog is a personal expense tracker.
//!
//! This library provides a JSON API for recording expenses, listing them with
//! search, filters and pagination, and summarising spending on a dashboard.
//! Every operation is scoped to the authenticated user.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod error;
mod logging;
mod pagination;
mod routing;
mod transaction;
mod user;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, create_cookie_key};
pub use auth::{DEFAULT_COOKIE_DURATION, auth_guard, set_auth_cookie};
pub use dashboard::{CategoryTotal, DashboardSummary, RECENT_TRANSACTION_COUNT, get_summary};
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{Pagination, PaginationConfig};
pub use routing::build_router;
pub use transaction::{
    AmountInput, DeletedTransaction, GroupKey, GroupTotal, SQLiteTransactionStore, SearchQuery,
    SortOrder, Transaction, TransactionBuilder, TransactionChanges, TransactionFilter,
    TransactionFilterParams, TransactionForm, TransactionPage, TransactionStore, compile_filter,
    create_transaction, delete_transaction, get_transaction, list_transactions,
    update_transaction,
};
pub use user::UserID;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Could not listen for ctrl+c: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(error) => {
                tracing::error!("Could not install the terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
