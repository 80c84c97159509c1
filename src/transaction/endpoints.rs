//! The JSON route handlers for transactions.
//!
//! Handlers are thin: they extract the caller's identity and the request
//! data, delegate to the service functions, and serialize the result.

use axum::{
    Extension, Json,
    extract::{FromRef, Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    AppState, Error, database_id::TransactionId, pagination::PaginationConfig, user::UserID,
};

use super::{
    core::{Transaction, TransactionForm},
    filter::TransactionFilterParams,
    service::{
        DeletedTransaction, TransactionPage, create_transaction, delete_transaction,
        get_transaction, list_transactions, update_transaction,
    },
    sqlite::SQLiteTransactionStore,
};

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The store for managing transactions.
    pub store: SQLiteTransactionStore,
    /// The config that controls page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.transaction_store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for listing the caller's transactions.
///
/// Query parameters that cannot be parsed are ignored, as are repeats of a
/// parameter.
pub async fn list_transactions_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TransactionPage>, Error> {
    let params = TransactionFilterParams::from_pairs(pairs);

    list_transactions(&state.store, user_id, &params, &state.pagination_config).map(Json)
}

/// A route handler for recording a new transaction, responds with 201 Created.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let form = parse_form(form)?;
    let transaction = create_transaction(&state.store, user_id, form)?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

/// A route handler for getting one of the caller's transactions.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<String>,
) -> Result<Json<Transaction>, Error> {
    let id = parse_transaction_id(&transaction_id)?;

    get_transaction(&state.store, user_id, id).map(Json)
}

/// A route handler for changing the fields of one of the caller's transactions.
pub async fn update_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<String>,
    form: Result<Json<TransactionForm>, JsonRejection>,
) -> Result<Json<Transaction>, Error> {
    let id = parse_transaction_id(&transaction_id)?;
    let form = parse_form(form)?;

    update_transaction(&state.store, user_id, id, form).map(Json)
}

/// A route handler for deleting one of the caller's transactions.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Extension(user_id): Extension<UserID>,
    Path(transaction_id): Path<String>,
) -> Result<Json<DeletedTransaction>, Error> {
    let id = parse_transaction_id(&transaction_id)?;

    delete_transaction(&state.store, user_id, id).map(Json)
}

/// IDs that are not integers cannot refer to a transaction.
fn parse_transaction_id(text: &str) -> Result<TransactionId, Error> {
    text.parse().map_err(|_| Error::NotFound)
}

fn parse_form(form: Result<Json<TransactionForm>, JsonRejection>) -> Result<TransactionForm, Error> {
    match form {
        Ok(Json(form)) => Ok(form),
        Err(rejection) => {
            tracing::debug!("Rejected transaction body: {rejection}");
            Err(Error::Validation(rejection.body_text()))
        }
    }
}
