//! The operations on a user's transactions.
//!
//! Every operation takes the authenticated user's ID and only ever exposes
//! transactions that the user owns.

use serde::Serialize;
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId, pagination::PaginationConfig, user::UserID};

use super::{
    core::{Transaction, TransactionForm},
    filter::{TransactionFilterParams, compile_filter},
    store::{SortOrder, TransactionStore},
};

/// One page of a user's transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    /// The transactions on the page, newest first.
    pub items: Vec<Transaction>,
    /// The 1-indexed page number.
    pub page: u64,
    /// The number of pages, at least 1.
    pub total_pages: u64,
    /// The number of transactions matching the filter across all pages.
    pub total: u64,
}

/// The response to deleting a transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedTransaction {
    /// The ID of the deleted transaction.
    pub id: TransactionId,
}

/// List the user's transactions that match `params`, one page at a time.
///
/// # Errors
/// Returns an error if the store fails.
pub fn list_transactions<S: TransactionStore>(
    store: &S,
    user_id: UserID,
    params: &TransactionFilterParams,
    config: &PaginationConfig,
) -> Result<TransactionPage, Error> {
    let (filter, pagination) = compile_filter(user_id, params, config);

    let total = store.count(&filter)?;
    let items = store.find(
        &filter,
        SortOrder::Descending,
        pagination.offset(),
        Some(pagination.page_size),
    )?;

    Ok(TransactionPage {
        items,
        page: pagination.page,
        total_pages: pagination.page_count(total),
        total,
    })
}

/// Get a transaction owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] if there is no transaction with `id` and
/// [Error::Unauthorized] if it belongs to another user.
pub fn get_transaction<S: TransactionStore>(
    store: &S,
    user_id: UserID,
    id: TransactionId,
) -> Result<Transaction, Error> {
    let transaction = store.get(id)?.ok_or(Error::NotFound)?;

    if transaction.user != user_id {
        tracing::warn!(
            "User {user_id} tried to access transaction {id} owned by user {}",
            transaction.user
        );
        return Err(Error::Unauthorized);
    }

    Ok(transaction)
}

/// Validate `form` and record it as a new transaction for `user_id`.
///
/// A missing date defaults to the current UTC date.
///
/// # Errors
/// Returns [Error::Validation] if the form is incomplete or malformed.
pub fn create_transaction<S: TransactionStore>(
    store: &S,
    user_id: UserID,
    form: TransactionForm,
) -> Result<Transaction, Error> {
    let builder = form.into_builder(OffsetDateTime::now_utc().date())?;

    store.create(user_id, builder)
}

/// Apply the fields present in `form` to a transaction owned by `user_id`.
///
/// Ownership is checked before the form is validated. A form with no fields
/// leaves the transaction untouched.
///
/// # Errors
/// Returns [Error::NotFound] or [Error::Unauthorized] as for
/// [get_transaction], and [Error::Validation] if a present field is invalid.
pub fn update_transaction<S: TransactionStore>(
    store: &S,
    user_id: UserID,
    id: TransactionId,
    form: TransactionForm,
) -> Result<Transaction, Error> {
    let existing = get_transaction(store, user_id, id)?;

    let changes = form.into_changes()?;

    if changes.is_empty() {
        return Ok(existing);
    }

    // The transaction may have been deleted since the ownership check.
    store.update(id, changes)?.ok_or(Error::NotFound)
}

/// Delete a transaction owned by `user_id`.
///
/// # Errors
/// Returns [Error::NotFound] or [Error::Unauthorized] as for
/// [get_transaction].
pub fn delete_transaction<S: TransactionStore>(
    store: &S,
    user_id: UserID,
    id: TransactionId,
) -> Result<DeletedTransaction, Error> {
    get_transaction(store, user_id, id)?;

    if store.delete(id)? {
        Ok(DeletedTransaction { id })
    } else {
        Err(Error::NotFound)
    }
}
