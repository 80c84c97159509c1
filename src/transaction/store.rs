//! Defines the transaction store trait.

use crate::{Error, database_id::TransactionId, user::UserID};

use super::{
    core::{Transaction, TransactionBuilder, TransactionChanges},
    filter::TransactionFilter,
};

/// Handles the persistence of transactions.
///
/// Implementers only need to make single record operations atomic, there is
/// no locking across calls.
pub trait TransactionStore: Send + Sync {
    /// Retrieve up to `limit` transactions selected by `filter`, skipping the
    /// first `offset`.
    ///
    /// Transactions are sorted by date in the order `sort`, with ties broken
    /// by ID in the same direction so that paging is deterministic.
    /// A `limit` of `None` returns all remaining transactions.
    fn find(
        &self,
        filter: &TransactionFilter,
        sort: SortOrder,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Transaction>, Error>;

    /// Count the transactions selected by `filter`.
    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error>;

    /// Retrieve a transaction by its ID, regardless of owner.
    fn get(&self, id: TransactionId) -> Result<Option<Transaction>, Error>;

    /// Create a new transaction owned by `user_id`.
    ///
    /// The store assigns the ID and the creation and update timestamps.
    fn create(&self, user_id: UserID, builder: TransactionBuilder) -> Result<Transaction, Error>;

    /// Apply `changes` to the transaction with `id`.
    ///
    /// Returns `None` if there is no such transaction.
    fn update(
        &self,
        id: TransactionId,
        changes: TransactionChanges,
    ) -> Result<Option<Transaction>, Error>;

    /// Delete the transaction with `id`.
    ///
    /// Returns whether a transaction was deleted.
    fn delete(&self, id: TransactionId) -> Result<bool, Error>;

    /// Sum the amounts of the transactions selected by `filter`, grouped by `key`.
    ///
    /// Groups are sorted by total in descending order, ties are sorted by key.
    fn group_sum(
        &self,
        filter: &TransactionFilter,
        key: GroupKey,
    ) -> Result<Vec<GroupTotal>, Error>;

    /// Sum the amounts of the transactions selected by `filter`.
    ///
    /// Returns zero when no transactions are selected.
    fn sum(&self, filter: &TransactionFilter) -> Result<f64, Error>;
}

/// The order to sort transactions in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    Ascending,
    /// Sort in order of decreasing value.
    Descending,
}

/// The field to group transactions by in [TransactionStore::group_sum].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// Group by the transaction category.
    Category,
}

/// The summed amount of one group of transactions.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    /// The value of the grouping field.
    pub key: String,
    /// The sum of the amounts in the group.
    pub total: f64,
}
