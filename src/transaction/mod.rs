//! Transaction management for the expense tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validation of client input
//! - Compiling list query parameters into a typed filter
//! - The `TransactionStore` trait and its SQLite implementation
//! - The owner-scoped list, get, create, update and delete operations
//! - The JSON route handlers

mod core;
mod endpoints;
mod filter;
mod search;
mod service;
mod sqlite;
mod store;

pub use core::{
    AmountInput, Transaction, TransactionBuilder, TransactionChanges, TransactionForm,
};
pub use endpoints::{
    create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
    list_transactions_endpoint, update_transaction_endpoint,
};
pub use filter::{TransactionFilter, TransactionFilterParams, compile_filter};
pub use search::SearchQuery;
pub use service::{
    DeletedTransaction, TransactionPage, create_transaction, delete_transaction, get_transaction,
    list_transactions, update_transaction,
};
pub use sqlite::{SQLiteTransactionStore, create_transaction_table};
pub use store::{GroupKey, GroupTotal, SortOrder, TransactionStore};
