//! Implements a SQLite backed transaction store.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Row, ToSql, params_from_iter};
use time::OffsetDateTime;

use crate::{Error, database_id::TransactionId, user::UserID};

use super::{
    core::{Transaction, TransactionBuilder, TransactionChanges},
    filter::TransactionFilter,
    store::{GroupKey, GroupTotal, SortOrder, TransactionStore},
};

const COLUMNS: &str = "id, user_id, title, amount, category, date, notes, created_at, updated_at";

/// Stores transactions in a SQLite database.
///
/// Cloning the store is cheap, clones share the same connection.
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    ///
    /// The database must have been set up with [crate::initialize_db].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

/// SQL clauses with numbered parameters (`?1`, `?2`, ...) and their values.
#[derive(Default)]
struct SqlParts {
    clauses: Vec<String>,
    values: Vec<Box<dyn ToSql>>,
}

impl SqlParts {
    /// Bind `value` and return its placeholder.
    fn bind(&mut self, value: impl ToSql + 'static) -> String {
        self.values.push(Box::new(value));
        format!("?{}", self.values.len())
    }

    /// Add a clause, `{}` in `clause` is replaced with the placeholder for `value`.
    fn push(&mut self, clause: &str, value: impl ToSql + 'static) {
        let placeholder = self.bind(value);
        self.clauses.push(clause.replace("{}", &placeholder));
    }

    fn params(&self) -> impl rusqlite::Params + '_ {
        params_from_iter(self.values.iter())
    }
}

/// Build the WHERE clause for `filter` and bind its parameters.
///
/// The owner constraint is always present, so the clause is never empty.
fn build_where_clause(filter: &TransactionFilter) -> (String, SqlParts) {
    let mut parts = SqlParts::default();

    parts.push("user_id = {}", filter.user_id.as_i64());

    if let Some(search) = &filter.search {
        parts.push(
            "id IN (SELECT rowid FROM transaction_search WHERE transaction_search MATCH {})",
            search.to_fts_query(),
        );
    }

    if let Some(category) = &filter.category {
        parts.push("category = {}", category.clone());
    }

    if let Some(min_amount) = filter.min_amount {
        parts.push("amount >= {}", min_amount);
    }

    if let Some(max_amount) = filter.max_amount {
        parts.push("amount <= {}", max_amount);
    }

    if let Some(start_date) = filter.start_date {
        parts.push("date >= {}", start_date);
    }

    if let Some(end_date) = filter.end_date {
        parts.push("date <= {}", end_date);
    }

    let where_clause = format!("WHERE {}", parts.clauses.join(" AND "));

    (where_clause, parts)
}

/// SQLite integers are signed, values past `i64::MAX` are clamped.
fn to_sql_integer(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

impl TransactionStore for SQLiteTransactionStore {
    fn find(
        &self,
        filter: &TransactionFilter,
        sort: SortOrder,
        offset: u64,
        limit: Option<u64>,
    ) -> Result<Vec<Transaction>, Error> {
        let direction = match sort {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        };

        let (where_clause, mut parts) = build_where_clause(filter);
        // A negative limit means no limit in SQLite.
        let limit = parts.bind(limit.map_or(-1, to_sql_integer));
        let offset = parts.bind(to_sql_integer(offset));

        // Sort by date, and then ID to keep transaction order stable across pages.
        let query = format!(
            "SELECT {COLUMNS} FROM transactions {where_clause} \
            ORDER BY date {direction}, id {direction} \
            LIMIT {limit} OFFSET {offset}"
        );

        let connection = self.lock()?;
        let mut statement = connection.prepare(&query)?;
        let transactions = statement
            .query_map(parts.params(), map_transaction_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    fn count(&self, filter: &TransactionFilter) -> Result<u64, Error> {
        let (where_clause, parts) = build_where_clause(filter);
        let query = format!("SELECT COUNT(id) FROM transactions {where_clause}");

        let count: i64 = self
            .lock()?
            .query_row(&query, parts.params(), |row| row.get(0))?;

        Ok(count.max(0) as u64)
    }

    fn get(&self, id: TransactionId) -> Result<Option<Transaction>, Error> {
        let transaction = self
            .lock()?
            .query_row(
                &format!("SELECT {COLUMNS} FROM transactions WHERE id = ?1"),
                [id],
                map_transaction_row,
            )
            .optional()?;

        Ok(transaction)
    }

    fn create(&self, user_id: UserID, builder: TransactionBuilder) -> Result<Transaction, Error> {
        let now = OffsetDateTime::now_utc();

        let transaction = self.lock()?.query_row(
            &format!(
                "INSERT INTO transactions \
                (user_id, title, amount, category, date, notes, created_at, updated_at) \
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7) \
                RETURNING {COLUMNS}"
            ),
            (
                user_id.as_i64(),
                builder.title,
                builder.amount,
                builder.category,
                builder.date,
                builder.notes,
                now,
            ),
            map_transaction_row,
        )?;

        tracing::info!(
            "Created transaction {} for user {user_id}",
            transaction.id
        );

        Ok(transaction)
    }

    fn update(
        &self,
        id: TransactionId,
        changes: TransactionChanges,
    ) -> Result<Option<Transaction>, Error> {
        let mut parts = SqlParts::default();

        if let Some(title) = changes.title {
            parts.push("title = {}", title);
        }

        if let Some(amount) = changes.amount {
            parts.push("amount = {}", amount);
        }

        if let Some(category) = changes.category {
            parts.push("category = {}", category);
        }

        if let Some(date) = changes.date {
            parts.push("date = {}", date);
        }

        if let Some(notes) = changes.notes {
            parts.push("notes = {}", notes);
        }

        parts.push("updated_at = {}", OffsetDateTime::now_utc());
        let assignments = parts.clauses.join(", ");
        let id_placeholder = parts.bind(id);

        let transaction = self
            .lock()?
            .query_row(
                &format!(
                    "UPDATE transactions SET {assignments} \
                    WHERE id = {id_placeholder} \
                    RETURNING {COLUMNS}"
                ),
                parts.params(),
                map_transaction_row,
            )
            .optional()?;

        if transaction.is_some() {
            tracing::info!("Updated transaction {id}");
        }

        Ok(transaction)
    }

    fn delete(&self, id: TransactionId) -> Result<bool, Error> {
        let rows_affected = self
            .lock()?
            .execute("DELETE FROM transactions WHERE id = ?1", [id])?;

        if rows_affected > 0 {
            tracing::info!("Deleted transaction {id}");
        }

        Ok(rows_affected > 0)
    }

    fn group_sum(
        &self,
        filter: &TransactionFilter,
        key: GroupKey,
    ) -> Result<Vec<GroupTotal>, Error> {
        let column = match key {
            GroupKey::Category => "category",
        };

        let (where_clause, parts) = build_where_clause(filter);
        let query = format!(
            "SELECT {column}, SUM(amount) AS total FROM transactions {where_clause} \
            GROUP BY {column} \
            ORDER BY total DESC, {column} ASC"
        );

        let connection = self.lock()?;
        let mut statement = connection.prepare(&query)?;
        let totals = statement
            .query_map(parts.params(), |row| {
                Ok(GroupTotal {
                    key: row.get(0)?,
                    total: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(totals)
    }

    fn sum(&self, filter: &TransactionFilter) -> Result<f64, Error> {
        let (where_clause, parts) = build_where_clause(filter);
        let query = format!("SELECT COALESCE(SUM(amount), 0.0) FROM transactions {where_clause}");

        let total = self
            .lock()?
            .query_row(&query, parts.params(), |row| row.get(0))?;

        Ok(total)
    }
}

/// Create the transaction table and its search index in the database.
///
/// The full-text index over title and notes is kept in sync with triggers.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL CHECK (title <> ''),
            amount REAL NOT NULL,
            category TEXT NOT NULL CHECK (category <> ''),
            date TEXT NOT NULL,
            notes TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_user_date
            ON transactions(user_id, date DESC, id DESC);

        CREATE VIRTUAL TABLE IF NOT EXISTS transaction_search USING fts5(
            title,
            notes,
            content = 'transactions',
            content_rowid = 'id',
            tokenize = 'porter unicode61'
        );

        CREATE TRIGGER IF NOT EXISTS transactions_after_insert AFTER INSERT ON transactions
        BEGIN
            INSERT INTO transaction_search (rowid, title, notes)
                VALUES (new.id, new.title, new.notes);
        END;

        CREATE TRIGGER IF NOT EXISTS transactions_after_delete AFTER DELETE ON transactions
        BEGIN
            INSERT INTO transaction_search (transaction_search, rowid, title, notes)
                VALUES ('delete', old.id, old.title, old.notes);
        END;

        CREATE TRIGGER IF NOT EXISTS transactions_after_update AFTER UPDATE ON transactions
        BEGIN
            INSERT INTO transaction_search (transaction_search, rowid, title, notes)
                VALUES ('delete', old.id, old.title, old.notes);
            INSERT INTO transaction_search (rowid, title, notes)
                VALUES (new.id, new.title, new.notes);
        END;",
    )
}

/// Map a database row to a Transaction.
///
/// The row must contain the columns in the order of `COLUMNS`.
fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        user: UserID::new(row.get(1)?),
        title: row.get(2)?,
        amount: row.get(3)?,
        category: row.get(4)?,
        date: row.get(5)?,
        notes: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
