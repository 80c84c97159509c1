//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/transactions/{transaction_id}', use [format_endpoint].

/// The root route which reports that the API is up.
pub const ROOT: &str = "/";
/// The route for listing and creating transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for reading, updating and deleting a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route for the dashboard summary.
pub const DASHBOARD_SUMMARY: &str = "/api/dashboard/summary";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// Parameters are delimited by curly braces, e.g. `{transaction_id}`.
/// Paths without a parameter are returned unchanged.
#[cfg_attr(not(test), allow(dead_code))]
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_string();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|end| param_start + end + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

#[cfg(test)]
mod tests {
    use super::{TRANSACTION, TRANSACTIONS, format_endpoint};

    #[test]
    fn replaces_parameter() {
        assert_eq!(format_endpoint(TRANSACTION, 42), "/api/transactions/42");
    }

    #[test]
    fn returns_path_without_parameter_unchanged() {
        assert_eq!(format_endpoint(TRANSACTIONS, 42), TRANSACTIONS);
    }

    #[test]
    fn keeps_text_after_parameter() {
        assert_eq!(format_endpoint("/foo/{id}/edit", 7), "/foo/7/edit");
    }
}
