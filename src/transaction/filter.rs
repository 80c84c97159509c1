//! Compiles the query string of a transaction listing into a typed filter and
//! page request.
//!
//! Filter parameters are fail-soft: a value that cannot be parsed is treated
//! as if it was not given, rather than failing the request.

use serde::Deserialize;
use time::Date;

use crate::{
    pagination::{Pagination, PaginationConfig},
    user::UserID,
};

use super::{
    core::{parse_amount, parse_date},
    search::SearchQuery,
};

/// The raw query parameters for listing transactions.
///
/// All values are kept as strings so that malformed values can be ignored
/// instead of rejecting the whole request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionFilterParams {
    /// Free-text search over title and notes.
    pub search: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Inclusive lower bound on the amount.
    pub min_amount: Option<String>,
    /// Inclusive upper bound on the amount.
    pub max_amount: Option<String>,
    /// Inclusive lower bound on the date.
    pub start_date: Option<String>,
    /// Inclusive upper bound on the date.
    pub end_date: Option<String>,
    /// The 1-indexed page number.
    pub page: Option<String>,
    /// The page size.
    pub limit: Option<String>,
}

impl TransactionFilterParams {
    /// Collect the params from decoded query string pairs.
    ///
    /// The first value of a repeated key wins and unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();

        for (key, value) in pairs {
            let field = match key.as_str() {
                "search" => &mut params.search,
                "category" => &mut params.category,
                "minAmount" => &mut params.min_amount,
                "maxAmount" => &mut params.max_amount,
                "startDate" => &mut params.start_date,
                "endDate" => &mut params.end_date,
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };

            if field.is_none() {
                *field = Some(value);
            }
        }

        params
    }
}

/// A conjunction of constraints that selects one user's transactions.
///
/// `None` fields do not restrict the selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionFilter {
    /// Only transactions owned by this user are selected.
    pub user_id: UserID,
    /// Title or notes contain any of the search words.
    pub search: Option<SearchQuery>,
    /// The category equals this value.
    pub category: Option<String>,
    /// The amount is at least this value.
    pub min_amount: Option<f64>,
    /// The amount is at most this value.
    pub max_amount: Option<f64>,
    /// The date is on or after this date.
    pub start_date: Option<Date>,
    /// The date is on or before this date.
    pub end_date: Option<Date>,
}

impl TransactionFilter {
    /// A filter that selects all of `user_id`'s transactions.
    pub fn for_user(user_id: UserID) -> Self {
        Self {
            user_id,
            search: None,
            category: None,
            min_amount: None,
            max_amount: None,
            start_date: None,
            end_date: None,
        }
    }
}

/// Compile `params` into a filter scoped to `user_id` and a page request.
///
/// The owner constraint always comes from `user_id` and can not be set by
/// the request.
pub fn compile_filter(
    user_id: UserID,
    params: &TransactionFilterParams,
    config: &PaginationConfig,
) -> (TransactionFilter, Pagination) {
    let filter = TransactionFilter {
        user_id,
        search: present(&params.search).and_then(SearchQuery::parse),
        category: present(&params.category).map(str::to_owned),
        min_amount: present(&params.min_amount).and_then(parse_amount),
        max_amount: present(&params.max_amount).and_then(parse_amount),
        start_date: present(&params.start_date).and_then(parse_date),
        end_date: present(&params.end_date).and_then(parse_date),
    };

    let pagination = Pagination::new(
        parse_page(&params.page),
        parse_page_size(&params.limit, config),
    );

    tracing::debug!("Compiled transaction filter {filter:?} with {pagination:?}");

    (filter, pagination)
}

fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Non-numeric pages default to the first page, pages below 1 clamp to 1.
fn parse_page(page: &Option<String>) -> u64 {
    present(page)
        .and_then(|page| page.parse::<i64>().ok())
        .map_or(1, |page| page.max(1) as u64)
}

/// Non-numeric or non-positive sizes use the default, large sizes clamp to the maximum.
fn parse_page_size(limit: &Option<String>, config: &PaginationConfig) -> u64 {
    present(limit)
        .and_then(|limit| limit.parse::<i64>().ok())
        .filter(|&limit| limit >= 1)
        .map_or(config.default_page_size, |limit| limit as u64)
        .min(config.max_page_size)
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        pagination::{Pagination, PaginationConfig},
        transaction::{
            filter::{TransactionFilter, TransactionFilterParams, compile_filter},
            search::SearchQuery,
        },
        user::UserID,
    };

    const USER: UserID = UserID::new(1);

    fn compile(params: TransactionFilterParams) -> (TransactionFilter, Pagination) {
        compile_filter(USER, &params, &PaginationConfig::default())
    }

    fn some(value: &str) -> Option<String> {
        Some(value.to_owned())
    }

    #[test]
    fn no_params_selects_everything_for_user() {
        let (filter, pagination) = compile(TransactionFilterParams::default());

        assert_eq!(filter, TransactionFilter::for_user(USER));
        assert_eq!(pagination, Pagination::new(1, 10));
    }

    #[test]
    fn compiles_every_filter() {
        let params = TransactionFilterParams {
            search: some("coffee"),
            category: some("Food"),
            min_amount: some("5"),
            max_amount: some("20.5"),
            start_date: some("2024-01-01"),
            end_date: some("2024-01-31"),
            page: some("2"),
            limit: some("25"),
        };

        let (filter, pagination) = compile(params);

        assert_eq!(
            filter,
            TransactionFilter {
                user_id: USER,
                search: SearchQuery::parse("coffee"),
                category: some("Food"),
                min_amount: Some(5.0),
                max_amount: Some(20.5),
                start_date: Some(date!(2024 - 01 - 01)),
                end_date: Some(date!(2024 - 01 - 31)),
            }
        );
        assert_eq!(pagination, Pagination::new(2, 25));
    }

    #[test]
    fn blank_values_are_absent() {
        let params = TransactionFilterParams {
            search: some("  "),
            category: some(""),
            min_amount: some(" "),
            start_date: some(""),
            ..Default::default()
        };

        let (filter, _) = compile(params);

        assert_eq!(filter, TransactionFilter::for_user(USER));
    }

    #[test]
    fn malformed_values_are_absent() {
        let params = TransactionFilterParams {
            search: some("?!"),
            min_amount: some("cheap"),
            max_amount: some("NaN"),
            start_date: some("last week"),
            end_date: some("2024-02-31"),
            ..Default::default()
        };

        let (filter, _) = compile(params);

        assert_eq!(filter, TransactionFilter::for_user(USER));
    }

    #[test]
    fn category_is_trimmed() {
        let (filter, _) = compile(TransactionFilterParams {
            category: some(" Transport "),
            ..Default::default()
        });

        assert_eq!(filter.category, some("Transport"));
    }

    #[test]
    fn page_below_one_is_clamped() {
        for page in ["0", "-3"] {
            let (_, pagination) = compile(TransactionFilterParams {
                page: some(page),
                ..Default::default()
            });

            assert_eq!(pagination.page, 1, "want page 1 for page={page}");
        }
    }

    #[test]
    fn non_numeric_page_defaults_to_first_page() {
        let (_, pagination) = compile(TransactionFilterParams {
            page: some("two"),
            ..Default::default()
        });

        assert_eq!(pagination.page, 1);
    }

    #[test]
    fn invalid_limit_uses_default_page_size() {
        for limit in ["0", "-1", "ten", "2.5"] {
            let (_, pagination) = compile(TransactionFilterParams {
                limit: some(limit),
                ..Default::default()
            });

            assert_eq!(pagination.page_size, 10, "want default size for limit={limit}");
        }
    }

    #[test]
    fn large_limit_is_clamped_to_max_page_size() {
        let (_, pagination) = compile(TransactionFilterParams {
            limit: some("5000"),
            ..Default::default()
        });

        assert_eq!(pagination.page_size, 100);
    }

    #[test]
    fn uses_configured_default_page_size() {
        let config = PaginationConfig {
            default_page_size: 3,
            max_page_size: 50,
        };

        let (_, pagination) = compile_filter(USER, &TransactionFilterParams::default(), &config);

        assert_eq!(pagination.page_size, 3);
    }

    #[test]
    fn first_value_of_repeated_key_wins() {
        let params = TransactionFilterParams::from_pairs([
            ("page".to_owned(), "1".to_owned()),
            ("category".to_owned(), "Food".to_owned()),
            ("page".to_owned(), "2".to_owned()),
            ("category".to_owned(), "Health".to_owned()),
            ("sort".to_owned(), "asc".to_owned()),
            ("minAmount".to_owned(), "15".to_owned()),
        ]);

        assert_eq!(
            params,
            TransactionFilterParams {
                category: some("Food"),
                min_amount: some("15"),
                page: some("1"),
                ..Default::default()
            }
        );
    }

    #[test]
    fn deserializes_camel_case_query_string() {
        let params: TransactionFilterParams = serde_json::from_value(serde_json::json!({
            "minAmount": "15",
            "startDate": "2024-01-01",
            "page": "x",
        }))
        .unwrap();

        assert_eq!(params.min_amount, some("15"));
        assert_eq!(params.start_date, some("2024-01-01"));
        assert_eq!(params.page, some("x"));
    }
}
