//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::json;

use crate::{
    AppState,
    auth::auth_guard,
    dashboard::get_dashboard_summary,
    endpoints,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_transaction_endpoint,
        list_transactions_endpoint, update_transaction_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Every route under `/api` requires a valid auth cookie.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new().route(endpoints::ROOT, get(get_index));

    let protected_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(update_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::DASHBOARD_SUMMARY, get(get_dashboard_summary))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' reports that the server is up.
async fn get_index() -> &'static str {
    "API is running..."
}

async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "Resource not found" })),
    )
        .into_response()
}

#[cfg(test)]
mod routing_tests {
    use serde_json::json;

    use crate::{
        endpoints,
        test_utils::{get_test_server, get_test_state},
    };

    #[tokio::test]
    async fn root_reports_api_is_running() {
        let server = get_test_server(get_test_state());

        let response = server.get(endpoints::ROOT).await;

        response.assert_status_ok();
        response.assert_text("API is running...");
    }

    #[tokio::test]
    async fn unknown_route_is_json_not_found() {
        let server = get_test_server(get_test_state());

        let response = server.get("/api/budgets").await;

        response.assert_status_not_found();
        response.assert_json(&json!({ "message": "Resource not found" }));
    }
}
