#![allow(missing_docs)]

use std::sync::{Arc, Mutex};

use axum::{Router, extract::Path, routing::post};
use axum_extra::extract::{PrivateCookieJar, cookie::Cookie};
use axum_test::TestServer;
use rusqlite::Connection;

use crate::{
    AppState, PaginationConfig, build_router,
    auth::{COOKIE_USER_ID, DEFAULT_COOKIE_DURATION, set_auth_cookie},
    db::initialize,
    endpoints::format_endpoint,
    transaction::SQLiteTransactionStore,
    user::UserID,
};

const TEST_LOG_IN_ROUTE: &str = "/test/log_in/{user_id}";

/// A transaction store backed by a fresh in-memory database.
pub(crate) fn get_test_store() -> SQLiteTransactionStore {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");
    initialize(&connection).expect("Could not initialize database");

    SQLiteTransactionStore::new(Arc::new(Mutex::new(connection)))
}

pub(crate) fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open in-memory database");

    AppState::new(connection, "test secret", PaginationConfig::default())
        .expect("Could not create app state")
}

/// Stands in for the external log-in service that issues auth cookies.
async fn stub_log_in_route(jar: PrivateCookieJar, Path(user_id): Path<i64>) -> PrivateCookieJar {
    set_auth_cookie(jar, UserID::new(user_id), DEFAULT_COOKIE_DURATION)
}

/// A server for the app's router plus a route that logs in any user.
pub(crate) fn get_test_server(state: AppState) -> TestServer {
    let log_in_routes = Router::new()
        .route(TEST_LOG_IN_ROUTE, post(stub_log_in_route))
        .with_state(state.cookie_key.clone());

    let app = build_router(state).merge(log_in_routes);

    TestServer::new(app)
}

/// Get an auth cookie for `user_id` from a server made by [get_test_server].
pub(crate) async fn log_in(server: &TestServer, user_id: UserID) -> Cookie<'static> {
    let response = server
        .post(&format_endpoint(TEST_LOG_IN_ROUTE, user_id.as_i64()))
        .await;

    response.assert_status_ok();
    response.cookie(COOKIE_USER_ID)
}
