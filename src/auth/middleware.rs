//! Authentication middleware that rejects requests without a valid auth cookie.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::PrivateCookieJar;

use super::cookie::get_user_id_from_auth_cookie;

/// Middleware function that checks for a valid authorization cookie.
///
/// The user ID is placed into the request and the request executed normally
/// if the cookie is valid, otherwise a 401 JSON error is returned.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserID>` to receive the user ID.
///
/// **Note**: The app state must provide an `axum_extra::extract::cookie::Key` for decrypting and verifying the cookie contents.
pub async fn auth_guard(jar: PrivateCookieJar, mut request: Request, next: Next) -> Response {
    let user_id = match get_user_id_from_auth_cookie(&jar) {
        Ok(user_id) => user_id,
        Err(error) => {
            tracing::debug!(
                "Rejected request to {} without valid credentials",
                request.uri().path()
            );
            return error.into_response();
        }
    };

    request.extensions_mut().insert(user_id);

    next.run(request).await
}
