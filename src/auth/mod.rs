//! Identifies the user making a request.
//!
//! Users log in through an external service which issues an encrypted
//! `user_id` cookie. The [auth_guard] middleware reads that cookie and
//! rejects requests that do not have a valid one.

mod cookie;
mod middleware;

pub use cookie::{DEFAULT_COOKIE_DURATION, set_auth_cookie};
pub use middleware::auth_guard;

#[cfg(test)]
pub(crate) use cookie::COOKIE_USER_ID;
