use axum_extra::extract::cookie::{Cookie, SameSite};
use time::OffsetDateTime;

use crate::config::Environment;

pub const SESSION_COOKIE: &str = "accessToken";

/// Builds the HTTP-only session cookie.
///
/// Production relaxes SameSite to `None` (which browsers only accept with
/// `Secure`) so a separately hosted frontend can send it; development keeps
/// `Lax` without `Secure` so plain-http local ports work.
pub fn session_cookie(
    token: String,
    expires_at: OffsetDateTime,
    env: Environment,
) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_expires(expires_at);
    if env.is_production() {
        cookie.set_secure(true);
        cookie.set_same_site(SameSite::None);
    } else {
        cookie.set_secure(false);
        cookie.set_same_site(SameSite::Lax);
    }
    cookie
}
