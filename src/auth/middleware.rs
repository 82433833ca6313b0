use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;

pub const SESSION_COOKIE: &str = "auth";

/// Paths reachable without the session cookie.
const PUBLIC_PATHS: &[&str] = &["/login", "/healthz", "/favicon.ico"];

/// Single-user gate over the whole router. Anything not public and not
/// carrying the session cookie is bounced to the login page, with the
/// original path in the query so login can send the visitor back.
pub async fn require_login(jar: CookieJar, request: Request, next: Next) -> Response {
    let path = request.uri().path();

    if PUBLIC_PATHS.iter().any(|public| path.starts_with(public)) {
        return next.run(request).await;
    }

    if jar.get(SESSION_COOKIE).map(|c| c.value()) == Some("true") {
        return next.run(request).await;
    }

    let query = serde_urlencoded::to_string([("redirect", path)]).unwrap_or_default();
    Redirect::to(&format!("/login?{query}")).into_response()
}
