use axum::extract::{Query, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{instrument, warn};

use crate::state::AppState;

use super::dto::{LoginForm, LoginPageQuery};
use super::middleware::SESSION_COOKIE;

/// The single user stays signed in on their own devices.
const SESSION_TTL: time::Duration = time::Duration::days(365 * 10);

pub async fn login_page(Query(query): Query<LoginPageQuery>) -> Html<String> {
    let redirect = escape_attr(query.redirect.as_deref().unwrap_or("/"));
    let error_note = if query.error.is_some() {
        "<p>Wrong password, try again.</p>"
    } else {
        ""
    };

    Html(format!(
        "<!doctype html>\
         <html><head><meta charset=\"utf-8\"><title>Login</title></head><body>\
         {error_note}\
         <form method=\"post\" action=\"/login\">\
         <input type=\"password\" name=\"password\" placeholder=\"Password\" autofocus>\
         <input type=\"hidden\" name=\"redirect\" value=\"{redirect}\">\
         <button type=\"submit\">Login</button>\
         </form></body></html>"
    ))
}

#[instrument(skip(state, jar, form))]
pub async fn login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> impl IntoResponse {
    if !form.password.is_empty() && form.password == state.config.admin_password {
        let cookie = Cookie::build((SESSION_COOKIE, "true"))
            .http_only(true)
            .same_site(SameSite::Lax)
            .path("/")
            .max_age(SESSION_TTL)
            .build();

        // Only same-site paths; an absolute URL here would be an open
        // redirect.
        let target = form
            .redirect
            .as_deref()
            .filter(|r| r.starts_with('/') && !r.starts_with("//"))
            .unwrap_or("/");

        return (jar.add(cookie), Redirect::to(target)).into_response();
    }

    warn!("rejected login attempt");
    Redirect::to("/login?error=1").into_response()
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
