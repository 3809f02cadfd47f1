//! Route guards that require a valid auth cookie.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::{Duration, UtcOffset};

use crate::{
    AppState,
    auth::cookie::{extend_auth_cookie_duration_if_needed, get_token_from_cookies},
    auth::redirect::build_log_in_redirect_url,
    timezone::get_local_offset,
};

/// The state the auth guards need.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The key for decrypting the auth cookie.
    pub cookie_key: Key,
    /// How long a renewed auth cookie stays valid for.
    pub cookie_duration: Duration,
    /// The canonical timezone name used for cookie expiry times.
    pub local_timezone: String,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
        }
    }
}

impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Guard for full page loads. Redirects to the log-in page when the auth
/// cookie is missing, invalid, or expired.
pub async fn auth_guard(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |url| {
        Redirect::to(&url).into_response()
    })
    .await
}

/// Guard for htmx requests. Responds with an `HX-Redirect` header pointing
/// at the log-in page so htmx performs a full page navigation.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |url| {
        (HxRedirect(url), StatusCode::OK).into_response()
    })
    .await
}

async fn auth_guard_internal<F>(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: F,
) -> Response
where
    F: FnOnce(String) -> Response,
{
    let log_in_redirect_url = build_log_in_redirect_url(&request);

    let (mut parts, body) = request.into_parts();

    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(error) => {
            tracing::debug!("could not extract cookie jar: {error:?}");
            return get_redirect(log_in_redirect_url);
        }
    };

    let local_offset = get_local_offset(&state.local_timezone).unwrap_or(UtcOffset::UTC);

    let token = match get_token_from_cookies(&jar) {
        Ok(token) => token,
        Err(error) => {
            tracing::debug!("rejected request with invalid auth cookie: {error}");
            return get_redirect(log_in_redirect_url);
        }
    };

    if token.is_expired(local_offset) {
        tracing::debug!("rejected request with expired auth cookie");
        return get_redirect(log_in_redirect_url);
    }

    let mut request = Request::from_parts(parts, body);
    request.extensions_mut().insert(token.user_id);

    let mut response = next.run(request).await;

    // Keep the session alive while the user is active.
    match extend_auth_cookie_duration_if_needed(jar, state.cookie_duration, local_offset) {
        Ok(jar) => {
            for cookie in jar.iter() {
                match cookie.to_string().parse() {
                    Ok(header_value) => {
                        response.headers_mut().append(SET_COOKIE, header_value);
                    }
                    Err(error) => {
                        tracing::error!("could not set auth cookie header: {error}");
                    }
                }
            }
        }
        Err(error) => {
            tracing::error!("could not extend auth cookie duration: {error}");
        }
    }

    response
}
