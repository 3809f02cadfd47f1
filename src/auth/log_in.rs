//! The log-in page and endpoint.

use axum::{
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{Form, PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use time::{Duration, UtcOffset};

use crate::{
    AppState, Error,
    alert::Alert,
    auth::cookie::set_auth_cookie,
    auth::redirect::is_safe_redirect_url,
    auth::user::{UserID, get_user_by_id},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, base, link, loading_spinner, log_in_register},
    timezone::get_local_offset,
};

/// How long the auth cookie lasts when "remember me" is ticked.
pub const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect password.";

/// The state needed for the log-in route.
#[derive(Debug, Clone)]
pub struct LogInState {
    /// The key for the auth cookie.
    pub cookie_key: Key,
    /// How long the auth cookie lasts without "remember me".
    pub cookie_duration: Duration,
    /// The timezone used for cookie expiry times.
    pub local_timezone: String,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LogInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<LogInState> for Key {
    fn from_ref(state: &LogInState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for a log-in attempt.
#[derive(Debug, Deserialize)]
pub struct LogInData {
    /// The user's password.
    pub password: String,
    /// Set when the "remember me" checkbox is ticked.
    pub remember_me: Option<String>,
    /// The page to return to after logging in.
    pub redirect_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    redirect_url: Option<String>,
}

/// Display the log-in page.
pub async fn get_log_in_page(Query(query): Query<RedirectQuery>) -> Markup {
    let redirect_url = parse_redirect_url(query.redirect_url);

    base(
        "Log In",
        &[],
        &log_in_register(
            "Sign in to your account",
            &log_in_form(None, redirect_url.as_deref()),
        ),
    )
}

/// Handle a log-in attempt.
///
/// Sets the auth cookie and redirects on success, otherwise re-renders the
/// form with an error message.
pub async fn post_log_in(
    State(state): State<LogInState>,
    jar: PrivateCookieJar,
    Form(log_in_data): Form<LogInData>,
) -> Response {
    let user = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_alert_response();
            }
        };

        get_user_by_id(UserID::new(1), &connection)
    };

    let user = match user {
        Ok(user) => user,
        Err(Error::NotFound) => {
            let form = log_in_form(
                Some("Password not set, go to the registration page to create a password."),
                log_in_data.redirect_url.as_deref(),
            );

            return (StatusCode::UNPROCESSABLE_ENTITY, form).into_response();
        }
        Err(error) => {
            tracing::error!("could not look up user: {error}");
            return error.into_alert_response();
        }
    };

    match user.password_hash.verify(&log_in_data.password) {
        Ok(true) => {}
        Ok(false) => {
            let form = log_in_form(
                Some(INVALID_CREDENTIALS_ERROR_MSG),
                log_in_data.redirect_url.as_deref(),
            );

            return (StatusCode::UNPROCESSABLE_ENTITY, form).into_response();
        }
        Err(error) => {
            tracing::error!("could not verify password: {error}");
            return Alert::ErrorSimple {
                message: "Something went wrong, please try again.".to_owned(),
            }
            .into_response();
        }
    }

    let cookie_duration = if log_in_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    let local_offset = get_local_offset(&state.local_timezone).unwrap_or(UtcOffset::UTC);

    let redirect_url = parse_redirect_url(log_in_data.redirect_url)
        .unwrap_or_else(|| endpoints::DASHBOARD_VIEW.to_owned());

    set_auth_cookie(jar, user.id, cookie_duration, local_offset)
        .map(|jar| (StatusCode::SEE_OTHER, HxRedirect(redirect_url), jar))
        .map_err(|error| {
            tracing::error!("could not set auth cookie: {error}");

            Alert::ErrorSimple {
                message: "Something went wrong, please try again.".to_owned(),
            }
        })
        .into_response()
}

fn parse_redirect_url(redirect_url: Option<String>) -> Option<String> {
    redirect_url.filter(|url| is_safe_redirect_url(url))
}

fn log_in_form(error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            class="space-y-4 md:space-y-6"
            hx-post=(endpoints::LOG_IN_API)
            hx-swap="outerHTML"
        {
            @if let Some(redirect_url) = redirect_url
            {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            div
            {
                label for="password" class=(FORM_LABEL_STYLE) { "Password" }

                input
                    type="password"
                    name="password"
                    id="password"
                    placeholder="••••••••"
                    class="bg-gray-50 border border-gray-300 text-gray-900 rounded-lg focus:ring-blue-600 focus:border-blue-600 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500"
                    required
                    autofocus;

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500" { (error_message) }
                }
            }

            div class="flex items-center justify-between"
            {
                div class="flex items-start"
                {
                    div class="flex items-center h-5"
                    {
                        input
                            id="remember_me"
                            name="remember_me"
                            aria-describedby="remember_me"
                            type="checkbox"
                            class="w-4 h-4 border border-gray-300 rounded-sm bg-gray-50 focus:ring-3 focus:ring-blue-300 dark:bg-gray-700 dark:border-gray-600 dark:focus:ring-blue-600 dark:ring-offset-gray-800";
                    }

                    div class="ml-3 text-sm"
                    {
                        label for="remember_me" class="text-gray-500 dark:text-gray-300" { "Remember me" }
                    }
                }

                p class="text-sm"
                {
                    (link(endpoints::FORGOT_PASSWORD_VIEW, "Forgot password?"))
                }
            }

            button
                type="submit"
                class=(BUTTON_PRIMARY_STYLE)
        	{
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                "Sign in"
            }
        }
    }
}

#[cfg(test)]
mod log_in_route_tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        auth::cookie::COOKIE_TOKEN,
        auth::password::PasswordHash,
        auth::user::create_user,
        endpoints,
        test_utils::{
            assert_form_error_message, assert_hx_endpoint, assert_valid_html, must_get_form,
            parse_document_text, parse_html_fragment,
        },
    };

    use super::{get_log_in_page, post_log_in};

    const TEST_PASSWORD: &str = "averylongandstrongpassword";

    fn test_server_with_user() -> TestServer {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "42", "Etc/UTC".to_owned()).unwrap();

        {
            let connection = state.db_connection.lock().unwrap();
            let hash = PasswordHash::from_raw_password(TEST_PASSWORD, 4).unwrap();
            create_user(hash, &connection).unwrap();
        }

        let app = Router::new()
            .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
            .route(endpoints::LOG_IN_API, axum::routing::post(post_log_in))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn log_in_page_contains_form() {
        let server = test_server_with_user();

        let response = server.get(endpoints::LOG_IN_VIEW).await;

        response.assert_status_ok();
        let html = parse_document_text(&response.text());
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::LOG_IN_API);
    }

    #[tokio::test]
    async fn correct_password_sets_cookie_and_redirects() {
        let server = test_server_with_user();

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", TEST_PASSWORD)])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("HX-Redirect"),
            endpoints::DASHBOARD_VIEW
        );
        assert!(!response.cookie(COOKIE_TOKEN).value().is_empty());
    }

    #[tokio::test]
    async fn wrong_password_re_renders_form_with_error() {
        let server = test_server_with_user();

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", "wrong password entirely")])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(&response.text());
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Incorrect password.");
    }

    #[tokio::test]
    async fn redirect_url_is_preserved() {
        let server = test_server_with_user();

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[
                ("password", TEST_PASSWORD),
                ("redirect_url", endpoints::BUDGETS_VIEW),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("HX-Redirect"), endpoints::BUDGETS_VIEW);
    }

    #[tokio::test]
    async fn unsafe_redirect_url_falls_back_to_dashboard() {
        let server = test_server_with_user();

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[
                ("password", TEST_PASSWORD),
                ("redirect_url", "https://evil.example/"),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("HX-Redirect"),
            endpoints::DASHBOARD_VIEW
        );
    }

    #[tokio::test]
    async fn log_in_without_user_prompts_registration() {
        let connection = Connection::open_in_memory().unwrap();
        let state = AppState::new(connection, "42", "Etc/UTC".to_owned()).unwrap();
        let app = Router::new()
            .route(endpoints::LOG_IN_API, axum::routing::post(post_log_in))
            .with_state(state);
        let server = TestServer::new(app);

        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("password", TEST_PASSWORD)])
            .await;

        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(&response.text());
        let form = must_get_form(&html);
        assert_form_error_message(
            &form,
            "Password not set, go to the registration page to create a password.",
        );
    }

    #[tokio::test]
    async fn log_in_page_is_valid_document() {
        let server = test_server_with_user();

        let response = server.get(endpoints::LOG_IN_VIEW).await;

        let html = parse_document_text(&response.text());
        assert_valid_html(&html);
    }
}
