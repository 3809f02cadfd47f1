//! The registration page and endpoint.
//!
//! Registration is only available while no password has been set.

use axum::{
    extract::{FromRef, State},
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
    auth::cookie::set_auth_cookie,
    auth::password::{PasswordHash, ValidatedPassword},
    auth::user::{count_users, create_user},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, base, link, loading_spinner, log_in_register,
        password_input,
    },
    timezone::get_local_offset,
};

/// The minimum password length enforced client-side.
pub const PASSWORD_INPUT_MIN_LENGTH: u8 = 14;

/// The state needed for the registration route.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    /// The key for the auth cookie.
    pub cookie_key: Key,
    /// How long the auth cookie lasts.
    pub cookie_duration: Duration,
    /// The timezone used for cookie expiry times.
    pub local_timezone: String,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegistrationState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

impl FromRef<RegistrationState> for Key {
    fn from_ref(state: &RegistrationState) -> Self {
        state.cookie_key.clone()
    }
}

/// The form data for creating the password.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    /// The chosen password.
    pub password: String,
    /// The password typed a second time.
    pub confirm_password: String,
}

/// Display the registration page.
pub async fn get_register_page() -> Markup {
    base(
        "Register",
        &[],
        &log_in_register("Create a password", &register_form("", None)),
    )
}

/// Handle a registration attempt.
///
/// Creates the user, logs them in, and redirects to the log-in page.
pub async fn create_user_endpoint(
    State(state): State<RegistrationState>,
    jar: PrivateCookieJar,
    Form(register_form_data): Form<RegisterForm>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match count_users(&connection) {
        Ok(0) => {}
        Ok(_) => {
            let form = register_form(
                "",
                Some(
                    "A password has already been created, \
                    please log in with your existing password.",
                ),
            );

            return (StatusCode::UNPROCESSABLE_ENTITY, form).into_response();
        }
        Err(error) => {
            tracing::error!("could not count users: {error}");
            return error.into_alert_response();
        }
    }

    if register_form_data.password != register_form_data.confirm_password {
        let form = register_form(&register_form_data.password, Some("Passwords do not match."));

        return (StatusCode::UNPROCESSABLE_ENTITY, form).into_response();
    }

    let validated_password = match ValidatedPassword::new(&register_form_data.password) {
        Ok(password) => password,
        Err(Error::TooWeak(feedback)) => {
            let form = register_form(&register_form_data.password, Some(&feedback));

            return (StatusCode::UNPROCESSABLE_ENTITY, form).into_response();
        }
        Err(error) => {
            tracing::error!("could not validate password: {error}");
            return error.into_alert_response();
        }
    };

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("could not hash password: {error}");
            return error.into_alert_response();
        }
    };

    let user = match create_user(password_hash, &connection) {
        Ok(user) => user,
        Err(error) => {
            tracing::error!("could not create user: {error}");
            return error.into_alert_response();
        }
    };

    let local_offset = get_local_offset(&state.local_timezone).unwrap_or(UtcOffset::UTC);

    match set_auth_cookie(jar, user.id, state.cookie_duration, local_offset) {
        Ok(jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
            jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not set auth cookie: {error}");
            error.into_alert_response()
        }
    }
}

fn register_form(password: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            class="space-y-4 md:space-y-6"
            hx-post=(endpoints::USERS)
            hx-swap="outerHTML"
        {
            (password_input(password, PASSWORD_INPUT_MIN_LENGTH, error_message))

            div
            {
                label for="confirm_password" class=(FORM_LABEL_STYLE) { "Confirm password" }

                input
                    type="password"
                    name="confirm_password"
                    id="confirm_password"
                    placeholder="••••••••"
                    class="bg-gray-50 border border-gray-300 text-gray-900 rounded-lg focus:ring-blue-600 focus:border-blue-600 block w-full p-2.5 dark:bg-gray-700 dark:border-gray-600 dark:placeholder-gray-400 dark:text-white dark:focus:ring-blue-500 dark:focus:border-blue-500"
                    required
                    minlength=(PASSWORD_INPUT_MIN_LENGTH);
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                "Create password"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have a password? "
                (link(endpoints::LOG_IN_VIEW, "Log in here"))
            }
        }
    }
}
