//! The application state shared between route handlers.

use std::sync::{Arc, Mutex};

use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{Error, auth::DEFAULT_COOKIE_DURATION, db};

/// The state shared between route handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key for signing and encrypting the auth cookie.
    pub cookie_key: Key,
    /// How long the auth cookie stays valid for.
    pub cookie_duration: Duration,
    /// The canonical timezone name used to localise dates, for example
    /// "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new app state, initialising the database schema.
    ///
    /// # Errors
    /// Returns an error if the database tables could not be created.
    pub fn new(
        mut db_connection: Connection,
        cookie_secret: &str,
        local_timezone: String,
    ) -> Result<Self, Error> {
        db::initialize(&mut db_connection)?;

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            local_timezone,
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}

/// Derive a cookie signing key from a secret string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

impl axum::extract::FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
