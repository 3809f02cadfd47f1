//! The endpoint for creating a wallet.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};

use crate::{AppState, Error, endpoints};

use super::{db::create_wallet, domain::WalletName, list::new_wallet_form};

/// The state needed for creating a wallet.
#[derive(Debug, Clone)]
pub struct CreateWalletState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateWalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a wallet.
#[derive(Debug, Deserialize)]
pub struct NewWalletForm {
    /// The wallet's name.
    pub name: String,
}

/// Create a wallet and redirect back to the wallets page.
pub async fn create_wallet_endpoint(
    State(state): State<CreateWalletState>,
    Form(form): Form<NewWalletForm>,
) -> Response {
    let name = match WalletName::new(&form.name) {
        Ok(name) => name,
        Err(error) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                new_wallet_form(Some(&format!("Error: {error}"))),
            )
                .into_response();
        }
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match create_wallet(name, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::WALLETS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create wallet: {error}");
            error.into_alert_response()
        }
    }
}
