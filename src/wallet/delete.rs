//! The endpoint for deleting a wallet.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::{AppState, Error};

use super::{db::delete_wallet, domain::WalletId};

/// The state needed for deleting a wallet.
#[derive(Debug, Clone)]
pub struct DeleteWalletState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteWalletState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a wallet.
///
/// Wallets that still have transactions attached are refused, so no
/// transaction ever points at a missing wallet.
pub async fn delete_wallet_endpoint(
    State(state): State<DeleteWalletState>,
    Path(wallet_id): Path<WalletId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_wallet(wallet_id, &connection) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("could not delete wallet {wallet_id}: {error}");
            error.into_alert_response()
        }
    }
}
