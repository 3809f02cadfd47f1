//! Centavo is a self-hosted web app for tracking your personal finances.
//!
//! This library provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

pub mod alert;
pub mod app_state;
pub mod auth;
pub mod budget;
pub mod category;
pub mod dashboard;
pub mod database_id;
pub mod db;
pub mod endpoints;
pub mod goal;
pub mod html;
pub mod internal_server_error;
pub mod logging;
pub mod navigation;
pub mod not_found;
pub mod routing;
pub mod statement;
pub mod subscription;
pub mod timezone;
pub mod transaction;
pub mod wallet;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{PasswordHash, User, UserID, ValidatedPassword, get_user_by_id};
pub use db::initialize as initialize_db;
pub use logging::logging_middleware;
pub use routing::build_router;

use crate::{
    alert::Alert,
    internal_server_error::get_internal_server_error_response,
    not_found::get_404_not_found_response,
    wallet::WalletId,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The user provided an invalid password.
    #[error("invalid password")]
    InvalidCredentials,

    /// The auth token cookie is missing from the cookie jar in the request.
    #[error("no cookies in the cookie jar :(")]
    CookieMissing,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    /// When communicating with the application client this error should be
    /// replaced with a general error type indicating an internal server error.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The wallet ID used to create a transaction did not match a valid wallet.
    #[error("the wallet ID does not refer to a valid wallet")]
    InvalidWallet(Option<WalletId>),

    /// An empty string was used to create a wallet name.
    #[error("Wallet name cannot be empty")]
    EmptyWalletName,

    /// A category name shorter than two characters was supplied.
    #[error("Category name must be at least two characters long")]
    CategoryNameTooShort,

    /// The category name already exists in the database.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryName(String),

    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A zero or negative amount was supplied where a positive amount is
    /// required.
    #[error("the amount must be greater than zero")]
    NonPositiveAmount,

    /// A subscription billing day outside of 1-31 was supplied.
    #[error("{0} is not a valid day of the month")]
    InvalidBillingDay(u8),

    /// The specified import ID already exists in the database.
    ///
    /// When importing transactions from a bank statement, an import ID is used
    /// to uniquely identify each transaction. Rejecting duplicate import IDs
    /// avoids importing the same transaction multiple times, which is likely
    /// to happen if the user uploads statements that overlap in time.
    #[error("the import ID already exists in the database")]
    DuplicateImportId,

    /// The multipart form could not be parsed as a list of statement files.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The multipart form did not contain an OFX statement file.
    #[error("File is not an OFX statement")]
    NotOfx,

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON.
    #[error("could not serialize as JSON: {0}")]
    JsonSerializationError(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to delete a transaction that does not exist.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a transaction that does not exist.
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a wallet that does not exist.
    #[error("tried to delete a wallet that is not in the database")]
    DeleteMissingWallet,

    /// Tried to delete a wallet that still has transactions linked to it.
    #[error("the wallet still has transactions linked to it")]
    WalletHasTransactions,

    /// Tried to delete a category that does not exist.
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to delete a budget that does not exist.
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to delete a goal that does not exist.
    #[error("tried to delete a goal that is not in the database")]
    DeleteMissingGoal,

    /// Tried to update a goal that does not exist.
    #[error("tried to update a goal that is not in the database")]
    UpdateMissingGoal,

    /// Tried to delete a subscription that does not exist.
    #[error("tried to delete a subscription that is not in the database")]
    DeleteMissingSubscription,

    /// Tried to update a subscription that does not exist.
    #[error("tried to update a subscription that is not in the database")]
    UpdateMissingSubscription,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("transaction.import_id") =>
            {
                Error::DuplicateImportId
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.ends_with("category.name") =>
            {
                Error::DuplicateCategoryName(String::new())
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => get_internal_server_error_response(
                "Invalid Timezone Settings",
                &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            ),
            Error::DatabaseLockError => get_internal_server_error_response(
                "Sorry, something went wrong.",
                "Try again later or check the server logs",
            ),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                get_internal_server_error_response(
                    "Sorry, something went wrong.",
                    "Try again later or check the server logs",
                )
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Invalid Timezone Settings".to_owned(),
                    details: format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings \
                        and ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                }
                .into_html(),
            )
                .into_response(),
            Error::FutureDate(date) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid transaction date".to_owned(),
                    details: format!(
                        "{date} is a date in the future, which is not allowed. \
                        Change the date to today or earlier."
                    ),
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidWallet(wallet_id) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Invalid wallet ID".to_owned(),
                    details: format!("Could not find a wallet with the ID {wallet_id:?}"),
                }
                .into_html(),
            )
                .into_response(),
            Error::NonPositiveAmount => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: "The amount must be greater than zero.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::InvalidBillingDay(day) => (
                StatusCode::BAD_REQUEST,
                Alert::ErrorSimple {
                    message: format!(
                        "{day} is not a valid billing day, use a day between 1 and 31."
                    ),
                }
                .into_html(),
            )
                .into_response(),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update transaction".to_owned(),
                    details: "The transaction could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete transaction".to_owned(),
                    details: "The transaction could not be found. Try refreshing the page to \
                        see if the transaction has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingWallet => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete wallet".to_owned(),
                    details: "The wallet could not be found. Try refreshing the page to see \
                        if the wallet has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::WalletHasTransactions => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not delete wallet".to_owned(),
                    details: "The wallet still has transactions linked to it. Reassign or \
                        delete those transactions first."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category could not be found. Try refreshing the page to see \
                        if the category has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DuplicateCategoryName(name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Duplicate category name".to_owned(),
                    details: format!(
                        "The category {name} already exists in the database. Choose a \
                        different name, or delete the existing category."
                    ),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingBudget => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete budget".to_owned(),
                    details: "The budget could not be found. Try refreshing the page to see \
                        if the budget has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingGoal => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete goal".to_owned(),
                    details: "The goal could not be found. Try refreshing the page to see \
                        if the goal has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::UpdateMissingGoal => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update goal".to_owned(),
                    details: "The goal could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::DeleteMissingSubscription => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete subscription".to_owned(),
                    details: "The subscription could not be found. Try refreshing the page to \
                        see if the subscription has already been deleted."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            Error::UpdateMissingSubscription => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not update subscription".to_owned(),
                    details: "The subscription could not be found.".to_owned(),
                }
                .into_html(),
            )
                .into_response(),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more \
                        details."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response(),
        }
    }
}
