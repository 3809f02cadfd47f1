//! The preview endpoint: parse an uploaded statement and show the result
//! for review.

use axum::{
    extract::{FromRef, Multipart, State, multipart::Field},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error,
    alert::Alert,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, loading_spinner,
    },
    transaction::TransactionKind,
    wallet::{Wallet, get_wallets},
};

use super::ofx::{ParsedTransaction, parse_ofx};

/// The state needed for previewing and committing a statement import.
#[derive(Debug, Clone)]
pub struct ImportState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ImportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Parse the uploaded OFX file(s) and render the review form.
pub async fn preview_import_endpoint(
    State(state): State<ImportState>,
    mut multipart: Multipart,
) -> Response {
    let mut transactions = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(error) => {
                tracing::error!("could not read multipart form: {error}");
                return Error::MultipartError(error.to_string()).into_alert_response();
            }
        };

        let text = match parse_multipart_field(field).await {
            Ok(text) => text,
            Err(Error::NotOfx) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Alert::ErrorSimple {
                        message: "File type must be OFX.".to_owned(),
                    }
                    .into_html(),
                )
                    .into_response();
            }
            Err(error) => {
                tracing::error!("could not read uploaded file: {error}");
                return error.into_alert_response();
            }
        };

        transactions.extend(parse_ofx(&text));
    }

    if transactions.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Alert::Error {
                message: "No transactions found".to_owned(),
                details: "The file did not contain any readable transactions. Check that it \
                    is an OFX export from your bank."
                    .to_owned(),
            }
            .into_html(),
        )
            .into_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let wallets = match get_wallets(&connection) {
        Ok(wallets) => wallets,
        Err(error) => {
            tracing::error!("could not get wallets: {error}");
            return error.into_alert_response();
        }
    };

    review_form(&transactions, &wallets).into_response()
}

async fn parse_multipart_field(field: Field<'_>) -> Result<String, Error> {
    let file_name = field
        .file_name()
        .ok_or_else(|| {
            Error::MultipartError("Could not get file name from multipart form field".to_owned())
        })?
        .to_owned();

    let extension = file_name.rsplit('.').next().unwrap_or_default();

    if !extension.eq_ignore_ascii_case("ofx") && !extension.eq_ignore_ascii_case("qfx") {
        return Err(Error::NotOfx);
    }

    let data = field.text().await.map_err(|error| {
        tracing::error!("could not read data from multipart form field: {error}");
        Error::MultipartError("Could not read data from multipart form field.".to_owned())
    })?;

    tracing::debug!("received file '{file_name}' that is {} bytes", data.len());

    Ok(data)
}

/// The review form: one editable row per parsed transaction plus a wallet
/// picker, submitted as a whole to the commit endpoint.
fn review_form(transactions: &[ParsedTransaction], wallets: &[Wallet]) -> Markup {
    html! {
        form
            hx-post=(endpoints::IMPORT)
            hx-swap="none"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            p class="text-sm"
            {
                (transactions.len()) " transactions found. Review and edit them below, \
                then import."
            }

            div
            {
                label for="wallet_id" class=(FORM_LABEL_STYLE) { "Import into wallet" }

                select id="wallet_id" name="wallet_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "No wallet" }

                    @for wallet in wallets {
                        option value=(wallet.id) { (wallet.name) }
                    }
                }
            }

            table class=(TABLE_STYLE)
            {
                thead
                {
                    tr
                    {
                        th class=(TABLE_HEADER_STYLE) { "Date" }
                        th class=(TABLE_HEADER_STYLE) { "Description" }
                        th class=(TABLE_HEADER_STYLE) { "Kind" }
                        th class=(TABLE_HEADER_STYLE) { "Amount" }
                        th class=(TABLE_HEADER_STYLE) { "Category" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (review_row(transaction))
                    }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                "Import " (transactions.len()) " transactions"
                (loading_spinner())
            }
        }
    }
}

fn review_row(transaction: &ParsedTransaction) -> Markup {
    html! {
        tr class=(TABLE_ROW_STYLE)
        {
            input type="hidden" name="import_id" value=(transaction.provisional_id);

            td class=(TABLE_CELL_STYLE)
            {
                input
                    type="date"
                    name="date"
                    value=(transaction.date)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            td class=(TABLE_CELL_STYLE)
            {
                input
                    type="text"
                    name="description"
                    value=(transaction.description)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            td class=(TABLE_CELL_STYLE)
            {
                select name="kind" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option
                        value=(TransactionKind::Income.as_str())
                        selected[transaction.kind == TransactionKind::Income]
                    {
                        "Income"
                    }

                    option
                        value=(TransactionKind::Expense.as_str())
                        selected[transaction.kind == TransactionKind::Expense]
                    {
                        "Expense"
                    }
                }
            }

            td class=(TABLE_CELL_STYLE)
            {
                input
                    type="number"
                    name="amount"
                    value=(transaction.amount)
                    step="0.01"
                    min="0"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            td class=(TABLE_CELL_STYLE)
            {
                input
                    type="text"
                    name="category"
                    value=(transaction.category)
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}
