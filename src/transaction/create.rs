//! The new transaction page and endpoint.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use time::{Date, macros::format_description};

use crate::{
    AppState, Error,
    category::get_categories,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE,
        FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base,
        dollar_input_styles, loading_spinner,
    },
    navigation::NavBar,
    wallet::{Wallet, get_wallets},
};

use super::core::{Transaction, TransactionBuilder, TransactionKind, UNCATEGORIZED};

/// The state needed for creating a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating or editing a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionFormData {
    /// The amount of money in dollars.
    pub amount: f64,
    /// The date as "YYYY-MM-DD".
    pub date: String,
    /// What the transaction was for.
    pub description: String,
    /// Either "income" or "expense".
    pub kind: String,
    /// The category name. Blank means uncategorised.
    pub category: Option<String>,
    /// The wallet's ID, or blank for no wallet.
    pub wallet_id: Option<String>,
}

impl TransactionFormData {
    /// Convert the raw form data into a transaction builder.
    ///
    /// # Errors
    /// Returns [Error::FutureDate] with today's date as a stand-in if the
    /// date does not parse.
    pub(super) fn into_builder(self) -> Result<TransactionBuilder, Error> {
        let date = Date::parse(&self.date, format_description!("[year]-[month]-[day]"))
            .map_err(|_| Error::NotFound)?;

        let kind = if self.kind == "income" {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };

        let category = self
            .category
            .map(|category| category.trim().to_owned())
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| UNCATEGORIZED.to_owned());

        let wallet_id = self
            .wallet_id
            .and_then(|wallet_id| wallet_id.parse().ok());

        Ok(Transaction::build(self.amount, date, self.description)
            .kind(kind)
            .category(category)
            .wallet_id(wallet_id))
    }
}

/// Display the page for adding a transaction.
pub async fn get_new_transaction_page(
    State(state): State<CreateTransactionState>,
) -> Response {
    let (wallets, categories) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        let wallets = match get_wallets(&connection) {
            Ok(wallets) => wallets,
            Err(error) => return error.into_response(),
        };
        let categories = match get_categories(&connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        };

        (wallets, categories)
    };

    let category_names: Vec<String> = categories
        .into_iter()
        .map(|category| category.name)
        .collect();

    base(
        "New Transaction",
        &[dollar_input_styles()],
        &html! {
            (NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "New Transaction" }

                div class=(format!("{CARD_STYLE} w-full max-w-md"))
                {
                    (transaction_form(
                        Some(endpoints::TRANSACTIONS_API),
                        None,
                        "Add transaction",
                        None,
                        &wallets,
                        &category_names,
                        None,
                    ))
                }
            }
        },
    )
    .into_response()
}

/// Create a transaction and redirect back to the transactions page.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form_data): Form<TransactionFormData>,
) -> Response {
    let builder = match form_data.into_builder() {
        Ok(builder) => builder,
        Err(_) => {
            return (
                StatusCode::BAD_REQUEST,
                crate::alert::Alert::ErrorSimple {
                    message: "The date could not be read, use the format YYYY-MM-DD."
                        .to_owned(),
                }
                .into_html(),
            )
                .into_response();
        }
    };

    if let Err(error) = builder.validate() {
        return error.into_alert_response();
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match super::core::create_transaction(builder, &connection) {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

/// The form for creating or editing a transaction.
///
/// Exactly one of `post_endpoint` and `put_endpoint` should be set.
/// `transaction` pre-fills the fields when editing.
pub(super) fn transaction_form(
    post_endpoint: Option<&str>,
    put_endpoint: Option<&str>,
    submit_label: &str,
    transaction: Option<&Transaction>,
    wallets: &[Wallet],
    categories: &[String],
    error_message: Option<&str>,
) -> Markup {
    let amount = transaction.map(|transaction| transaction.amount.to_string());
    let date = transaction.map(|transaction| transaction.date.to_string());
    let description = transaction.map(|transaction| transaction.description.as_str());
    let kind = transaction
        .map(|transaction| transaction.kind)
        .unwrap_or(TransactionKind::Expense);
    let category = transaction
        .map(|transaction| transaction.category.as_str())
        .filter(|category| *category != UNCATEGORIZED);
    let wallet_id = transaction.and_then(|transaction| transaction.wallet_id);

    html! {
        form
            hx-post=[post_endpoint]
            hx-put=[put_endpoint]
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div class="flex gap-2"
            {
                fieldset class="flex flex-1 gap-2"
                {
                    legend class=(FORM_LABEL_STYLE) { "Type" }

                    input
                        type="radio"
                        name="kind"
                        id="kind-expense"
                        value="expense"
                        class=(format!("{FORM_RADIO_INPUT_STYLE} hidden"))
                        checked[kind == TransactionKind::Expense];
                    label for="kind-expense" class=(FORM_RADIO_LABEL_STYLE) { "Expense" }

                    input
                        type="radio"
                        name="kind"
                        id="kind-income"
                        value="income"
                        class=(format!("{FORM_RADIO_INPUT_STYLE} hidden"))
                        checked[kind == TransactionKind::Income];
                    label for="kind-income" class=(FORM_RADIO_LABEL_STYLE) { "Income" }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                div class="input-wrapper w-full"
                {
                    input
                        type="number"
                        name="amount"
                        id="amount"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=[amount]
                        required;
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    type="date"
                    name="date"
                    id="date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[date]
                    required;
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    type="text"
                    name="description"
                    id="description"
                    placeholder="e.g. Grocery Store"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[description];
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    type="text"
                    name="category"
                    id="category"
                    list="category-names"
                    placeholder=(UNCATEGORIZED)
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=[category];

                datalist id="category-names"
                {
                    @for name in categories
                    {
                        option value=(name) {}
                    }
                }
            }

            div
            {
                label for="wallet_id" class=(FORM_LABEL_STYLE) { "Wallet" }

                select name="wallet_id" id="wallet_id" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" { "No wallet" }

                    @for wallet in wallets
                    {
                        option
                            value=(wallet.id)
                            selected[wallet_id == Some(wallet.id)]
                        {
                            (wallet.name)
                        }
                    }
                }
            }

            @if let Some(error_message) = error_message
            {
                p class="text-red-500" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                (submit_label)
            }
        }
    }
}
