//! The edit transaction page and endpoint.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use maud::html;
use time::{Date, macros::format_description};

use crate::{
    AppState, Error,
    category::get_categories,
    database_id::TransactionId,
    endpoints,
    html::{CARD_STYLE, PAGE_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    wallet::get_wallets,
};

use super::{
    core::{get_transaction, update_transaction},
    create::{CreateTransactionState, TransactionFormData, transaction_form},
};

/// Display the page for editing a transaction.
pub async fn get_edit_transaction_page(
    State(state): State<CreateTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let (transaction, wallets, categories) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        let transaction = match get_transaction(transaction_id, &connection) {
            Ok(transaction) => transaction,
            Err(error) => return error.into_response(),
        };
        let wallets = match get_wallets(&connection) {
            Ok(wallets) => wallets,
            Err(error) => return error.into_response(),
        };
        let categories = match get_categories(&connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        };

        (transaction, wallets, categories)
    };

    let category_names: Vec<String> = categories
        .into_iter()
        .map(|category| category.name)
        .collect();

    base(
        "Edit Transaction",
        &[dollar_input_styles()],
        &html! {
            (NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "Edit Transaction" }

                div class=(format!("{CARD_STYLE} w-full max-w-md"))
                {
                    (transaction_form(
                        None,
                        Some(&endpoints::format_endpoint(
                            endpoints::TRANSACTION,
                            transaction.id,
                        )),
                        "Save changes",
                        Some(&transaction),
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

/// Overwrite a transaction's fields and redirect back to the transactions
/// page.
pub async fn update_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Form(form_data): Form<TransactionFormData>,
) -> Response {
    // Check the date early so a typo does not read as a missing transaction.
    if Date::parse(&form_data.date, format_description!("[year]-[month]-[day]")).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            crate::alert::Alert::ErrorSimple {
                message: "The date could not be read, use the format YYYY-MM-DD.".to_owned(),
            }
            .into_html(),
        )
            .into_response();
    }

    let builder = match form_data.into_builder() {
        Ok(builder) => builder,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_transaction(transaction_id, builder, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("could not update transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod edit_transaction_tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, put},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        AppState, endpoints,
        test_utils::{
            assert_form_input_with_value, assert_hx_endpoint, must_get_form, parse_document_text,
        },
        transaction::core::{Transaction, create_transaction, get_transaction},
    };

    use super::{get_edit_transaction_page, update_transaction_endpoint};

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(
                endpoints::EDIT_TRANSACTION_VIEW,
                get(get_edit_transaction_page),
            )
            .route(endpoints::TRANSACTION, put(update_transaction_endpoint))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn page_pre_fills_form() {
        let (server, state) = test_server();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(45.90, date!(2026 - 02 - 05), "Grocery Store".to_owned()),
                &connection,
            )
            .unwrap()
        };

        let response = server
            .get(&endpoints::format_endpoint(
                endpoints::EDIT_TRANSACTION_VIEW,
                transaction.id,
            ))
            .await;

        response.assert_status_ok();
        let html = parse_document_text(&response.text());
        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id),
        );
        assert_form_input_with_value(&form, "date", "date", "2026-02-05");
        assert_form_input_with_value(&form, "description", "text", "Grocery Store");
    }

    #[tokio::test]
    async fn edit_page_for_missing_transaction_is_not_found() {
        let (server, _) = test_server();

        let response = server
            .get(&endpoints::format_endpoint(
                endpoints::EDIT_TRANSACTION_VIEW,
                999,
            ))
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_overwrites_transaction() {
        let (server, state) = test_server();
        let transaction = {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(45.90, date!(2026 - 02 - 05), "Grocery Store".to_owned()),
                &connection,
            )
            .unwrap()
        };

        let response = server
            .put(&endpoints::format_endpoint(
                endpoints::TRANSACTION,
                transaction.id,
            ))
            .form(&[
                ("amount", "55.90"),
                ("date", "2026-02-06"),
                ("description", "Supermarket"),
                ("kind", "expense"),
                ("category", "Food"),
                ("wallet_id", ""),
            ])
            .await;

        response.assert_status(StatusCode::SEE_OTHER);

        let connection = state.db_connection.lock().unwrap();
        let updated = get_transaction(transaction.id, &connection).unwrap();
        assert_eq!(updated.amount, 55.90);
        assert_eq!(updated.description, "Supermarket");
        assert_eq!(updated.category, "Food");
    }

    #[tokio::test]
    async fn update_missing_transaction_is_not_found() {
        let (server, _) = test_server();

        let response = server
            .put(&endpoints::format_endpoint(endpoints::TRANSACTION, 999))
            .form(&[
                ("amount", "10.00"),
                ("date", "2026-02-06"),
                ("description", "Ghost"),
                ("kind", "expense"),
            ])
            .await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
