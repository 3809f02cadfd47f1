//! The wallets page.

use axum::extract::{FromRef, State};
use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE,
        base, delete_action_button, format_currency, loading_spinner,
    },
    navigation::NavBar,
};

use super::db::get_wallets_with_balances;
use super::domain::WalletBalance;

/// The state needed for the wallets page.
#[derive(Debug, Clone)]
pub struct WalletsPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for WalletsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the wallets with their balances and a form for adding a wallet.
pub async fn get_wallets_page(State(state): State<WalletsPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let balances = match get_wallets_with_balances(&connection) {
        Ok(balances) => balances,
        Err(error) => {
            tracing::error!("could not get wallets: {error}");
            return error.into_response();
        }
    };

    base(
        "Wallets",
        &[],
        &html! {
            (NavBar::new(endpoints::WALLETS_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "Wallets" }

                div class=(format!("{CARD_STYLE} w-full max-w-md mb-6"))
                {
                    (new_wallet_form(None))
                }

                (wallets_table(&balances))
            }
        },
    )
    .into_response()
}

/// The form for adding a wallet, optionally with an error message.
pub fn new_wallet_form(error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_WALLET)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Wallet name" }

                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="e.g. Checking"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500" { (error_message) }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                "Add wallet"
            }
        }
    }
}

fn wallets_table(balances: &[WalletBalance]) -> Markup {
    html! {
        div class="w-full max-w-2xl overflow-x-auto shadow-md rounded-lg"
        {
            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Balance" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Transactions" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @if balances.is_empty()
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="4"
                            {
                                "No wallets yet. Add one above to get started."
                            }
                        }
                    }

                    @for balance in balances
                    {
                        @let row_id = format!("wallet-{}", balance.wallet.id);

                        tr id=(row_id) class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (balance.wallet.name) }
                            td class=(TABLE_CELL_STYLE) { (format_currency(balance.balance)) }
                            td class=(TABLE_CELL_STYLE) { (balance.transaction_count) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (delete_action_button(
                                    &endpoints::format_endpoint(
                                        endpoints::DELETE_WALLET,
                                        balance.wallet.id,
                                    ),
                                    "Are you sure you want to delete this wallet?",
                                    &format!("#{row_id}"),
                                    "delete",
                                ))
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod wallets_page_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        AppState, endpoints,
        test_utils::{assert_hx_endpoint, assert_valid_html, must_get_form, parse_document_text},
        wallet::{create_wallet, domain::WalletName},
    };

    use super::get_wallets_page;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::WALLETS_VIEW, get(get_wallets_page))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn page_lists_wallets() {
        let (server, state) = test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            create_wallet(WalletName::new("Checking").unwrap(), &connection).unwrap();
            create_wallet(WalletName::new("Savings").unwrap(), &connection).unwrap();
        }

        let response = server.get(endpoints::WALLETS_VIEW).await;

        response.assert_status_ok();
        let html = parse_document_text(&response.text());
        assert_valid_html(&html);

        let selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&selector).count(), 2);
    }

    #[tokio::test]
    async fn page_contains_new_wallet_form() {
        let (server, _) = test_server();

        let response = server.get(endpoints::WALLETS_VIEW).await;

        let html = parse_document_text(&response.text());
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_WALLET);
    }
}
