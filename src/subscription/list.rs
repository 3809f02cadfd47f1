//! The subscriptions page.

use axum::extract::{FromRef, State};
use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base, delete_action_button,
        dollar_input_styles, format_currency, loading_spinner,
    },
    navigation::NavBar,
};

use super::db::{Subscription, get_subscriptions};

/// The state needed for the subscriptions page.
#[derive(Debug, Clone)]
pub struct SubscriptionsPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SubscriptionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the subscriptions with the active monthly total.
pub async fn get_subscriptions_page(State(state): State<SubscriptionsPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let subscriptions = match get_subscriptions(&connection) {
        Ok(subscriptions) => subscriptions,
        Err(error) => {
            tracing::error!("could not get subscriptions: {error}");
            return error.into_response();
        }
    };

    let monthly_total: f64 = subscriptions
        .iter()
        .filter(|subscription| subscription.is_active)
        .map(|subscription| subscription.amount)
        .sum();

    base(
        "Subscriptions",
        &[dollar_input_styles()],
        &html! {
            (NavBar::new(endpoints::SUBSCRIPTIONS_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "Subscriptions" }

                p class="mb-4"
                {
                    "Active subscriptions cost "
                    span class="font-semibold" { (format_currency(monthly_total)) }
                    " per month."
                }

                div class=(format!("{CARD_STYLE} w-full max-w-md mb-6"))
                {
                    (new_subscription_form(None))
                }

                (subscriptions_table(&subscriptions))
            }
        },
    )
    .into_response()
}

/// The form for adding a subscription, optionally with an error message.
pub fn new_subscription_form(error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_SUBSCRIPTION)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Service" }

                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="e.g. Streaming"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Monthly cost" }

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
                        required;
                }
            }

            div
            {
                label for="billing_day" class=(FORM_LABEL_STYLE) { "Billing day of the month" }

                input
                    type="number"
                    name="billing_day"
                    id="billing_day"
                    min="1"
                    max="31"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    type="text"
                    name="category"
                    id="category"
                    placeholder="e.g. Entertainment"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(error_message) = error_message
            {
                p class="text-red-500" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                "Add subscription"
            }
        }
    }
}

fn subscriptions_table(subscriptions: &[Subscription]) -> Markup {
    html! {
        div class="w-full max-w-4xl overflow-x-auto shadow-md rounded-lg"
        {
            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Service" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Cost" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Billing day" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @if subscriptions.is_empty()
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="6"
                            {
                                "No subscriptions yet. Add one above to get started."
                            }
                        }
                    }

                    @for subscription in subscriptions
                    {
                        @let row_id = format!("subscription-{}", subscription.id);

                        tr id=(row_id) class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (subscription.name) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (format_currency(subscription.amount))
                            }
                            td class=(TABLE_CELL_STYLE) { (subscription.billing_day) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (subscription.category) }
                            }
                            td class=(TABLE_CELL_STYLE)
                            {
                                @if subscription.is_active
                                {
                                    span class="text-green-600 dark:text-green-400" { "Active" }
                                }
                                @else
                                {
                                    span class="text-gray-500 dark:text-gray-400" { "Paused" }
                                }
                            }
                            td class=(format!("{TABLE_CELL_STYLE} space-x-2"))
                            {
                                button
                                    type="button"
                                    class=(format!("{LINK_STYLE} bg-transparent border-none cursor-pointer"))
                                    hx-post=(endpoints::format_endpoint(
                                        endpoints::SUBSCRIPTION_TOGGLE,
                                        subscription.id,
                                    ))
                                    hx-swap="none"
                                    hx-target-error="#alert-container"
                                {
                                    @if subscription.is_active { "Pause" } @else { "Resume" }
                                }

                                (delete_action_button(
                                    &endpoints::format_endpoint(
                                        endpoints::DELETE_SUBSCRIPTION,
                                        subscription.id,
                                    ),
                                    "Are you sure you want to delete this subscription?",
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
mod subscriptions_page_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState, endpoints,
        subscription::db::{create_subscription, toggle_subscription},
        test_utils::{assert_valid_html, parse_document_text},
    };

    use super::get_subscriptions_page;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::SUBSCRIPTIONS_VIEW, get(get_subscriptions_page))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn monthly_total_only_counts_active_subscriptions() {
        let (server, state) = test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            create_subscription("Streaming", 15.0, 12, "Entertainment", &connection).unwrap();
            let paused =
                create_subscription("Gym", 49.0, 1, "Health", &connection).unwrap();
            toggle_subscription(paused.id, &connection).unwrap();
        }

        let response = server.get(endpoints::SUBSCRIPTIONS_VIEW).await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("$15.00"));
        assert!(text.contains("Paused"));

        let html = parse_document_text(&text);
        assert_valid_html(&html);
    }
}
