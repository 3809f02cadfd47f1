//! The categories page.

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
        base, delete_action_button, loading_spinner,
    },
    navigation::NavBar,
};

use super::{db::get_categories, domain::Category};

/// The state needed for the categories page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the categories and a form for adding one.
pub async fn get_categories_page(State(state): State<CategoriesPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let categories = match get_categories(&connection) {
        Ok(categories) => categories,
        Err(error) => {
            tracing::error!("could not get categories: {error}");
            return error.into_response();
        }
    };

    base(
        "Categories",
        &[],
        &html! {
            (NavBar::new(endpoints::CATEGORIES_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "Categories" }

                div class=(format!("{CARD_STYLE} w-full max-w-md mb-6"))
                {
                    (new_category_form(None))
                }

                (categories_table(&categories))
            }
        },
    )
    .into_response()
}

/// The form for adding a category, optionally with an error message.
pub fn new_category_form(error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_CATEGORY)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Category name" }

                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="e.g. Food"
                    class=(FORM_TEXT_INPUT_STYLE)
                    minlength="2"
                    required;

                @if let Some(error_message) = error_message
                {
                    p class="text-red-500" { (error_message) }
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                "Add category"
            }
        }
    }
}

fn categories_table(categories: &[Category]) -> Markup {
    html! {
        div class="w-full max-w-md overflow-x-auto shadow-md rounded-lg"
        {
            table class=(TABLE_STYLE)
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @if categories.is_empty()
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="2"
                            {
                                "No categories yet. Add one above to get started."
                            }
                        }
                    }

                    @for category in categories
                    {
                        @let row_id = format!("category-{}", category.id);

                        tr id=(row_id) class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (category.name) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                (delete_action_button(
                                    &endpoints::format_endpoint(
                                        endpoints::DELETE_CATEGORY,
                                        category.id,
                                    ),
                                    "Are you sure you want to delete this category?",
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
mod categories_page_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        AppState,
        category::{CategoryName, create_category},
        endpoints,
        test_utils::{assert_hx_endpoint, assert_valid_html, must_get_form, parse_document_text},
    };

    use super::get_categories_page;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn page_lists_categories() {
        let (server, state) = test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            create_category(CategoryName::new("Food").unwrap(), &connection).unwrap();
            create_category(CategoryName::new("Rent").unwrap(), &connection).unwrap();
        }

        let response = server.get(endpoints::CATEGORIES_VIEW).await;

        response.assert_status_ok();
        let html = parse_document_text(&response.text());
        assert_valid_html(&html);

        let selector = Selector::parse("tbody tr").unwrap();
        assert_eq!(html.select(&selector).count(), 2);
    }

    #[tokio::test]
    async fn page_contains_new_category_form() {
        let (server, _) = test_server();

        let response = server.get(endpoints::CATEGORIES_VIEW).await;

        let html = parse_document_text(&response.text());
        let form = must_get_form(&html);
        assert_hx_endpoint(&form, endpoints::POST_CATEGORY);
    }
}
