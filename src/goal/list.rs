//! The goals page.

use axum::extract::{FromRef, State};
use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, delete_action_button, dollar_input_styles, format_currency,
        loading_spinner,
    },
    navigation::NavBar,
};

use super::db::{Goal, get_goals};

/// The state needed for the goals page.
#[derive(Debug, Clone)]
pub struct GoalsPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for GoalsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the savings goals and a form for adding one.
pub async fn get_goals_page(State(state): State<GoalsPageState>) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_response();
        }
    };

    let goals = match get_goals(&connection) {
        Ok(goals) => goals,
        Err(error) => {
            tracing::error!("could not get goals: {error}");
            return error.into_response();
        }
    };

    base(
        "Goals",
        &[dollar_input_styles()],
        &html! {
            (NavBar::new(endpoints::GOALS_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "Goals" }

                div class=(format!("{CARD_STYLE} w-full max-w-md mb-6"))
                {
                    (new_goal_form(None))
                }

                div class="w-full max-w-2xl space-y-4"
                {
                    @if goals.is_empty()
                    {
                        p class="text-gray-500 dark:text-gray-400"
                        {
                            "No goals yet. Add one above to start saving."
                        }
                    }

                    @for goal in &goals
                    {
                        (goal_card(goal))
                    }
                }
            }
        },
    )
    .into_response()
}

/// The form for adding a goal, optionally with an error message.
pub fn new_goal_form(error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::POST_GOAL)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div
            {
                label for="name" class=(FORM_LABEL_STYLE) { "Goal" }

                input
                    type="text"
                    name="name"
                    id="name"
                    placeholder="e.g. Holiday"
                    class=(FORM_TEXT_INPUT_STYLE)
                    required;
            }

            div
            {
                label for="target" class=(FORM_LABEL_STYLE) { "Target amount" }

                div class="input-wrapper w-full"
                {
                    input
                        type="number"
                        name="target"
                        id="target"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        class=(FORM_TEXT_INPUT_STYLE)
                        required;
                }
            }

            div
            {
                label for="due_date" class=(FORM_LABEL_STYLE) { "Target date (optional)" }

                input
                    type="date"
                    name="due_date"
                    id="due_date"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(error_message) = error_message
            {
                p class="text-red-500" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                "Add goal"
            }
        }
    }
}

fn goal_card(goal: &Goal) -> Markup {
    let fraction_saved = (goal.saved / goal.target).clamp(0.0, 1.0);
    let percent_width = format!("width: {:.0}%", fraction_saved * 100.0);
    let is_reached = goal.saved >= goal.target;
    let card_id = format!("goal-{}", goal.id);

    html! {
        div id=(card_id) class=(CARD_STYLE)
        {
            div class="flex items-center justify-between mb-2"
            {
                span class="font-semibold"
                {
                    (goal.name)

                    @if let Some(due_date) = goal.due_date
                    {
                        span class="ml-2 text-sm font-normal text-gray-500 dark:text-gray-400"
                        {
                            "by " (due_date)
                        }
                    }
                }

                span class="flex items-center gap-4"
                {
                    span
                    {
                        (format_currency(goal.saved))
                        " of "
                        (format_currency(goal.target))
                    }

                    (delete_action_button(
                        &endpoints::format_endpoint(endpoints::DELETE_GOAL, goal.id),
                        "Are you sure you want to delete this goal?",
                        &format!("#{card_id}"),
                        "delete",
                    ))
                }
            }

            div class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700 mb-2"
            {
                div class="bg-green-600 h-2.5 rounded-full" style=(percent_width) {}
            }

            @if is_reached
            {
                p class="text-sm text-green-600 dark:text-green-400" { "Goal reached!" }
            }
            @else
            {
                form
                    hx-post=(endpoints::format_endpoint(endpoints::GOAL_DEPOSIT, goal.id))
                    hx-swap="none"
                    hx-target-error="#alert-container"
                    class="flex gap-2"
                {
                    div class="input-wrapper flex-1"
                    {
                        input
                            type="number"
                            name="amount"
                            step="0.01"
                            min="0.01"
                            placeholder="0.00"
                            class=(FORM_TEXT_INPUT_STYLE)
                            required;
                    }

                    button
                        type="submit"
                        class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 hover:dark:bg-blue-700 text-white rounded"
                    {
                        "Deposit"
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod goals_page_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        endpoints,
        goal::db::{add_to_goal, create_goal},
        test_utils::{assert_valid_html, parse_document_text},
    };

    use super::get_goals_page;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::GOALS_VIEW, get(get_goals_page))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn page_shows_progress() {
        let (server, state) = test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            let goal = create_goal("Holiday", 2000.0, None, &connection).unwrap();
            add_to_goal(goal.id, 500.0, &connection).unwrap();
        }

        let response = server.get(endpoints::GOALS_VIEW).await;

        response.assert_status_ok();
        let text = response.text();
        assert!(text.contains("$500.00"));
        assert!(text.contains("$2,000.00"));

        let html = parse_document_text(&text);
        assert_valid_html(&html);
    }

    #[tokio::test]
    async fn reached_goal_hides_deposit_form() {
        let (server, state) = test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            let goal = create_goal("Laptop", 1000.0, None, &connection).unwrap();
            add_to_goal(goal.id, 1000.0, &connection).unwrap();
        }

        let response = server.get(endpoints::GOALS_VIEW).await;

        let text = response.text();
        assert!(text.contains("Goal reached!"));
        assert!(!text.contains("Deposit"));
    }
}
