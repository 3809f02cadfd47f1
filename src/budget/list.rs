//! The budgets page.

use axum::extract::{FromRef, State};
use axum::response::{IntoResponse, Response};
use maud::{Markup, html};
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    category::{Category, get_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, delete_action_button, dollar_input_styles, format_currency,
        loading_spinner,
    },
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::get_transactions_for_month,
};

use super::db::{Budget, get_budgets};

/// The state needed for the budgets page.
#[derive(Debug, Clone)]
pub struct BudgetsPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to decide which month "now" falls in.
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the budgets with this month's spending against each one.
pub async fn get_budgets_page(State(state): State<BudgetsPageState>) -> Response {
    let local_offset = get_local_offset(&state.local_timezone).unwrap_or(UtcOffset::UTC);
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let (budgets, categories, spent_by_category) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        let budgets = match get_budgets(&connection) {
            Ok(budgets) => budgets,
            Err(error) => return error.into_response(),
        };
        let categories = match get_categories(&connection) {
            Ok(categories) => categories,
            Err(error) => return error.into_response(),
        };
        let transactions = match get_transactions_for_month(today, None, &connection) {
            Ok(transactions) => transactions,
            Err(error) => return error.into_response(),
        };

        let mut spent_by_category: HashMap<String, f64> = HashMap::new();

        for transaction in transactions {
            if transaction.kind == crate::transaction::TransactionKind::Expense {
                *spent_by_category
                    .entry(transaction.category)
                    .or_insert(0.0) += transaction.amount;
            }
        }

        (budgets, categories, spent_by_category)
    };

    base(
        "Budgets",
        &[dollar_input_styles()],
        &html! {
            (NavBar::new(endpoints::BUDGETS_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "Budgets" }

                div class=(format!("{CARD_STYLE} w-full max-w-md mb-6"))
                {
                    (budget_form(&categories, None))
                }

                div class="w-full max-w-2xl space-y-4"
                {
                    @if budgets.is_empty()
                    {
                        p class="text-gray-500 dark:text-gray-400"
                        {
                            "No budgets yet. Set one above to start tracking your spending."
                        }
                    }

                    @for budget in &budgets
                    {
                        (budget_card(
                            budget,
                            spent_by_category
                                .get(&budget.category)
                                .copied()
                                .unwrap_or(0.0),
                        ))
                    }
                }
            }
        },
    )
    .into_response()
}

/// The form for setting a budget, optionally with an error message.
pub fn budget_form(categories: &[Category], error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::UPSERT_BUDGET)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="space-y-4"
        {
            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE) required
                {
                    @for category in categories
                    {
                        option value=(category.name) { (category.name) }
                    }
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Monthly limit" }

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

            @if let Some(error_message) = error_message
            {
                p class="text-red-500" { (error_message) }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="htmx-indicator" { (loading_spinner()) }
                "Set budget"
            }
        }
    }
}

fn budget_card(budget: &Budget, spent: f64) -> Markup {
    let fraction_spent = (spent / budget.amount).clamp(0.0, 1.0);
    let percent_width = format!("width: {:.0}%", fraction_spent * 100.0);
    let is_over_budget = spent > budget.amount;

    let bar_style = if is_over_budget {
        "bg-red-600 h-2.5 rounded-full"
    } else {
        "bg-blue-600 h-2.5 rounded-full"
    };

    let card_id = format!("budget-{}", budget.id);

    html! {
        div id=(card_id) class=(CARD_STYLE)
        {
            div class="flex items-center justify-between mb-2"
            {
                span class="font-semibold" { (budget.category) }

                span class="flex items-center gap-4"
                {
                    span
                    {
                        (format_currency(spent))
                        " of "
                        (format_currency(budget.amount))
                    }

                    (delete_action_button(
                        &endpoints::format_endpoint(endpoints::DELETE_BUDGET, budget.id),
                        "Are you sure you want to delete this budget?",
                        &format!("#{card_id}"),
                        "delete",
                    ))
                }
            }

            div class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700"
            {
                div class=(bar_style) style=(percent_width) {}
            }

            @if is_over_budget
            {
                p class="mt-1 text-sm text-red-600 dark:text-red-400"
                {
                    "Over budget by " (format_currency(spent - budget.amount))
                }
            }
        }
    }
}
