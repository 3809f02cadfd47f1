//! The dashboard page handler and its views.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error, endpoints,
    html::{
        CARD_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base, currency_rounded_with_tooltip,
        format_currency, link,
    },
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::{
        Transaction, TransactionKind, count_transactions, format_month, get_transactions_for_month,
        get_transactions_since, parse_month,
    },
};

use super::{
    aggregation::{
        PeriodSummary, expenses_by_category_sorted, monthly_cash_flow, previous_month,
        summarize_period,
    },
    charts::{DashboardChart, cash_flow_chart, charts_script, charts_view, expense_breakdown_chart},
};

/// How many calendar months the cash flow chart covers.
const CASH_FLOW_MONTHS: usize = 6;

/// How many of the selected month's transactions to list on the dashboard.
const RECENT_TRANSACTION_COUNT: usize = 10;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the dashboard page.
#[derive(Debug, Deserialize)]
pub struct DashboardQuery {
    /// The month to summarize, as "YYYY-MM". Defaults to the current month.
    pub month: Option<String>,
    /// Text to filter transaction descriptions by.
    pub search: Option<String>,
}

/// Display an overview of the user's finances: the selected month's totals,
/// the expense breakdown by category, and cash flow over the last six
/// months.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let local_offset = get_local_offset(&state.local_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(state.local_timezone.clone()))?;
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let month = query
        .month
        .as_deref()
        .and_then(parse_month)
        .unwrap_or_else(|| today.replace_day(1).unwrap_or(today));

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    if count_transactions(&connection)? == 0 {
        return Ok(no_data_view(nav_bar).into_response());
    }

    let month_transactions = get_transactions_for_month(month, search, &connection)
        .inspect_err(|error| tracing::error!("could not get the month's transactions: {error}"))?;
    let summary = summarize_period(&month_transactions);

    let mut window_start = month;
    for _ in 1..CASH_FLOW_MONTHS {
        window_start = previous_month(window_start);
    }

    let window_transactions = get_transactions_since(window_start, &connection)
        .inspect_err(|error| tracing::error!("could not get the window's transactions: {error}"))?;

    let charts = [
        DashboardChart {
            id: "expense-breakdown-chart",
            options: expense_breakdown_chart(&expenses_by_category_sorted(&summary)).to_string(),
        },
        DashboardChart {
            id: "cash-flow-chart",
            options: cash_flow_chart(&monthly_cash_flow(
                &window_transactions,
                month,
                CASH_FLOW_MONTHS,
            ))
            .to_string(),
        },
    ];

    Ok(dashboard_view(nav_bar, month, search, &summary, &charts, &month_transactions).into_response())
}

fn dashboard_view(
    nav_bar: NavBar,
    month: Date,
    search: Option<&str>,
    summary: &PeriodSummary,
    charts: &[DashboardChart],
    month_transactions: &[Transaction],
) -> Markup {
    base(
        "Dashboard",
        &[
            HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
            charts_script(charts),
        ],
        &html! {
            (nav_bar.into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4"
                {
                    "Dashboard"

                    span class="ml-2 text-lg font-normal opacity-70"
                    {
                        (format!("{} {}", month.month(), month.year()))
                    }
                }

                (month_form(month, search))
                (summary_cards(summary))
                (charts_view(charts))
                (recent_transactions(month_transactions))
            }
        },
    )
}

/// A month selector plus a description search box. Submitting reloads the
/// dashboard scoped to the chosen month.
fn month_form(month: Date, search: Option<&str>) -> Markup {
    html! {
        form method="get" action=(endpoints::DASHBOARD_VIEW) class="w-full max-w-md mb-4 flex gap-2"
        {
            input
                type="month"
                name="month"
                class=(FORM_TEXT_INPUT_STYLE)
                value=(format_month(month));

            input
                type="search"
                name="search"
                placeholder="Search descriptions..."
                class=(FORM_TEXT_INPUT_STYLE)
                value=[search];

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 hover:dark:bg-blue-700 text-white rounded"
            {
                "Apply"
            }
        }
    }
}

/// The income, expense, and balance totals for the selected month.
fn summary_cards(summary: &PeriodSummary) -> Markup {
    let balance_style = if summary.balance < 0.0 {
        "text-2xl font-bold text-red-600 dark:text-red-500"
    } else {
        "text-2xl font-bold text-green-600 dark:text-green-500"
    };

    html! {
        section class="grid grid-cols-1 sm:grid-cols-3 gap-4 w-full mb-6"
        {
            div class=(CARD_STYLE)
            {
                h2 class="text-sm font-medium opacity-70" { "Income" }

                p class="text-2xl font-bold text-green-600 dark:text-green-500"
                {
                    (currency_rounded_with_tooltip(summary.income))
                }
            }

            div class=(CARD_STYLE)
            {
                h2 class="text-sm font-medium opacity-70" { "Expenses" }

                p class="text-2xl font-bold text-red-600 dark:text-red-500"
                {
                    (currency_rounded_with_tooltip(summary.expense))
                }
            }

            div class=(CARD_STYLE)
            {
                h2 class="text-sm font-medium opacity-70" { "Balance" }

                p class=(balance_style)
                {
                    (currency_rounded_with_tooltip(summary.balance))
                }
            }
        }
    }
}

/// The most recent transactions for the selected month, newest first.
fn recent_transactions(month_transactions: &[Transaction]) -> Markup {
    html! {
        section class="w-full max-w-4xl"
        {
            h2 class="text-xl font-bold mb-2" { "Recent transactions" }

            div class="overflow-x-auto shadow-md rounded-lg"
            {
                table class=(TABLE_STYLE)
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                        }
                    }

                    tbody
                    {
                        @if month_transactions.is_empty()
                        {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) colspan="4"
                                {
                                    "No transactions for this month."
                                }
                            }
                        }

                        @for transaction in month_transactions.iter().rev().take(RECENT_TRANSACTION_COUNT)
                        {
                            @let amount_style = match transaction.kind {
                                TransactionKind::Income => "text-green-600 dark:text-green-400",
                                TransactionKind::Expense => "text-red-600 dark:text-red-400",
                            };
                            @let amount_sign = match transaction.kind {
                                TransactionKind::Income => "+",
                                TransactionKind::Expense => "−",
                            };

                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class=(TABLE_CELL_STYLE) { (transaction.date) }
                                td class=(TABLE_CELL_STYLE) { (transaction.description) }
                                td class=(TABLE_CELL_STYLE) { (transaction.category) }
                                td class=(format!("{TABLE_CELL_STYLE} {amount_style}"))
                                {
                                    (amount_sign) (format_currency(transaction.amount))
                                }
                            }
                        }
                    }
                }
            }

            p class="mt-2"
            {
                (link(endpoints::TRANSACTIONS_VIEW, "View all transactions"))
            }
        }
    }
}

fn no_data_view(nav_bar: NavBar) -> Markup {
    base(
        "Dashboard",
        &[],
        &html! {
            (nav_bar.into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "Dashboard" }

                div class=(CARD_STYLE)
                {
                    p class="mb-2" { "There are no transactions yet." }

                    p
                    {
                        (link(endpoints::NEW_TRANSACTION_VIEW, "Add a transaction"))
                        " or "
                        (link(endpoints::IMPORT_VIEW, "import a bank statement"))
                        " to get started."
                    }
                }
            }
        },
    )
}

#[cfg(test)]
mod get_dashboard_page_tests {
    use axum::{Router, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::{OffsetDateTime, macros::date};

    use crate::{
        AppState, endpoints,
        test_utils::{assert_valid_html, parse_document_text},
        transaction::{Transaction, TransactionKind, create_transaction},
    };

    use super::get_dashboard_page;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    #[tokio::test]
    async fn dashboard_shows_summary_and_charts() {
        let (server, state) = test_server();
        let today = OffsetDateTime::now_utc().date();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(2500.0, today, "Salary".to_owned())
                    .kind(TransactionKind::Income),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(45.90, today, "Groceries".to_owned())
                    .category("Food".to_owned()),
                &connection,
            )
            .unwrap();
        }

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();

        let text = response.text();
        assert_valid_html(&parse_document_text(&text));
        assert!(text.contains("Income"));
        assert!(text.contains("Expenses"));
        assert!(text.contains("expense-breakdown-chart"));
        assert!(text.contains("cash-flow-chart"));
        assert!(text.contains("Food"));
        assert!(text.contains("Recent transactions"));
        assert!(text.contains("Groceries"));
    }

    #[tokio::test]
    async fn dashboard_scopes_to_selected_month() {
        let (server, state) = test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(45.90, date!(2026 - 02 - 05), "Grocery Store".to_owned()),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(10.0, date!(2026 - 01 - 15), "January Coffee".to_owned()),
                &connection,
            )
            .unwrap();
        }

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("month", "2026-02")
            .await;

        response.assert_status_ok();

        let text = response.text();
        assert!(text.contains("Grocery Store"));
        assert!(!text.contains("January Coffee"));
    }

    #[tokio::test]
    async fn dashboard_filters_by_search_text() {
        let (server, state) = test_server();
        {
            let connection = state.db_connection.lock().unwrap();
            create_transaction(
                Transaction::build(45.90, date!(2026 - 02 - 05), "Grocery Store".to_owned()),
                &connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(4.50, date!(2026 - 02 - 06), "Coffee".to_owned()),
                &connection,
            )
            .unwrap();
        }

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_query_param("month", "2026-02")
            .add_query_param("search", "coffee")
            .await;

        let text = response.text();
        assert!(text.contains("Coffee"));
        assert!(!text.contains("Grocery Store"));
    }

    #[tokio::test]
    async fn dashboard_without_transactions_suggests_adding_some() {
        let (server, _) = test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();

        let text = response.text();
        assert!(text.contains("There are no transactions yet."));
        assert!(text.contains(endpoints::IMPORT_VIEW));
    }
}
