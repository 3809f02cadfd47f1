//! The transactions page, scoped to one calendar month at a time.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use time::{Date, Duration, OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    category::{Category, get_categories},
    endpoints,
    html::{
        CATEGORY_BADGE_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, TABLE_STYLE, base,
        edit_delete_action_links, format_currency,
    },
    navigation::NavBar,
    timezone::get_local_offset,
    transaction::core::next_month,
};

use super::core::{
    Transaction, TransactionKind, format_month, get_transactions_for_month, parse_month,
};

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The timezone used to decide which month "now" falls in.
    pub local_timezone: String,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the transactions page.
#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    /// The month to show, as "YYYY-MM". Defaults to the current month.
    pub month: Option<String>,
    /// Text to filter transaction descriptions by.
    pub search: Option<String>,
    /// Show only transactions of this kind ("income" or "expense").
    pub kind: Option<String>,
    /// Show only transactions with this category.
    pub category: Option<String>,
}

/// Display the transactions for a month.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Response {
    let local_offset = get_local_offset(&state.local_timezone).unwrap_or(UtcOffset::UTC);
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

    let kind = query.kind.as_deref().and_then(|kind| match kind {
        "income" => Some(TransactionKind::Income),
        "expense" => Some(TransactionKind::Expense),
        _ => None,
    });

    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty());

    let (mut transactions, categories) = {
        let connection = match state.db_connection.lock() {
            Ok(connection) => connection,
            Err(error) => {
                tracing::error!("could not acquire database lock: {error}");
                return Error::DatabaseLockError.into_response();
            }
        };

        let transactions = match get_transactions_for_month(month, search, &connection) {
            Ok(transactions) => transactions,
            Err(error) => {
                tracing::error!("could not get transactions: {error}");
                return error.into_response();
            }
        };

        let categories = match get_categories(&connection) {
            Ok(categories) => categories,
            Err(error) => {
                tracing::error!("could not get categories: {error}");
                return error.into_response();
            }
        };

        (transactions, categories)
    };

    if let Some(kind) = kind {
        transactions.retain(|transaction| transaction.kind == kind);
    }

    if let Some(category) = category {
        // Category names are stored uppercase but transaction categories are
        // free text, so compare ignoring case.
        transactions.retain(|transaction| transaction.category.eq_ignore_ascii_case(category));
    }

    // The query returns oldest first, the page shows newest first.
    transactions.reverse();

    base(
        "Transactions",
        &[],
        &html! {
            (NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html())

            div class=(PAGE_CONTAINER_STYLE)
            {
                h1 class="text-2xl font-bold mb-4" { "Transactions" }

                (month_navigation(month, search, kind, category))
                (filter_form(month, search, kind, category, &categories))
                (transactions_table(&transactions))

                a
                    href=(endpoints::NEW_TRANSACTION_VIEW)
                    class="mt-4 px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 hover:dark:bg-blue-700 text-white rounded"
                {
                    "Add transaction"
                }
            }
        },
    )
    .into_response()
}

fn month_url(
    month: Date,
    search: Option<&str>,
    kind: Option<TransactionKind>,
    category: Option<&str>,
) -> String {
    let mut pairs = vec![("month", format_month(month))];

    if let Some(search) = search {
        pairs.push(("search", search.to_owned()));
    }

    if let Some(kind) = kind {
        pairs.push(("kind", kind.as_str().to_owned()));
    }

    if let Some(category) = category {
        pairs.push(("category", category.to_owned()));
    }

    match serde_urlencoded::to_string(&pairs) {
        Ok(query) => format!("{}?{query}", endpoints::TRANSACTIONS_VIEW),
        Err(error) => {
            tracing::error!("could not encode transaction filters: {error}");
            format!(
                "{}?month={}",
                endpoints::TRANSACTIONS_VIEW,
                format_month(month)
            )
        }
    }
}

fn month_navigation(
    month: Date,
    search: Option<&str>,
    kind: Option<TransactionKind>,
    category: Option<&str>,
) -> Markup {
    let previous = month - Duration::days(1);
    let next = next_month(month);

    html! {
        div class="flex items-center gap-4 mb-4"
        {
            a href=(month_url(previous, search, kind, category)) class=(LINK_STYLE) { "← Previous" }

            span class="font-semibold"
            {
                (format!("{} {}", month.month(), month.year()))
            }

            a href=(month_url(next, search, kind, category)) class=(LINK_STYLE) { "Next →" }
        }
    }
}

fn filter_form(
    month: Date,
    search: Option<&str>,
    kind: Option<TransactionKind>,
    category: Option<&str>,
    categories: &[Category],
) -> Markup {
    html! {
        form method="get" action=(endpoints::TRANSACTIONS_VIEW) class="w-full max-w-2xl mb-4 flex flex-wrap gap-2"
        {
            input type="hidden" name="month" value=(format_month(month));

            input
                type="search"
                name="search"
                placeholder="Search descriptions..."
                class=(FORM_TEXT_INPUT_STYLE)
                value=[search];

            select name="kind" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "All kinds" }
                option value="income" selected[kind == Some(TransactionKind::Income)] { "Income" }
                option value="expense" selected[kind == Some(TransactionKind::Expense)] { "Expense" }
            }

            select name="category" class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "All categories" }

                @for option in categories
                {
                    option
                        value=(option.name)
                        selected[category == Some(option.name.as_str())]
                    {
                        (option.name)
                    }
                }
            }

            button
                type="submit"
                class="px-4 py-2 bg-blue-500 dark:bg-blue-600 hover:bg-blue-600 hover:dark:bg-blue-700 text-white rounded"
            {
                "Filter"
            }
        }
    }
}

fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="w-full max-w-4xl overflow-x-auto shadow-md rounded-lg"
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
                        th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                    }
                }

                tbody
                {
                    @if transactions.is_empty()
                    {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) colspan="5"
                            {
                                "No transactions for this month."
                            }
                        }
                    }

                    @for transaction in transactions
                    {
                        @let row_id = format!("transaction-{}", transaction.id);
                        @let amount_style = match transaction.kind {
                            TransactionKind::Income => "text-green-600 dark:text-green-400",
                            TransactionKind::Expense => "text-red-600 dark:text-red-400",
                        };
                        @let amount_sign = match transaction.kind {
                            TransactionKind::Income => "+",
                            TransactionKind::Expense => "−",
                        };

                        tr id=(row_id) class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.date) }
                            td class=(TABLE_CELL_STYLE) { (transaction.description) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
                            }
                            td class=(format!("{TABLE_CELL_STYLE} {amount_style}"))
                            {
                                (amount_sign) (format_currency(transaction.amount))
                            }
                            td class=(format!("{TABLE_CELL_STYLE} space-x-2"))
                            {
                                (edit_delete_action_links(
                                    &endpoints::format_endpoint(
                                        endpoints::EDIT_TRANSACTION_VIEW,
                                        transaction.id,
                                    ),
                                    &endpoints::format_endpoint(
                                        endpoints::TRANSACTION,
                                        transaction.id,
                                    ),
                                    "Are you sure you want to delete this transaction?",
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
