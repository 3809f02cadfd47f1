//! The commit endpoint: save the reviewed transactions in one batch.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, macros::format_description};

use crate::{
    Error,
    alert::Alert,
    transaction::{TransactionKind, UNCATEGORIZED},
    wallet::WalletId,
};

use super::preview::ImportState;

/// The review form data: one entry per field per transaction row, plus the
/// wallet every row is imported into.
#[derive(Debug, Deserialize)]
pub struct CommitImportForm {
    /// The wallet to import into. Blank means no wallet.
    pub wallet_id: Option<String>,
    /// The transaction dates in YYYY-MM-DD form.
    #[serde(default)]
    pub date: Vec<String>,
    /// The transaction descriptions.
    #[serde(default)]
    pub description: Vec<String>,
    /// The transaction kinds, "income" or "expense".
    #[serde(default)]
    pub kind: Vec<String>,
    /// The transaction amounts in dollars.
    #[serde(default)]
    pub amount: Vec<f64>,
    /// The transaction categories.
    #[serde(default)]
    pub category: Vec<String>,
    /// The statement-derived IDs used to skip rows that were imported
    /// before.
    #[serde(default)]
    pub import_id: Vec<i64>,
}

struct ImportRow {
    amount: f64,
    date: Date,
    description: String,
    kind: TransactionKind,
    category: String,
    import_id: i64,
}

/// How a batch insert went: how many rows were saved and how many were
/// skipped as already-imported duplicates.
struct ImportOutcome {
    inserted: usize,
    skipped: usize,
}

/// Save the reviewed transactions, skipping rows whose import ID is already
/// in the database. All rows are saved in a single database transaction, so
/// a failure saves nothing.
pub async fn commit_import_endpoint(
    State(state): State<ImportState>,
    Form(form): Form<CommitImportForm>,
) -> Response {
    let start_time = std::time::Instant::now();

    let wallet_id = match parse_wallet_id(form.wallet_id.as_deref()) {
        Ok(wallet_id) => wallet_id,
        Err(response) => return response,
    };

    let rows = match collect_rows(&form) {
        Ok(rows) => rows,
        Err(response) => return response,
    };

    let mut connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let outcome = match insert_rows(&rows, wallet_id, &mut connection) {
        Ok(outcome) => outcome,
        Err(Error::InvalidWallet(wallet_id)) => {
            return Error::InvalidWallet(wallet_id).into_alert_response();
        }
        Err(error) => {
            tracing::error!("could not import transactions: {error}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Import failed".to_owned(),
                    details: "No transactions were saved. Try again later.".to_owned(),
                }
                .into_html(),
            )
                .into_response();
        }
    };

    let duration = start_time.elapsed();
    tracing::info!(
        "imported {} transactions ({} duplicates skipped) in {:.1}ms",
        outcome.inserted,
        outcome.skipped,
        duration.as_secs_f64() * 1000.0
    );

    let details = if outcome.skipped == 0 {
        format!("Took {:.1}ms.", duration.as_secs_f64() * 1000.0)
    } else {
        format!(
            "{} rows were skipped because they were imported before. Took {:.1}ms.",
            outcome.skipped,
            duration.as_secs_f64() * 1000.0
        )
    };

    (
        StatusCode::CREATED,
        Alert::Success {
            message: format!("Imported {} transactions.", outcome.inserted),
            details,
        }
        .into_html(),
    )
        .into_response()
}

fn parse_wallet_id(raw: Option<&str>) -> Result<Option<WalletId>, Response> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(None),
        Some(raw) => match raw.parse() {
            Ok(wallet_id) => Ok(Some(wallet_id)),
            Err(_) => Err(Error::InvalidWallet(None).into_alert_response()),
        },
    }
}

/// Validate the parallel form vectors into one row per transaction.
fn collect_rows(form: &CommitImportForm) -> Result<Vec<ImportRow>, Response> {
    let row_count = form.import_id.len();

    let lengths_match = form.date.len() == row_count
        && form.description.len() == row_count
        && form.kind.len() == row_count
        && form.amount.len() == row_count
        && form.category.len() == row_count;

    if !lengths_match {
        return Err((
            StatusCode::BAD_REQUEST,
            Alert::Error {
                message: "Import failed".to_owned(),
                details: "The review form was malformed, no transactions were saved. \
                    Upload the statement again."
                    .to_owned(),
            }
            .into_html(),
        )
            .into_response());
    }

    let date_format = format_description!("[year]-[month]-[day]");
    let mut rows = Vec::with_capacity(row_count);

    for index in 0..row_count {
        let date = match Date::parse(&form.date[index], date_format) {
            Ok(date) => date,
            Err(_) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Alert::Error {
                        message: "Import failed".to_owned(),
                        details: format!(
                            "Row {} has an invalid date, no transactions were saved. \
                            Use the format YYYY-MM-DD.",
                            index + 1
                        ),
                    }
                    .into_html(),
                )
                    .into_response());
            }
        };

        let kind = match form.kind[index].as_str() {
            "income" => TransactionKind::Income,
            "expense" => TransactionKind::Expense,
            other => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Alert::Error {
                        message: "Import failed".to_owned(),
                        details: format!(
                            "Row {} has an unrecognised kind \"{other}\", no transactions \
                            were saved.",
                            index + 1
                        ),
                    }
                    .into_html(),
                )
                    .into_response());
            }
        };

        if form.amount[index] < 0.0 {
            return Err(Error::NonPositiveAmount.into_alert_response());
        }

        let category = form.category[index].trim();
        let category = if category.is_empty() {
            UNCATEGORIZED.to_owned()
        } else {
            category.to_owned()
        };

        rows.push(ImportRow {
            amount: form.amount[index],
            date,
            description: form.description[index].trim().to_owned(),
            kind,
            category,
            import_id: form.import_id[index],
        });
    }

    Ok(rows)
}

fn insert_rows(
    rows: &[ImportRow],
    wallet_id: Option<WalletId>,
    connection: &mut Connection,
) -> Result<ImportOutcome, Error> {
    let transaction = connection.transaction()?;
    let mut inserted = 0;
    let mut skipped = 0;

    {
        let mut statement = transaction.prepare(
            "INSERT INTO \"transaction\" \
            (amount, date, description, kind, category, wallet_id, import_id) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
            ON CONFLICT(import_id) DO NOTHING",
        )?;

        for row in rows {
            let rows_affected = statement
                .execute((
                    row.amount,
                    row.date.to_string(),
                    &row.description,
                    row.kind,
                    &row.category,
                    wallet_id,
                    row.import_id,
                ))
                .map_err(|error| match error {
                    rusqlite::Error::SqliteFailure(
                        rusqlite::ffi::Error {
                            code: _,
                            extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                        },
                        _,
                    ) => Error::InvalidWallet(wallet_id),
                    error => error.into(),
                })?;

            if rows_affected == 0 {
                skipped += 1;
            } else {
                inserted += 1;
            }
        }
    }

    transaction.commit()?;

    Ok(ImportOutcome { inserted, skipped })
}

#[cfg(test)]
mod commit_import_endpoint_tests {
    use axum::{Router, http::StatusCode, routing::post};
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        AppState, endpoints,
        transaction::{TransactionKind, count_transactions, get_transactions_since},
        wallet::{WalletName, create_wallet},
    };

    use super::commit_import_endpoint;

    fn test_server() -> (TestServer, AppState) {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC".to_owned(),
        )
        .unwrap();

        let app = Router::new()
            .route(endpoints::IMPORT, post(commit_import_endpoint))
            .with_state(state.clone());

        (TestServer::new(app), state)
    }

    fn review_form() -> Vec<(&'static str, String)> {
        [
            ("wallet_id", ""),
            ("import_id", "101"),
            ("date", "2026-02-05"),
            ("description", "Grocery Store"),
            ("kind", "expense"),
            ("amount", "45.90"),
            ("category", "Food"),
            ("import_id", "102"),
            ("date", "2026-02-07"),
            ("description", "Salary"),
            ("kind", "income"),
            ("amount", "2500.00"),
            ("category", ""),
        ]
        .into_iter()
        .map(|(key, value)| (key, value.to_owned()))
        .collect()
    }

    #[tokio::test]
    async fn commit_saves_reviewed_transactions() {
        let (server, state) = test_server();

        let response = server.post(endpoints::IMPORT).form(&review_form()).await;

        response.assert_status(StatusCode::CREATED);
        assert!(response.text().contains("Imported 2 transactions."));

        let connection = state.db_connection.lock().unwrap();
        let transactions = get_transactions_since(date!(2026 - 01 - 01), &connection).unwrap();

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].kind, TransactionKind::Expense);
        assert_eq!(transactions[0].amount, 45.90);
        assert_eq!(transactions[0].category, "Food");
        assert_eq!(transactions[1].kind, TransactionKind::Income);
        assert_eq!(transactions[1].category, "Uncategorized");
    }

    #[tokio::test]
    async fn reimporting_the_same_statement_skips_duplicates() {
        let (server, state) = test_server();

        server.post(endpoints::IMPORT).form(&review_form()).await;
        let response = server.post(endpoints::IMPORT).form(&review_form()).await;

        response.assert_status(StatusCode::CREATED);
        assert!(response.text().contains("Imported 0 transactions."));
        assert!(response.text().contains("2 rows were skipped"));

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 2);
    }

    #[tokio::test]
    async fn commit_assigns_wallet_to_all_rows() {
        let (server, state) = test_server();
        let wallet = {
            let connection = state.db_connection.lock().unwrap();
            create_wallet(WalletName::new("Checking").unwrap(), &connection).unwrap()
        };

        let mut form = review_form();
        form[0] = ("wallet_id", wallet.id.to_string());

        let response = server.post(endpoints::IMPORT).form(&form).await;

        response.assert_status(StatusCode::CREATED);

        let connection = state.db_connection.lock().unwrap();
        let transactions = get_transactions_since(date!(2026 - 01 - 01), &connection).unwrap();
        assert!(
            transactions
                .iter()
                .all(|transaction| transaction.wallet_id == Some(wallet.id))
        );
    }

    #[tokio::test]
    async fn unknown_wallet_saves_nothing() {
        let (server, state) = test_server();

        let mut form = review_form();
        form[0] = ("wallet_id", "999".to_owned());

        let response = server.post(endpoints::IMPORT).form(&form).await;

        response.assert_status(StatusCode::BAD_REQUEST);

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }

    #[tokio::test]
    async fn invalid_date_saves_nothing() {
        let (server, state) = test_server();

        let mut form = review_form();
        form[2] = ("date", "05/02/2026".to_owned());

        let response = server.post(endpoints::IMPORT).form(&form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert!(response.text().contains("no transactions were saved"));

        let connection = state.db_connection.lock().unwrap();
        assert_eq!(count_transactions(&connection).unwrap(), 0);
    }
}
