//! The transaction model and queries.

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, Month, OffsetDateTime, format_description::FormatItem, macros::format_description};

use crate::{Error, database_id::TransactionId, wallet::WalletId};

/// The category given to transactions that have not been categorised.
pub const UNCATEGORIZED: &str = "Uncategorized";

const MONTH_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]");

/// Whether a transaction is money coming in or going out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl TransactionKind {
    /// The kind as the string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl ToSql for TransactionKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(FromSqlError::Other(
                format!("invalid transaction kind {other:?}").into(),
            )),
        }
    }
}

/// An income or expense record.
///
/// Amounts are stored as positive dollar values, the direction of the money
/// comes from [TransactionKind].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The transaction's ID.
    pub id: TransactionId,
    /// The amount of money in dollars. Always positive.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A description of what the transaction was for.
    pub description: String,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// The category the transaction belongs to.
    pub category: String,
    /// The wallet the transaction belongs to, if any.
    pub wallet_id: Option<WalletId>,
    /// An ID for detecting transactions that have been imported before.
    pub import_id: Option<i64>,
}

impl Transaction {
    /// Start building a transaction with the required fields.
    ///
    /// Defaults to an uncategorised expense with no wallet.
    pub fn build(amount: f64, date: Date, description: String) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            description,
            kind: TransactionKind::Expense,
            category: UNCATEGORIZED.to_owned(),
            wallet_id: None,
            import_id: None,
        }
    }
}

/// Builds a [Transaction] for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    amount: f64,
    date: Date,
    description: String,
    kind: TransactionKind,
    category: String,
    wallet_id: Option<WalletId>,
    import_id: Option<i64>,
}

impl TransactionBuilder {
    /// Set whether the transaction is income or an expense.
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the transaction's category.
    pub fn category(mut self, category: String) -> Self {
        self.category = category;
        self
    }

    /// Set the wallet the transaction belongs to.
    pub fn wallet_id(mut self, wallet_id: Option<WalletId>) -> Self {
        self.wallet_id = wallet_id;
        self
    }

    /// Set the import ID used to detect duplicate imports.
    pub fn import_id(mut self, import_id: Option<i64>) -> Self {
        self.import_id = import_id;
        self
    }

    /// Check the builder's fields against the validation rules.
    ///
    /// # Errors
    /// Returns [Error::NonPositiveAmount] if the amount is zero or negative,
    /// or [Error::FutureDate] if the date is after today.
    pub fn validate(&self) -> Result<(), Error> {
        if self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }

        let today = OffsetDateTime::now_utc().date();

        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        Ok(())
    }
}

/// Create the transaction table if it does not exist.
///
/// # Errors
/// Returns an error if there was a problem executing the SQL.
pub fn create_transaction_table(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            kind TEXT NOT NULL,
            category TEXT NOT NULL,
            wallet_id INTEGER REFERENCES wallet(id) ON UPDATE CASCADE ON DELETE SET NULL,
            import_id INTEGER UNIQUE
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\" (date, id);",
    )?;

    Ok(())
}

/// Insert a new transaction into the database.
///
/// # Errors
/// Returns [Error::InvalidWallet] if the wallet does not exist, or
/// [Error::DuplicateImportId] if a transaction with the same import ID has
/// already been inserted.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    builder.validate()?;

    let date_string = builder.date.to_string();

    let transaction = connection
        .query_row(
            "INSERT INTO \"transaction\" \
            (amount, date, description, kind, category, wallet_id, import_id) \
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
            RETURNING id, amount, date, description, kind, category, wallet_id, import_id",
            (
                builder.amount,
                date_string,
                &builder.description,
                builder.kind,
                &builder.category,
                builder.wallet_id,
                builder.import_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidWallet(builder.wallet_id),
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicateImportId,
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such transaction.
pub fn get_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, amount, date, description, kind, category, wallet_id, import_id \
            FROM \"transaction\" WHERE id = :id",
        )?
        .query_one(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Retrieve the transactions within the calendar month that contains
/// `month`, newest first.
///
/// `search` filters transactions whose description contains the given text.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn get_transactions_for_month(
    month: Date,
    search: Option<&str>,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let month_start = month.replace_day(1).map_err(|_| Error::NotFound)?;
    let month_end = next_month(month_start);

    let search_pattern = search
        .map(|text| format!("%{}%", text.trim()))
        .unwrap_or_else(|| "%".to_owned());

    connection
        .prepare(
            "SELECT id, amount, date, description, kind, category, wallet_id, import_id \
            FROM \"transaction\" \
            WHERE date >= :month_start AND date < :month_end \
            AND description LIKE :search \
            ORDER BY date DESC, id DESC",
        )?
        .query_map(
            &[
                (":month_start", &month_start.to_string()),
                (":month_end", &month_end.to_string()),
                (":search", &search_pattern),
            ],
            map_transaction_row,
        )?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve all transactions on or after `date`, oldest first.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn get_transactions_since(
    date: Date,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, amount, date, description, kind, category, wallet_id, import_id \
            FROM \"transaction\" WHERE date >= :date ORDER BY date ASC, id ASC",
        )?
        .query_map(&[(":date", &date.to_string())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Overwrite the editable fields of the transaction with `id`.
///
/// # Errors
/// Returns [Error::UpdateMissingTransaction] if there is no such
/// transaction, or [Error::InvalidWallet] if the wallet does not exist.
pub fn update_transaction(
    id: TransactionId,
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<(), Error> {
    builder.validate()?;

    let rows_affected = connection
        .execute(
            "UPDATE \"transaction\" \
            SET amount = ?1, date = ?2, description = ?3, kind = ?4, category = ?5, wallet_id = ?6 \
            WHERE id = ?7",
            (
                builder.amount,
                builder.date.to_string(),
                &builder.description,
                builder.kind,
                &builder.category,
                builder.wallet_id,
                id,
            ),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidWallet(builder.wallet_id),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction with `id`.
///
/// # Errors
/// Returns [Error::DeleteMissingTransaction] if there is no such
/// transaction.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Count how many transactions exist.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn count_transactions(connection: &Connection) -> Result<usize, Error> {
    let count =
        connection.query_row("SELECT COUNT(id) FROM \"transaction\"", [], |row| row.get(0))?;

    Ok(count)
}

/// Parse a month query parameter such as "2026-02" into the first day of
/// that month. Returns `None` if the text is not a valid year and month.
pub fn parse_month(text: &str) -> Option<Date> {
    Date::parse(&format!("{text}-01"), format_description!("[year]-[month]-[day]")).ok()
}

/// Format a date as a month query parameter such as "2026-02".
pub fn format_month(date: Date) -> String {
    date.format(MONTH_FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// The first day of the month after the month containing `date`.
pub(crate) fn next_month(date: Date) -> Date {
    let first_of_month = date.replace_day(1).unwrap_or(date);

    if first_of_month.month() == Month::December {
        Date::from_calendar_date(first_of_month.year() + 1, Month::January, 1)
            .unwrap_or(first_of_month)
    } else {
        first_of_month
            .replace_month(first_of_month.month().next())
            .unwrap_or(first_of_month)
    }
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let date_string: String = row.get(2)?;
    let date = Date::parse(
        &date_string,
        format_description!("[year]-[month]-[day]"),
    )
    .map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            Box::new(error),
        )
    })?;

    Ok(Transaction {
        id: row.get(0)?,
        amount: row.get(1)?,
        date,
        description: row.get(3)?,
        kind: row.get(4)?,
        category: row.get(5)?,
        wallet_id: row.get(6)?,
        import_id: row.get(7)?,
    })
}

#[cfg(test)]
mod transaction_builder_tests {
    use time::{Duration, OffsetDateTime, macros::date};

    use crate::Error;

    use super::{Transaction, TransactionKind, UNCATEGORIZED};

    #[test]
    fn builder_defaults_to_uncategorised_expense() {
        let builder = Transaction::build(10.0, date!(2026 - 02 - 05), "Coffee".to_owned());

        builder.validate().unwrap();
        assert_eq!(builder.kind, TransactionKind::Expense);
        assert_eq!(builder.category, UNCATEGORIZED);
        assert_eq!(builder.wallet_id, None);
        assert_eq!(builder.import_id, None);
    }

    #[test]
    fn validate_rejects_non_positive_amount() {
        let builder = Transaction::build(0.0, date!(2026 - 02 - 05), "Nothing".to_owned());

        assert_eq!(builder.validate(), Err(Error::NonPositiveAmount));
    }

    #[test]
    fn validate_rejects_future_date() {
        let tomorrow = OffsetDateTime::now_utc().date() + Duration::days(1);
        let builder = Transaction::build(10.0, tomorrow, "Time travel".to_owned());

        assert_eq!(builder.validate(), Err(Error::FutureDate(tomorrow)));
    }
}
