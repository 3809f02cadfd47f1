//! The budget model and queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The ID of a budget.
pub type BudgetId = i64;

/// A monthly spending limit for a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The budget's ID.
    pub id: BudgetId,
    /// The category the budget applies to.
    pub category: String,
    /// The monthly spending limit in dollars.
    pub amount: f64,
}

/// Create the budget table if it does not exist.
///
/// # Errors
/// Returns an error if there was a problem executing the SQL.
pub fn create_budget_table(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category TEXT NOT NULL UNIQUE,
            amount REAL NOT NULL
        );",
    )?;

    Ok(())
}

/// Insert a budget for a category, or overwrite the amount if the category
/// already has one.
///
/// # Errors
/// Returns [Error::NonPositiveAmount] if the amount is zero or negative.
pub fn upsert_budget(
    category: &str,
    amount: f64,
    connection: &Connection,
) -> Result<Budget, Error> {
    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    let budget = connection.query_row(
        "INSERT INTO budget (category, amount) VALUES (?1, ?2) \
        ON CONFLICT(category) DO UPDATE SET amount = excluded.amount \
        RETURNING id, category, amount",
        (category, amount),
        map_budget_row,
    )?;

    Ok(budget)
}

/// Retrieve all budgets, ordered by category.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn get_budgets(connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare("SELECT id, category, amount FROM budget ORDER BY category ASC")?
        .query_map([], map_budget_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Delete a budget.
///
/// # Errors
/// Returns [Error::DeleteMissingBudget] if there is no such budget.
pub fn delete_budget(id: BudgetId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM budget WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    Ok(Budget {
        id: row.get(0)?,
        category: row.get(1)?,
        amount: row.get(2)?,
    })
}
