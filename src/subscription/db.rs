//! The subscription model and queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The ID of a subscription.
pub type SubscriptionId = i64;

/// A recurring expense billed on the same day each month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// The subscription's ID.
    pub id: SubscriptionId,
    /// The name of the service.
    pub name: String,
    /// The monthly cost in dollars.
    pub amount: f64,
    /// The day of the month the subscription is billed (1 to 31).
    pub billing_day: u8,
    /// The category the subscription's spending counts towards.
    pub category: String,
    /// Whether the subscription is currently active. Paused subscriptions
    /// are kept but excluded from the monthly total.
    pub is_active: bool,
}

/// Create the subscription table if it does not exist.
///
/// # Errors
/// Returns an error if there was a problem executing the SQL.
pub fn create_subscription_table(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS subscription (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            billing_day INTEGER NOT NULL,
            category TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        );",
    )?;

    Ok(())
}

/// Insert a new subscription into the database.
///
/// # Errors
/// Returns [Error::NonPositiveAmount] if the amount is zero or negative, or
/// [Error::InvalidBillingDay] if the billing day is not between 1 and 31.
pub fn create_subscription(
    name: &str,
    amount: f64,
    billing_day: u8,
    category: &str,
    connection: &Connection,
) -> Result<Subscription, Error> {
    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    if !(1..=31).contains(&billing_day) {
        return Err(Error::InvalidBillingDay(billing_day));
    }

    let subscription = connection.query_row(
        "INSERT INTO subscription (name, amount, billing_day, category, is_active) \
        VALUES (?1, ?2, ?3, ?4, 1) \
        RETURNING id, name, amount, billing_day, category, is_active",
        (name, amount, billing_day, category),
        map_subscription_row,
    )?;

    Ok(subscription)
}

/// Retrieve all subscriptions, ordered by billing day.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn get_subscriptions(connection: &Connection) -> Result<Vec<Subscription>, Error> {
    connection
        .prepare(
            "SELECT id, name, amount, billing_day, category, is_active \
            FROM subscription ORDER BY billing_day ASC, name ASC",
        )?
        .query_map([], map_subscription_row)?
        .map(|maybe_subscription| maybe_subscription.map_err(|error| error.into()))
        .collect()
}

/// Flip a subscription between active and paused.
///
/// # Errors
/// Returns [Error::UpdateMissingSubscription] if there is no such
/// subscription.
pub fn toggle_subscription(
    id: SubscriptionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE subscription SET is_active = NOT is_active WHERE id = ?1",
        (id,),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingSubscription);
    }

    Ok(())
}

/// Delete a subscription.
///
/// # Errors
/// Returns [Error::DeleteMissingSubscription] if there is no such
/// subscription.
pub fn delete_subscription(id: SubscriptionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM subscription WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingSubscription);
    }

    Ok(())
}

fn map_subscription_row(row: &Row) -> Result<Subscription, rusqlite::Error> {
    Ok(Subscription {
        id: row.get(0)?,
        name: row.get(1)?,
        amount: row.get(2)?,
        billing_day: row.get(3)?,
        category: row.get(4)?,
        is_active: row.get(5)?,
    })
}
