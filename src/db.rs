//! Database schema creation.

use rusqlite::Connection;

use crate::{
    Error, auth::create_user_table, budget::create_budget_table,
    category::create_category_table, goal::create_goal_table,
    subscription::create_subscription_table, transaction::create_transaction_table,
    wallet::create_wallet_table,
};

/// Create the application tables if they do not exist.
///
/// Foreign key enforcement is switched on for the connection before any table
/// is created.
///
/// # Errors
/// Returns an error if the tables could not be created.
pub fn initialize(connection: &mut Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    let transaction = connection.transaction()?;

    create_user_table(&transaction)?;
    create_wallet_table(&transaction)?;
    create_category_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_goal_table(&transaction)?;
    create_subscription_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
