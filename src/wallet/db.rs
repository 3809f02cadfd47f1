//! Database queries for wallets.

use rusqlite::{Connection, Row};

use crate::Error;

use super::domain::{Wallet, WalletBalance, WalletId, WalletName};

/// Create the wallet table if it does not exist.
///
/// # Errors
/// Returns an error if there was a problem executing the SQL.
pub fn create_wallet_table(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS wallet (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        );",
    )?;

    Ok(())
}

/// Insert a new wallet into the database.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn create_wallet(name: WalletName, connection: &Connection) -> Result<Wallet, Error> {
    connection.execute("INSERT INTO wallet (name) VALUES (?1)", (name.as_str(),))?;

    Ok(Wallet {
        id: connection.last_insert_rowid(),
        name: name.as_str().to_owned(),
    })
}

/// Retrieve a wallet by its ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such wallet.
pub fn get_wallet(id: WalletId, connection: &Connection) -> Result<Wallet, Error> {
    let wallet = connection.query_row(
        "SELECT id, name FROM wallet WHERE id = ?1",
        (id,),
        map_wallet_row,
    )?;

    Ok(wallet)
}

/// Retrieve all wallets, ordered by name.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn get_wallets(connection: &Connection) -> Result<Vec<Wallet>, Error> {
    connection
        .prepare("SELECT id, name FROM wallet ORDER BY name ASC")?
        .query_map([], map_wallet_row)?
        .map(|maybe_wallet| maybe_wallet.map_err(|error| error.into()))
        .collect()
}

/// Retrieve all wallets with their balances and transaction counts.
///
/// A wallet's balance is the sum of its income minus the sum of its
/// expenses.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn get_wallets_with_balances(connection: &Connection) -> Result<Vec<WalletBalance>, Error> {
    connection
        .prepare(
            "SELECT w.id, w.name,
                COALESCE(SUM(CASE WHEN t.kind = 'income' THEN t.amount ELSE -t.amount END), 0.0),
                COUNT(t.id)
            FROM wallet w
            LEFT JOIN \"transaction\" t ON t.wallet_id = w.id
            GROUP BY w.id, w.name
            ORDER BY w.name ASC",
        )?
        .query_map([], |row| {
            Ok(WalletBalance {
                wallet: Wallet {
                    id: row.get(0)?,
                    name: row.get(1)?,
                },
                balance: row.get(2)?,
                transaction_count: row.get(3)?,
            })
        })?
        .map(|maybe_balance| maybe_balance.map_err(|error| error.into()))
        .collect()
}

/// Delete a wallet.
///
/// # Errors
/// Returns [Error::WalletHasTransactions] if any transaction still belongs
/// to the wallet, or [Error::DeleteMissingWallet] if there is no such
/// wallet.
pub fn delete_wallet(id: WalletId, connection: &Connection) -> Result<(), Error> {
    let transaction_count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE wallet_id = ?1",
        (id,),
        |row| row.get(0),
    )?;

    if transaction_count > 0 {
        return Err(Error::WalletHasTransactions);
    }

    let rows_affected = connection.execute("DELETE FROM wallet WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingWallet);
    }

    Ok(())
}

fn map_wallet_row(row: &Row) -> Result<Wallet, rusqlite::Error> {
    Ok(Wallet {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
