//! Database queries for categories.

use rusqlite::{Connection, Row};

use crate::Error;

use super::domain::{Category, CategoryId, CategoryName};

/// Create the category table if it does not exist.
///
/// # Errors
/// Returns an error if there was a problem executing the SQL.
pub fn create_category_table(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        );",
    )?;

    Ok(())
}

/// Insert a new category into the database.
///
/// # Errors
/// Returns [Error::DuplicateCategoryName] if a category with the same name
/// already exists.
pub fn create_category(name: CategoryName, connection: &Connection) -> Result<Category, Error> {
    connection
        .execute("INSERT INTO category (name) VALUES (?1)", (name.as_str(),))
        .map_err(|error| match Error::from(error) {
            Error::DuplicateCategoryName(_) => {
                Error::DuplicateCategoryName(name.as_str().to_owned())
            }
            error => error,
        })?;

    Ok(Category {
        id: connection.last_insert_rowid(),
        name: name.as_str().to_owned(),
    })
}

/// Retrieve all categories, ordered by name.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn get_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name FROM category ORDER BY name ASC")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Delete a category.
///
/// Transactions keep their category text, so deleting a category does not
/// touch the transaction table.
///
/// # Errors
/// Returns [Error::DeleteMissingCategory] if there is no such category.
pub fn delete_category(id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}
