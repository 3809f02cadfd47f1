//! The user model and queries.
//!
//! The app is single-user: registration creates user 1 and is refused once a
//! user exists.

use std::fmt::Display;

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, auth::password::PasswordHash};

/// The ID of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Create a user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user of the application.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID.
    pub id: UserID,
    /// The hash of the user's password.
    pub password_hash: PasswordHash,
}

/// Create the user table if it does not exist.
///
/// # Errors
/// Returns an error if there was a problem executing the SQL.
pub fn create_user_table(connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY,
            password TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Insert a new user into the database.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn create_user(password_hash: PasswordHash, connection: &Connection) -> Result<User, Error> {
    connection.execute(
        "INSERT INTO user (password) VALUES (?1)",
        (password_hash.to_string(),),
    )?;

    let id = UserID::new(connection.last_insert_rowid());

    Ok(User { id, password_hash })
}

/// Retrieve a user by their ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no such user, or another error if
/// there was an SQL error.
pub fn get_user_by_id(id: UserID, connection: &Connection) -> Result<User, Error> {
    let user = connection.query_row(
        "SELECT id, password FROM user WHERE id = ?1",
        (id.as_i64(),),
        |row| {
            let raw_id: i64 = row.get(0)?;
            let raw_password_hash: String = row.get(1)?;

            Ok(User {
                id: UserID::new(raw_id),
                password_hash: PasswordHash::new_unchecked(raw_password_hash),
            })
        },
    )?;

    Ok(user)
}

/// Count how many users exist.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn count_users(connection: &Connection) -> Result<usize, Error> {
    let count = connection.query_row("SELECT COUNT(id) FROM user", [], |row| row.get(0))?;

    Ok(count)
}

#[cfg(test)]
mod user_tests {
    use rusqlite::Connection;

    use crate::{
        Error,
        auth::password::PasswordHash,
    };

    use super::{UserID, count_users, create_user, create_user_table, get_user_by_id};

    fn test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();

        connection
    }

    #[test]
    fn create_then_get_user() {
        let connection = test_connection();
        let hash = PasswordHash::new_unchecked("hash".to_owned());

        let created = create_user(hash, &connection).unwrap();
        let retrieved = get_user_by_id(created.id, &connection).unwrap();

        assert_eq!(created, retrieved);
    }

    #[test]
    fn get_missing_user_is_not_found() {
        let connection = test_connection();

        let result = get_user_by_id(UserID::new(999), &connection);

        assert!(matches!(result, Err(Error::NotFound)));
    }

    #[test]
    fn count_users_counts() {
        let connection = test_connection();
        assert_eq!(count_users(&connection).unwrap(), 0);

        create_user(PasswordHash::new_unchecked("hash".to_owned()), &connection).unwrap();

        assert_eq!(count_users(&connection).unwrap(), 1);
    }
}
