//! The savings goal model and queries.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::{Date, macros::format_description};

use crate::Error;

/// The ID of a savings goal.
pub type GoalId = i64;

/// Something being saved towards, for example a holiday or a new laptop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// The goal's ID.
    pub id: GoalId,
    /// What is being saved for.
    pub name: String,
    /// The amount of money to save in dollars.
    pub target: f64,
    /// How much has been saved so far in dollars.
    pub saved: f64,
    /// When the goal should be reached, if a deadline was set.
    pub due_date: Option<Date>,
}

/// Create the goal table if it does not exist.
///
/// # Errors
/// Returns an error if there was a problem executing the SQL.
pub fn create_goal_table(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS goal (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            target REAL NOT NULL,
            saved REAL NOT NULL DEFAULT 0,
            due_date TEXT
        );",
    )?;

    Ok(())
}

/// Insert a new goal into the database.
///
/// # Errors
/// Returns [Error::NonPositiveAmount] if the target is zero or negative.
pub fn create_goal(
    name: &str,
    target: f64,
    due_date: Option<Date>,
    connection: &Connection,
) -> Result<Goal, Error> {
    if target <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    let goal = connection.query_row(
        "INSERT INTO goal (name, target, saved, due_date) VALUES (?1, ?2, 0, ?3) \
        RETURNING id, name, target, saved, due_date",
        (name, target, due_date.map(|date| date.to_string())),
        map_goal_row,
    )?;

    Ok(goal)
}

/// Add money to a goal's saved amount.
///
/// # Errors
/// Returns [Error::NonPositiveAmount] if the deposit is zero or negative,
/// or [Error::UpdateMissingGoal] if there is no such goal.
pub fn add_to_goal(id: GoalId, amount: f64, connection: &Connection) -> Result<(), Error> {
    if amount <= 0.0 {
        return Err(Error::NonPositiveAmount);
    }

    let rows_affected = connection.execute(
        "UPDATE goal SET saved = saved + ?1 WHERE id = ?2",
        (amount, id),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingGoal);
    }

    Ok(())
}

/// Retrieve all goals, ordered by due date with undated goals last.
///
/// # Errors
/// Returns an error if there was an SQL error.
pub fn get_goals(connection: &Connection) -> Result<Vec<Goal>, Error> {
    connection
        .prepare(
            "SELECT id, name, target, saved, due_date FROM goal \
            ORDER BY due_date IS NULL, due_date ASC, name ASC",
        )?
        .query_map([], map_goal_row)?
        .map(|maybe_goal| maybe_goal.map_err(|error| error.into()))
        .collect()
}

/// Delete a goal.
///
/// # Errors
/// Returns [Error::DeleteMissingGoal] if there is no such goal.
pub fn delete_goal(id: GoalId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM goal WHERE id = ?1", (id,))?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingGoal);
    }

    Ok(())
}

fn map_goal_row(row: &Row) -> Result<Goal, rusqlite::Error> {
    let due_date: Option<String> = row.get(4)?;
    let due_date = due_date
        .map(|text| {
            Date::parse(&text, format_description!("[year]-[month]-[day]")).map_err(|error| {
                rusqlite::Error::FromSqlConversionFailure(
                    4,
                    rusqlite::types::Type::Text,
                    Box::new(error),
                )
            })
        })
        .transpose()?;

    Ok(Goal {
        id: row.get(0)?,
        name: row.get(1)?,
        target: row.get(2)?,
        saved: row.get(3)?,
        due_date,
    })
}

#[cfg(test)]
mod goal_query_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{Error, db};

    use super::{add_to_goal, create_goal, delete_goal, get_goals};

    fn test_connection() -> Connection {
        let mut connection = Connection::open_in_memory().unwrap();
        db::initialize(&mut connection).unwrap();

        connection
    }

    #[test]
    fn create_goal_starts_with_nothing_saved() {
        let connection = test_connection();

        let goal = create_goal("Holiday", 2000.0, Some(date!(2026 - 12 - 01)), &connection)
            .unwrap();

        assert_eq!(goal.saved, 0.0);
        assert_eq!(goal.due_date, Some(date!(2026 - 12 - 01)));
    }

    #[test]
    fn create_goal_rejects_non_positive_target() {
        let connection = test_connection();

        assert_eq!(
            create_goal("Nothing", 0.0, None, &connection),
            Err(Error::NonPositiveAmount)
        );
    }

    #[test]
    fn deposits_accumulate() {
        let connection = test_connection();
        let goal = create_goal("Laptop", 1500.0, None, &connection).unwrap();

        add_to_goal(goal.id, 500.0, &connection).unwrap();
        add_to_goal(goal.id, 250.0, &connection).unwrap();

        let goals = get_goals(&connection).unwrap();
        assert_eq!(goals[0].saved, 750.0);
    }

    #[test]
    fn deposit_to_missing_goal_is_an_error() {
        let connection = test_connection();

        assert_eq!(
            add_to_goal(999, 100.0, &connection),
            Err(Error::UpdateMissingGoal)
        );
    }

    #[test]
    fn deposit_must_be_positive() {
        let connection = test_connection();
        let goal = create_goal("Laptop", 1500.0, None, &connection).unwrap();

        assert_eq!(
            add_to_goal(goal.id, -10.0, &connection),
            Err(Error::NonPositiveAmount)
        );
    }

    #[test]
    fn goals_are_ordered_by_due_date_with_undated_last() {
        let connection = test_connection();
        create_goal("No deadline", 100.0, None, &connection).unwrap();
        create_goal("December", 100.0, Some(date!(2026 - 12 - 01)), &connection).unwrap();
        create_goal("June", 100.0, Some(date!(2026 - 06 - 01)), &connection).unwrap();

        let goals = get_goals(&connection).unwrap();

        let names: Vec<&str> = goals.iter().map(|goal| goal.name.as_str()).collect();
        assert_eq!(names, vec!["June", "December", "No deadline"]);
    }

    #[test]
    fn delete_removes_goal() {
        let connection = test_connection();
        let goal = create_goal("Holiday", 2000.0, None, &connection).unwrap();

        delete_goal(goal.id, &connection).unwrap();

        assert!(get_goals(&connection).unwrap().is_empty());
    }

    #[test]
    fn delete_missing_goal_is_an_error() {
        let connection = test_connection();

        assert_eq!(delete_goal(999, &connection), Err(Error::DeleteMissingGoal));
    }
}
