//! Savings goals with progress tracked by deposits.

mod create;
mod db;
mod delete;
mod deposit;
mod list;

pub use create::create_goal_endpoint;
pub use db::{
    Goal, GoalId, add_to_goal, create_goal, create_goal_table, delete_goal, get_goals,
};
pub use delete::delete_goal_endpoint;
pub use deposit::goal_deposit_endpoint;
pub use list::get_goals_page;
