//! Monthly spending budgets per category.

mod db;
mod delete;
mod list;
mod upsert;

pub use db::{
    Budget, BudgetId, create_budget_table, delete_budget, get_budgets, upsert_budget,
};
pub use delete::delete_budget_endpoint;
pub use list::get_budgets_page;
pub use upsert::upsert_budget_endpoint;
