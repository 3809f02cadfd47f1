//! Categories label expenses so they can be budgeted and charted.

mod create;
mod db;
mod delete;
mod domain;
mod list;

pub use create::create_category_endpoint;
pub use db::{create_category, create_category_table, delete_category, get_categories};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryId, CategoryName};
pub use list::get_categories_page;
