//! Transactions are the income and expense records at the heart of the app.

mod core;
mod create;
mod delete;
mod edit;
mod list;

pub use core::{
    Transaction, TransactionBuilder, TransactionKind, UNCATEGORIZED, count_transactions,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    format_month, get_transactions_for_month, get_transactions_since, parse_month,
    update_transaction,
};
pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use delete::delete_transaction_endpoint;
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use list::get_transactions_page;
