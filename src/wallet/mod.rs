//! Wallets group transactions by account, for example "Checking" or "Cash".

mod create;
mod db;
mod delete;
mod domain;
mod list;

pub use create::create_wallet_endpoint;
pub use db::{
    create_wallet, create_wallet_table, delete_wallet, get_wallet, get_wallets,
    get_wallets_with_balances,
};
pub use delete::delete_wallet_endpoint;
pub use domain::{Wallet, WalletBalance, WalletId, WalletName};
pub use list::get_wallets_page;
