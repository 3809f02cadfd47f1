//! The wallet domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The ID of a wallet.
pub type WalletId = i64;

/// A wallet that transactions can belong to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// The wallet's ID.
    pub id: WalletId,
    /// The wallet's name.
    pub name: String,
}

/// A wallet along with its balance.
///
/// The balance is the sum of the wallet's income minus its expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletBalance {
    /// The wallet.
    pub wallet: Wallet,
    /// The wallet's balance in dollars.
    pub balance: f64,
    /// How many transactions belong to the wallet.
    pub transaction_count: usize,
}

/// A validated wallet name.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletName(String);

impl WalletName {
    /// Create a wallet name, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns [Error::EmptyWalletName] if the trimmed name is empty.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            return Err(Error::EmptyWalletName);
        }

        Ok(Self(name.to_owned()))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WalletName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
