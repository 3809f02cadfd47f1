//! Recurring expenses such as streaming services and utilities.

mod create;
mod db;
mod delete;
mod list;
mod toggle;

pub use create::create_subscription_endpoint;
pub use db::{
    Subscription, SubscriptionId, create_subscription, create_subscription_table,
    delete_subscription, get_subscriptions, toggle_subscription,
};
pub use delete::delete_subscription_endpoint;
pub use list::get_subscriptions_page;
pub use toggle::toggle_subscription_endpoint;
