//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/wallets/{wallet_id}', use
//! [format_endpoint].

/// The root route which redirects to the dashboard or log in page.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying the user's transactions for a month.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for creating a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for editing an existing transaction.
pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
/// The page for importing transactions from OFX statement files.
pub const IMPORT_VIEW: &str = "/transactions/import";
/// The page listing wallets and their derived balances.
pub const WALLETS_VIEW: &str = "/wallets";
/// The page listing spending categories.
pub const CATEGORIES_VIEW: &str = "/categories";
/// The page listing monthly budgets.
pub const BUDGETS_VIEW: &str = "/budgets";
/// The page listing savings goals.
pub const GOALS_VIEW: &str = "/goals";
/// The page listing recurring subscriptions.
pub const SUBSCRIPTIONS_VIEW: &str = "/subscriptions";
/// The route for getting the registration page.
pub const REGISTER_VIEW: &str = "/register";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The route for instructions for resetting the user's password.
pub const FORGOT_PASSWORD_VIEW: &str = "/forgot_password";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to access users.
pub const USERS: &str = "/api/users";
/// The route to create a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to update or delete a single transaction.
pub const TRANSACTION: &str = "/api/transactions/{transaction_id}";
/// The route to parse uploaded statement files and render the review table.
pub const IMPORT_PREVIEW: &str = "/api/import/preview";
/// The route to commit reviewed statement rows to the database.
pub const IMPORT: &str = "/api/import";
/// The route to create a wallet.
pub const POST_WALLET: &str = "/api/wallets";
/// The route to delete a wallet.
pub const DELETE_WALLET: &str = "/api/wallets/{wallet_id}";
/// The route to create a category.
pub const POST_CATEGORY: &str = "/api/categories";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/categories/{category_id}";
/// The route to create or replace a budget for a category.
pub const UPSERT_BUDGET: &str = "/api/budgets";
/// The route to delete a budget.
pub const DELETE_BUDGET: &str = "/api/budgets/{budget_id}";
/// The route to create a goal.
pub const POST_GOAL: &str = "/api/goals";
/// The route to add money to a goal.
pub const GOAL_DEPOSIT: &str = "/api/goals/{goal_id}/deposit";
/// The route to delete a goal.
pub const DELETE_GOAL: &str = "/api/goals/{goal_id}";
/// The route to create a subscription.
pub const POST_SUBSCRIPTION: &str = "/api/subscriptions";
/// The route to pause or resume a subscription.
pub const SUBSCRIPTION_TOGGLE: &str = "/api/subscriptions/{subscription_id}/toggle";
/// The route to delete a subscription.
pub const DELETE_SUBSCRIPTION: &str = "/api/subscriptions/{subscription_id}";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/api/wallets/{wallet_id}', '{wallet_id}'
/// is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
