//! User authentication: passwords, the auth cookie, and route guards.

mod cookie;
mod forgot_password;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod register_user;
mod token;
mod user;

pub use cookie::{
    COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie,
};
pub use forgot_password::get_forgot_password_page;
pub use log_in::{LogInData, get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use register_user::{RegisterForm, create_user_endpoint, get_register_page};
pub use user::{User, UserID, count_users, create_user, create_user_table, get_user_by_id};
