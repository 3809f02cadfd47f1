//! The forgot password page.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{base, link, log_in_register},
};

/// Display instructions for resetting the password.
///
/// There is no email recovery, resetting is done with the `reset_password`
/// binary on the server.
pub async fn get_forgot_password_page() -> Markup {
    let content = html! {
        div class="space-y-4 text-gray-900 dark:text-white"
        {
            p
            {
                "To reset your password, run the following command on the \
                machine hosting the server:"
            }

            pre class="p-2 rounded bg-gray-100 dark:bg-gray-700 overflow-x-auto"
            {
                code { "reset_password --db-path <path to database file>" }
            }

            p
            {
                "Once the password has been reset, you can "
                (link(endpoints::LOG_IN_VIEW, "log in"))
                " with the new password."
            }
        }
    };

    base(
        "Forgot Password",
        &[],
        &log_in_register("Reset your password", &content),
    )
}
