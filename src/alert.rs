//! Alert partials swapped into the fixed alert container via htmx.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

const SUCCESS_CONTAINER_STYLE: &str = "w-full rounded border border-green-300 \
    bg-green-50 px-4 py-3 text-green-800 shadow-lg dark:border-green-800 \
    dark:bg-green-950 dark:text-green-200";

const ERROR_CONTAINER_STYLE: &str = "w-full rounded border border-red-300 \
    bg-red-50 px-4 py-3 text-red-800 shadow-lg dark:border-red-800 \
    dark:bg-red-950 dark:text-red-200";

/// A status message displayed in the fixed alert container at the bottom of
/// the page.
///
/// Alerts are rendered as out-of-band swaps targeting `#alert-container`, the
/// empty div that [crate::html::base] places in every page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// A success message without further details.
    SuccessSimple {
        /// The message to show the user.
        message: String,
    },
    /// A success message with a second line of details.
    Success {
        /// The message to show the user.
        message: String,
        /// Extra context shown below the message.
        details: String,
    },
    /// An error message without further details.
    ErrorSimple {
        /// The message to show the user.
        message: String,
    },
    /// An error message with a second line of details.
    Error {
        /// The message to show the user.
        message: String,
        /// Extra context shown below the message.
        details: String,
    },
}

impl Alert {
    /// Render the alert as a replacement for the alert container.
    pub fn into_html(self) -> Markup {
        let (style, message, details) = match self {
            Alert::SuccessSimple { message } => (SUCCESS_CONTAINER_STYLE, message, None),
            Alert::Success { message, details } => {
                (SUCCESS_CONTAINER_STYLE, message, Some(details))
            }
            Alert::ErrorSimple { message } => (ERROR_CONTAINER_STYLE, message, None),
            Alert::Error { message, details } => (ERROR_CONTAINER_STYLE, message, Some(details)),
        };

        html! {
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(style)
                {
                    p class="text-sm font-medium" { (message) }

                    @if let Some(details) = details {
                        p class="mt-1 text-sm opacity-80" { (details) }
                    }
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_html().into_response()
    }
}

#[cfg(test)]
mod alert_tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn renders_message_and_details() {
        let alert = Alert::Success {
            message: "Import completed successfully!".to_owned(),
            details: "Imported 3 transactions.".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().into_string());

        let container = Selector::parse("#alert-container").unwrap();
        assert!(html.select(&container).next().is_some());

        let message = Selector::parse("p.text-sm.font-medium").unwrap();
        let message_text = html
            .select(&message)
            .next()
            .expect("alert message missing")
            .text()
            .collect::<String>();
        assert_eq!(message_text.trim(), "Import completed successfully!");

        let details = Selector::parse("p.mt-1.text-sm.opacity-80").unwrap();
        let details_text = html
            .select(&details)
            .next()
            .expect("alert details missing")
            .text()
            .collect::<String>();
        assert_eq!(details_text.trim(), "Imported 3 transactions.");
    }

    #[test]
    fn simple_alert_has_no_details_paragraph() {
        let alert = Alert::ErrorSimple {
            message: "File type must be OFX.".to_owned(),
        };

        let html = Html::parse_fragment(&alert.into_html().into_string());

        let details = Selector::parse("p.mt-1.text-sm.opacity-80").unwrap();
        assert!(html.select(&details).next().is_none());
    }
}
