//! Helpers for parsing and checking HTML in tests.

use axum::response::Response;
use scraper::Html;

/// Read an axum response body and parse it as a full HTML document.
pub async fn parse_html_document(response: Response) -> Html {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("could not read response body");
    let text = std::str::from_utf8(&body).expect("response body is not valid UTF-8");

    Html::parse_document(text)
}

/// Parse text as a full HTML document.
pub fn parse_document_text(text: &str) -> Html {
    Html::parse_document(text)
}

/// Parse text as an HTML fragment, for example a form returned by an htmx
/// endpoint.
pub fn parse_html_fragment(text: &str) -> Html {
    Html::parse_fragment(text)
}

/// Assert that the parser found no errors in the HTML.
#[track_caller]
pub fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "HTML contains errors: {:?}",
        html.errors
    );
}
