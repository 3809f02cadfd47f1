//! Building and validating the redirect back to the page a user was on
//! before being sent to the log-in page.

use axum::extract::Request;
use serde::Serialize;

use crate::endpoints;

#[derive(Serialize)]
struct RedirectQuery<'a> {
    redirect_url: &'a str,
}

/// Build the URL for the log-in page with a `redirect_url` query parameter
/// pointing back at the page the user requested.
///
/// For htmx requests the current page comes from the `HX-Current-URL`
/// header, otherwise the request URI is used.
pub fn build_log_in_redirect_url(request: &Request) -> String {
    let redirect_url = request
        .headers()
        .get("HX-Current-URL")
        .and_then(|value| value.to_str().ok())
        .and_then(extract_path)
        .unwrap_or_else(|| request.uri().path().to_owned());

    if !is_safe_redirect_url(&redirect_url) {
        return endpoints::LOG_IN_VIEW.to_owned();
    }

    match serde_urlencoded::to_string(RedirectQuery {
        redirect_url: &redirect_url,
    }) {
        Ok(query) => format!("{}?{}", endpoints::LOG_IN_VIEW, query),
        Err(error) => {
            tracing::error!("could not encode redirect URL {redirect_url}: {error}");
            endpoints::LOG_IN_VIEW.to_owned()
        }
    }
}

/// Extract the path (and query) from an absolute URL.
fn extract_path(url: &str) -> Option<String> {
    url.parse::<axum::http::Uri>()
        .ok()
        .map(|uri| uri.path().to_owned())
}

/// Whether a redirect URL is safe to send the user to after logging in.
///
/// Only local paths are allowed. Protocol-relative URLs ("//evil.example")
/// and absolute URLs would let a crafted link bounce the user to another
/// site.
pub fn is_safe_redirect_url(url: &str) -> bool {
    url.starts_with('/')
        && !url.starts_with("//")
        && !url.contains("://")
        && url != endpoints::LOG_IN_VIEW
}
