//! Request/response body logging with password redaction.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The maximum number of characters of a request or response body to log at
/// the INFO level. The full body is still logged at DEBUG.
const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Middleware that logs request and response bodies.
///
/// Password fields in urlencoded form submissions are redacted before
/// logging.
pub async fn logging_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();
    let bytes = buffer_and_log("request", body).await?;
    let request = Request::from_parts(parts, Body::from(bytes));

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = buffer_and_log("response", body).await?;
    let response = Response::from_parts(parts, Body::from(bytes)).into_response();

    Ok(response)
}

async fn buffer_and_log(direction: &str, body: Body) -> Result<Bytes, StatusCode> {
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("failed to read {direction} body: {error}");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    if let Ok(body) = std::str::from_utf8(&bytes) {
        let body = redact_password(body, "password");
        let body = redact_password(&body, "confirm_password");

        if body.len() > LOG_BODY_LENGTH_LIMIT {
            tracing::info!(
                "{direction} body = {:?}... ({} characters truncated)",
                &body[..LOG_BODY_LENGTH_LIMIT],
                body.len() - LOG_BODY_LENGTH_LIMIT
            );
            tracing::debug!("{direction} body = {body:?}");
        } else if !body.is_empty() {
            tracing::info!("{direction} body = {body:?}");
        }
    }

    Ok(bytes)
}

/// Replace the value of `field` in a urlencoded form `body` with asterisks.
fn redact_password(body: &str, field: &str) -> String {
    let pattern = format!("{field}=");

    let Some(start) = body.find(&pattern) else {
        return body.to_owned();
    };

    let value_start = start + pattern.len();
    let value_end = body[value_start..]
        .find('&')
        .map(|offset| value_start + offset)
        .unwrap_or(body.len());

    format!("{}********{}", &body[..value_start], &body[value_end..])
}
