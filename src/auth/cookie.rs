//! Reading and writing the auth cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Expiration, SameSite},
};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::{Error, auth::token::Token, auth::user::UserID};

/// The name of the cookie holding the auth token.
pub const COOKIE_TOKEN: &str = "token";

/// How long the auth cookie stays valid without a "remember me" log-in.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(5);

/// Parse the auth token from the cookie jar.
///
/// # Errors
/// Returns [Error::CookieMissing] if there is no auth cookie, or
/// [Error::JsonSerializationError] if the cookie contents could not be
/// parsed.
pub fn get_token_from_cookies(jar: &PrivateCookieJar) -> Result<Token, Error> {
    let cookie = jar.get(COOKIE_TOKEN).ok_or(Error::CookieMissing)?;

    serde_json::from_str(cookie.value())
        .map_err(|error| Error::JsonSerializationError(error.to_string()))
}

/// Create the auth cookie for `user_id`, expiring after `duration`.
///
/// # Errors
/// Returns [Error::JsonSerializationError] if the token could not be
/// serialized.
pub fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = Token::new(user_id, duration, local_offset);

    build_auth_cookie(jar, &token)
}

/// Renew the auth cookie if it expires within `duration`.
///
/// Returns the jar unchanged when the cookie still has more than `duration`
/// left, so the response does not set a cookie on every request.
///
/// # Errors
/// Returns an error if the cookie is missing or could not be (de)serialized.
pub fn extend_auth_cookie_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
    local_offset: UtcOffset,
) -> Result<PrivateCookieJar, Error> {
    let token = get_token_from_cookies(&jar)?;

    let now = OffsetDateTime::now_utc().to_offset(local_offset);

    if token.expires_at - now > duration {
        return Ok(jar);
    }

    let token = Token::new(token.user_id, duration, local_offset);

    build_auth_cookie(jar, &token)
}

fn build_auth_cookie(jar: PrivateCookieJar, token: &Token) -> Result<PrivateCookieJar, Error> {
    let value = serde_json::to_string(token)
        .map_err(|error| Error::JsonSerializationError(error.to_string()))?;

    let cookie = Cookie::build((COOKIE_TOKEN, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .expires(Expiration::DateTime(token.expires_at));

    Ok(jar.add(cookie))
}

/// Expire the auth cookie, logging the user out.
pub fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let cookie = Cookie::build((COOKIE_TOKEN, "deleted"))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .expires(Expiration::DateTime(OffsetDateTime::UNIX_EPOCH));

    jar.add(cookie)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use time::{Duration, OffsetDateTime, UtcOffset};

    use crate::auth::{token::Token, user::UserID};

    use super::{
        COOKIE_TOKEN, extend_auth_cookie_duration_if_needed, get_token_from_cookies,
        invalidate_auth_cookie, set_auth_cookie,
    };

    fn empty_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::generate())
    }

    #[test]
    fn set_then_get_round_trips_token() {
        let jar = empty_jar();

        let jar = set_auth_cookie(jar, UserID::new(42), Duration::minutes(5), UtcOffset::UTC)
            .unwrap();

        let token = get_token_from_cookies(&jar).unwrap();
        assert_eq!(token.user_id, UserID::new(42));
        assert!(!token.is_expired(UtcOffset::UTC));
    }

    #[test]
    fn get_token_without_cookie_is_an_error() {
        let jar = empty_jar();

        assert!(get_token_from_cookies(&jar).is_err());
    }

    #[test]
    fn extend_renews_cookie_close_to_expiry() {
        let jar = empty_jar();
        let jar = set_auth_cookie(jar, UserID::new(1), Duration::minutes(1), UtcOffset::UTC)
            .unwrap();
        let old_expiry = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), UtcOffset::UTC)
                .unwrap();

        let new_expiry = get_token_from_cookies(&jar).unwrap().expires_at;
        assert!(new_expiry > old_expiry);
    }

    #[test]
    fn extend_leaves_long_lived_cookie_alone() {
        let jar = empty_jar();
        let jar = set_auth_cookie(jar, UserID::new(1), Duration::days(7), UtcOffset::UTC)
            .unwrap();
        let old_expiry = get_token_from_cookies(&jar).unwrap().expires_at;

        let jar =
            extend_auth_cookie_duration_if_needed(jar, Duration::minutes(5), UtcOffset::UTC)
                .unwrap();

        let new_expiry = get_token_from_cookies(&jar).unwrap().expires_at;
        assert_eq!(new_expiry, old_expiry);
    }

    #[test]
    fn invalidate_expires_cookie() {
        let jar = empty_jar();
        let jar = set_auth_cookie(jar, UserID::new(1), Duration::minutes(5), UtcOffset::UTC)
            .unwrap();

        let jar = invalidate_auth_cookie(jar);

        let cookie = jar.get(COOKIE_TOKEN).unwrap();
        assert_eq!(cookie.value(), "deleted");
        assert_eq!(
            cookie.expires_datetime(),
            Some(OffsetDateTime::UNIX_EPOCH)
        );
    }

    #[test]
    fn garbage_cookie_value_is_an_error() {
        let jar = empty_jar();
        let jar = jar.add(
            axum_extra::extract::cookie::Cookie::new(COOKIE_TOKEN, "not json"),
        );

        let result = get_token_from_cookies(&jar);

        assert!(matches!(
            result,
            Err(crate::Error::JsonSerializationError(_))
        ));
    }

    #[test]
    fn expired_token_reports_expired() {
        let token = Token {
            user_id: UserID::new(1),
            expires_at: OffsetDateTime::now_utc() - Duration::seconds(1),
        };

        assert!(token.is_expired(UtcOffset::UTC));
    }
}
