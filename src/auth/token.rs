//! The auth token stored in the auth cookie.

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime, UtcOffset};

use crate::auth::user::UserID;

/// An expiring token identifying a logged-in user.
///
/// The token is serialized to JSON and stored in a single private
/// (encrypted and signed) cookie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The ID of the user the token belongs to.
    pub user_id: UserID,
    /// When the token stops being valid.
    #[serde(with = "datetime_format")]
    pub expires_at: OffsetDateTime,
}

impl Token {
    /// Create a token that expires after `duration`, using `local_offset` as
    /// the reference clock.
    pub fn new(user_id: UserID, duration: Duration, local_offset: UtcOffset) -> Self {
        Self {
            user_id,
            expires_at: OffsetDateTime::now_utc().to_offset(local_offset) + duration,
        }
    }

    /// Whether the token has expired as of now.
    pub fn is_expired(&self, local_offset: UtcOffset) -> bool {
        self.expires_at <= OffsetDateTime::now_utc().to_offset(local_offset)
    }
}

/// Serde format for `OffsetDateTime` with a fixed-width offset.
///
/// The default RFC 3339 parser rejects single digit offset hours, which the
/// default `Display` implementation produces around midnight. Using an
/// explicit format description avoids the mismatch.
mod datetime_format {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

    const FORMAT: &[FormatItem<'static>] = format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] \
        [offset_hour sign:mandatory]:[offset_minute]:[offset_second]"
    );

    pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = datetime
            .format(FORMAT)
            .map_err(serde::ser::Error::custom)?;

        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;

        OffsetDateTime::parse(&text, FORMAT).map_err(D::Error::custom)
    }
}
