//! Conversion from canonical timezone names to UTC offsets.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the UTC offset for a canonical timezone name such as
/// "Pacific/Auckland". Returns `None` if the name is not recognised.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|timezone| timezone.get_offset_utc(&OffsetDateTime::now_utc()))
        .map(|offset| offset.to_utc())
}

#[cfg(test)]
mod timezone_tests {
    use super::get_local_offset;

    #[test]
    fn returns_offset_for_canonical_name() {
        assert!(get_local_offset("Pacific/Auckland").is_some());
    }

    #[test]
    fn returns_none_for_unknown_name() {
        assert_eq!(get_local_offset("Middle/Earth"), None);
    }
}
