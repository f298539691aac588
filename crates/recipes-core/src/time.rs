//! Time helpers.

use time::OffsetDateTime;

/// Returns the current UTC time.
///
/// Publication timestamps are always taken through this helper so the
/// whole workspace agrees on the clock source.
pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_utc_is_utc() {
        assert_eq!(now_utc().offset(), time::UtcOffset::UTC);
    }
}
