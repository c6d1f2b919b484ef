use crate::error::SeedError;
use crate::random::SeededRandom;
use chrono::{DateTime, NaiveDate, Utc};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Seed for a UTC calendar day: a 31-multiplier rolling hash over the
/// `YYYY-MM-DD` string with 32-bit wraparound, folded to its absolute value.
pub fn daily_seed(date: NaiveDate) -> u32 {
    let key = date.format(DATE_FORMAT).to_string();
    let hash = key
        .chars()
        .fold(0i32, |hash, c| hash.wrapping_mul(31).wrapping_add(c as i32));
    hash.unsigned_abs()
}

/// Same as [`daily_seed`] for an instant; any time of day maps to its UTC date.
pub fn daily_seed_at(instant: DateTime<Utc>) -> u32 {
    daily_seed(instant.date_naive())
}

pub fn create_daily_random(date: NaiveDate) -> SeededRandom {
    SeededRandom::new(daily_seed(date))
}

/// Bypasses date derivation entirely.
pub fn create_seeded_random(seed: u32) -> SeededRandom {
    SeededRandom::new(seed)
}

/// Parses `YYYY-MM-DD` or an RFC 3339 timestamp (normalized to its UTC date).
/// Anything else is rejected rather than mapped to a default seed.
pub fn parse_date(input: &str) -> Result<NaiveDate, SeedError> {
    let s = input.trim();
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(d);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|_| SeedError::InvalidDate {
            input: input.to_string(),
        })
}

pub fn parse_daily_seed(input: &str) -> Result<u32, SeedError> {
    parse_date(input).map(daily_seed)
}

/// Explicit date argument wins; otherwise the UTC day of `now_utc`.
pub fn resolve_date(date_arg: Option<&str>, now_utc: DateTime<Utc>) -> Result<NaiveDate, SeedError> {
    match date_arg {
        Some(s) => parse_date(s),
        None => Ok(now_utc.date_naive()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn known_seed_values() {
        assert_eq!(daily_seed(ymd(2024, 1, 15)), 613_341_597);
        assert_eq!(daily_seed(ymd(2024, 1, 16)), 613_341_596);
    }

    #[test]
    fn adjacent_days_differ() {
        assert_ne!(daily_seed(ymd(2024, 1, 15)), daily_seed(ymd(2024, 1, 16)));
    }

    #[test]
    fn time_of_day_does_not_matter() {
        let morning = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        assert_eq!(daily_seed_at(morning), daily_seed_at(evening));
        assert_eq!(daily_seed_at(morning), daily_seed(ymd(2024, 1, 15)));
    }

    #[test]
    fn rfc3339_offsets_normalize_to_utc_day() {
        // 2024-01-16 01:30 at +09:00 is still 2024-01-15 in UTC.
        let d = parse_date("2024-01-16T01:30:00+09:00").unwrap();
        assert_eq!(d, ymd(2024, 1, 15));
    }

    #[test]
    fn rejects_invalid_dates() {
        for bad in ["invalid-date", "", "2024-13-01", "2024-02-30", "15/01/2024"] {
            assert_eq!(
                parse_daily_seed(bad),
                Err(SeedError::InvalidDate {
                    input: bad.to_string()
                }),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn daily_random_matches_seed_override() {
        let mut a = create_daily_random(ymd(2024, 1, 15));
        let mut b = create_seeded_random(613_341_597);
        for _ in 0..20 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    #[test]
    fn resolve_date_prefers_argument() {
        let now = Utc.with_ymd_and_hms(2026, 1, 5, 23, 59, 0).unwrap();
        assert_eq!(resolve_date(Some("2024-01-15"), now).unwrap(), ymd(2024, 1, 15));
        assert_eq!(resolve_date(None, now).unwrap(), ymd(2026, 1, 5));
        assert!(resolve_date(Some("nope"), now).is_err());
    }
}
