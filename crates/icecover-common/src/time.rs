//! Time handling for satellite acquisitions.

use chrono::{DateTime, Datelike, Utc};

/// Day of year (1-366) of an acquisition time.
pub fn day_of_year(time: &DateTime<Utc>) -> u32 {
    time.ordinal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_of_year() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(day_of_year(&t), 61); // leap year
        let t = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(day_of_year(&t), 365);
    }
}
