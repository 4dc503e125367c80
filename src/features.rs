//! Calendar features derived from observation timestamps.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Calendar features derived from a subway observation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarFeatures {
    pub date: NaiveDate,
    pub hour: u32,
    pub day_of_week: &'static str,
}

impl CalendarFeatures {
    pub fn from_timestamp(ts: &NaiveDateTime) -> Self {
        CalendarFeatures {
            date: ts.date(),
            hour: ts.hour(),
            day_of_week: weekday_name(ts.weekday()),
        }
    }
}

/// Full English weekday name, independent of the process locale.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_features_for_monday_morning() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        let features = CalendarFeatures::from_timestamp(&ts);

        assert_eq!(features.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(features.hour, 8);
        assert_eq!(features.day_of_week, "Monday");
    }

    #[test]
    fn test_features_at_day_boundaries() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();

        let midnight = CalendarFeatures::from_timestamp(&date.and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(midnight.hour, 0);
        assert_eq!(midnight.day_of_week, "Saturday");

        let late = CalendarFeatures::from_timestamp(&date.and_hms_opt(23, 59, 59).unwrap());
        assert_eq!(late.hour, 23);
        assert_eq!(late.date, date);
    }

    #[test]
    fn test_weekday_names_cover_the_week() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let names: Vec<_> = start
            .iter_days()
            .take(7)
            .map(|d| weekday_name(d.weekday()))
            .collect();

        assert_eq!(
            names,
            vec!["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"]
        );
    }
}
