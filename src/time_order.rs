//! Optional chronological ordering of an upload.
//!
//! Uploads are normally taken to be in time order already. Sorting changes
//! which rows are neighbours and therefore every distance, so it is opt-in.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};
use crate::observation::Observation;

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// How a time value was written. Forms can't be compared with each other:
/// a zoned time is normalised to UTC, a local one is taken as written and a
/// bare clock time has no date at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeForm {
    Zoned,
    Local,
    ClockOnly,
}

pub fn parse_time(value: &str) -> Option<(TimeForm, NaiveDateTime)> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some((TimeForm::Zoned, dt.naive_utc()));
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some((TimeForm::Local, dt));
        }
    }
    // Logger clock only, no date.
    let time = NaiveTime::parse_from_str(value, "%H:%M:%S").ok()?;
    Some((TimeForm::ClockOnly, NaiveDate::default().and_time(time)))
}

/// Stable sort by `time`; rows with equal times keep their upload order.
///
/// Every row must use the same form as the first one.
pub fn sort_by_time(observations: Vec<Observation>) -> Result<Vec<Observation>> {
    let mut expected: Option<TimeForm> = None;
    let mut keyed = Vec::with_capacity(observations.len());

    for (idx, obs) in observations.into_iter().enumerate() {
        let row = idx + 1;
        let (form, key) = parse_time(&obs.time).ok_or_else(|| Error::UnparseableTime {
            row,
            value: obs.time.clone(),
        })?;
        match expected {
            None => expected = Some(form),
            Some(first) if first != form => {
                return Err(Error::MixedTimeForms {
                    row,
                    value: obs.time.clone(),
                })
            }
            Some(_) => {}
        }
        keyed.push((key, obs));
    }

    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, obs)| obs).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::fix;

    #[test]
    fn test_parses_supported_formats() {
        let form = |v: &str| parse_time(v).map(|(f, _)| f);
        assert_eq!(form("2021-03-04T10:00:00Z"), Some(TimeForm::Zoned));
        assert_eq!(form("2021-03-04T10:00:00+02:00"), Some(TimeForm::Zoned));
        assert_eq!(form("2021-03-04 10:00:00"), Some(TimeForm::Local));
        assert_eq!(form("2021-03-04 10:00:00.250"), Some(TimeForm::Local));
        assert_eq!(form("10:00:00"), Some(TimeForm::ClockOnly));
        assert_eq!(form("yesterday"), None);
    }

    #[test]
    fn test_sorts_and_keeps_ties_stable() {
        let rows = vec![
            fix("10:00:05", 1.0, 1.0, 5, 1),
            fix("10:00:01", 2.0, 2.0, 5, 1),
            fix("10:00:05", 3.0, 3.0, 5, 1),
        ];
        let sorted = sort_by_time(rows).unwrap();
        let lats: Vec<f64> = sorted.iter().map(|o| o.latitude).collect();
        assert_eq!(lats, vec![2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_unparseable_time_names_the_row() {
        let rows = vec![fix("10:00:00", 1.0, 1.0, 5, 1), fix("soon", 2.0, 2.0, 5, 1)];
        match sort_by_time(rows) {
            Err(Error::UnparseableTime { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "soon");
            }
            other => panic!("expected time error, got {:?}", other),
        }
    }

    #[test]
    fn test_zoned_and_local_times_are_not_mixed() {
        // 10:30+02:00 is 08:30 UTC, which a naive 09:00 would wrongly follow
        let rows = vec![
            fix("2021-03-04T10:30:00+02:00", 1.0, 1.0, 5, 1),
            fix("2021-03-04 09:00:00", 2.0, 2.0, 5, 1),
        ];
        match sort_by_time(rows) {
            Err(Error::MixedTimeForms { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "2021-03-04 09:00:00");
            }
            other => panic!("expected mixed time forms, got {:?}", other),
        }
    }

    #[test]
    fn test_clock_only_and_dated_times_are_not_mixed() {
        let rows = vec![fix("09:00:00", 1.0, 1.0, 5, 1), fix("2021-03-04 08:00:00", 2.0, 2.0, 5, 1)];
        assert!(matches!(sort_by_time(rows), Err(Error::MixedTimeForms { row: 2, .. })));
    }

    #[test]
    fn test_zoned_times_sort_in_utc() {
        let rows = vec![
            fix("2021-03-04T10:30:00+02:00", 1.0, 1.0, 5, 1),
            fix("2021-03-04T09:00:00Z", 2.0, 2.0, 5, 1),
        ];
        let sorted = sort_by_time(rows).unwrap();
        assert_eq!(sorted[0].latitude, 1.0);
    }
}
