use chrono::{Days, Months, NaiveDate, NaiveDateTime};

use crate::offset::FollowUpOffset;

/// Date-only formats tried first, then datetime formats with the time
/// part dropped. Covers the shapes seen in the daily exports.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Best-effort date parsing. Unparseable input is `None`, never an error;
/// an absent reference date propagates to an absent follow-up date.
pub fn parse_date_soft(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Compute the concrete follow-up date.
///
/// `NextMonth` advances by one calendar month with month-end clamping
/// (2024-01-31 → 2024-02-29), not a fixed day count.
pub fn follow_up_date(
    reference: Option<NaiveDate>,
    offset: Option<FollowUpOffset>,
) -> Option<NaiveDate> {
    let reference = reference?;
    match offset? {
        FollowUpOffset::Days(n) => reference.checked_add_days(Days::new(u64::from(n))),
        FollowUpOffset::NextMonth => reference.checked_add_months(Months::new(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_common_formats() {
        assert_eq!(parse_date_soft("2024-03-10"), Some(d(2024, 3, 10)));
        assert_eq!(parse_date_soft(" 2024-03-10 "), Some(d(2024, 3, 10)));
        assert_eq!(parse_date_soft("10/03/2024"), Some(d(2024, 3, 10)));
        assert_eq!(parse_date_soft("10-03-2024"), Some(d(2024, 3, 10)));
        assert_eq!(parse_date_soft("2024-03-10 08:15:00"), Some(d(2024, 3, 10)));
    }

    #[test]
    fn unparseable_is_absent() {
        assert_eq!(parse_date_soft(""), None);
        assert_eq!(parse_date_soft("not a date"), None);
        assert_eq!(parse_date_soft("2024-13-40"), None);
    }

    #[test]
    fn day_offsets() {
        assert_eq!(
            follow_up_date(Some(d(2024, 3, 10)), Some(FollowUpOffset::Days(2))),
            Some(d(2024, 3, 12))
        );
        // day arithmetic crosses month boundaries
        assert_eq!(
            follow_up_date(Some(d(2024, 3, 31)), Some(FollowUpOffset::Days(1))),
            Some(d(2024, 4, 1))
        );
    }

    #[test]
    fn next_month_clamps_to_month_end() {
        assert_eq!(
            follow_up_date(Some(d(2024, 1, 31)), Some(FollowUpOffset::NextMonth)),
            Some(d(2024, 2, 29))
        );
        assert_eq!(
            follow_up_date(Some(d(2023, 1, 31)), Some(FollowUpOffset::NextMonth)),
            Some(d(2023, 2, 28))
        );
        assert_eq!(
            follow_up_date(Some(d(2024, 3, 10)), Some(FollowUpOffset::NextMonth)),
            Some(d(2024, 4, 10))
        );
    }

    #[test]
    fn absent_inputs_give_absent_date() {
        assert_eq!(follow_up_date(None, Some(FollowUpOffset::Days(1))), None);
        assert_eq!(follow_up_date(Some(d(2024, 1, 1)), None), None);
        assert_eq!(follow_up_date(None, None), None);
    }
}
