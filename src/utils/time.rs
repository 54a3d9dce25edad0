use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// First day of the month `dt` falls in.
pub fn month_of(dt: DateTime<Utc>) -> NaiveDate {
    NaiveDate::from_ymd_opt(dt.year(), dt.month(), 1).expect("valid year/month")
}

/// Start of the month as an instant (UTC midnight of day 1).
pub fn month_start(month: NaiveDate) -> DateTime<Utc> {
    let first = month.with_day(1).expect("day 1 always valid");
    Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0).expect("midnight"))
}

/// Start of the following month.
pub fn next_month_start(month: NaiveDate) -> DateTime<Utc> {
    month_start(month + Months::new(1))
}

/// Last representable instant of the month (timestamps carry microsecond
/// resolution). A timestamp exactly equal to this boundary is inside the
/// month.
pub fn month_end(month: NaiveDate) -> DateTime<Utc> {
    next_month_start(month) - Duration::microseconds(1)
}

/// `[start, next_month_start)` membership; the inclusive-boundary rule falls
/// out of the half-open interval because the last instant of a month is
/// strictly before the next month's start.
pub fn in_month(ts: DateTime<Utc>, month: NaiveDate) -> bool {
    ts >= month_start(month) && ts < next_month_start(month)
}

/// First-of-month sequence covering `from..=to` (both truncated to their
/// months). Empty when `from` is after `to`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
    let mut cur = from.with_day(1).expect("day 1 always valid");
    let last = to.with_day(1).expect("day 1 always valid");
    let mut out = Vec::new();
    while cur <= last {
        out.push(cur);
        cur = cur + Months::new(1);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn last_instant_of_month_is_in_month() {
        let march = month(2024, 3);
        assert!(in_month(month_end(march), march));
        assert!(!in_month(next_month_start(march), march));
    }

    #[test]
    fn month_sequence_is_inclusive_of_both_ends() {
        let months = months_between(
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 2).unwrap(),
        );
        assert_eq!(
            months,
            vec![month(2024, 1), month(2024, 2), month(2024, 3), month(2024, 4)]
        );
    }

    #[test]
    fn year_rollover() {
        assert_eq!(
            next_month_start(month(2023, 12)),
            month_start(month(2024, 1))
        );
    }
}
