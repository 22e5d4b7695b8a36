//! Day-window timeline geometry
//!
//! Pure time-to-geometry math: parsing the backend's timestamp strings,
//! bucketing courses into a calendar day, and mapping wall-clock instants
//! onto a [0, 1] span of the 24-hour axis. Pixel conversion happens at
//! paint time against the live axis rect.

use crate::constants::{TICK_COUNT, TZ_OFFSET_HOURS};
use crate::types::Course;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// The fixed UTC+8 offset course times are expressed in.
pub fn tz_offset() -> FixedOffset {
    FixedOffset::east_opt(TZ_OFFSET_HOURS * 3600).unwrap()
}

/// Current wall-clock time in the fixed UTC+8 offset, independent of the
/// host timezone.
pub fn local_now() -> NaiveDateTime {
    Utc::now().with_timezone(&tz_offset()).naive_local()
}

pub fn local_today() -> NaiveDate {
    local_now().date()
}

/// Parse one of the backend's date-time strings. The API emits both `-`
/// and `/` date separators, sometimes with a `T`, sometimes without
/// seconds; everything normalizes to one form before parsing. Absent,
/// empty, or unparseable input yields `None`.
pub fn parse_timestamp(raw: Option<&str>) -> Option<NaiveDateTime> {
    let s = raw?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace('/', "-");
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&s, fmt).ok())
}

/// The `[00:00:00, 23:59:59]` interval of one calendar date.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DayWindow {
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            start: date.and_time(NaiveTime::MIN),
            end: date.and_hms_opt(23, 59, 59).unwrap(),
        }
    }

    /// Inclusive on both ends.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        t >= self.start && t <= self.end
    }

    fn total_secs(&self) -> f32 {
        (self.end - self.start).num_seconds() as f32
    }

    /// Linear map of `t` onto `[0, 1]` over the window, clamped.
    pub fn fraction(&self, t: NaiveDateTime) -> f32 {
        let elapsed = (t - self.start).num_seconds() as f32;
        (elapsed / self.total_secs()).clamp(0.0, 1.0)
    }
}

/// Horizontal extent of one attendance window on the axis, as fractions
/// of the day span. Keeps the clipped bounds for the tooltip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarSpan {
    pub left: f32,
    pub width: f32,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl BarSpan {
    /// Clip `[start, end]` to the window, then compute axis fractions.
    /// `None` when either timestamp is missing or invalid, or when the
    /// interval has no overlap with the window.
    pub fn clipped(start: Option<&str>, end: Option<&str>, window: &DayWindow) -> Option<Self> {
        let mut start = parse_timestamp(start)?;
        let mut end = parse_timestamp(end)?;
        if start < window.start {
            start = window.start;
        }
        if end > window.end {
            end = window.end;
        }
        if end < start {
            return None;
        }
        let left = window.fraction(start);
        Some(Self {
            left,
            width: window.fraction(end) - left,
            start,
            end,
        })
    }
}

/// A course belongs on a day iff at least one of its four window
/// timestamps falls inside that day, bounds inclusive.
pub fn course_on_day(course: &Course, window: &DayWindow) -> bool {
    course
        .timestamps()
        .into_iter()
        .filter_map(parse_timestamp)
        .any(|t| window.contains(t))
}

/// Fractional axis position of hour tick `i`, for `i` in `0..TICK_COUNT`.
pub fn tick_fraction(i: usize) -> f32 {
    i as f32 / (TICK_COUNT - 1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dt(date_str: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn course(times: [Option<&str>; 4]) -> Course {
        Course {
            id: 1,
            title: "Course".into(),
            sign_in_start_time: times[0].map(String::from),
            sign_in_end_time: times[1].map(String::from),
            sign_out_start_time: times[2].map(String::from),
            sign_out_end_time: times[3].map(String::from),
        }
    }

    #[test]
    fn test_tick_positions_even_over_axis() {
        assert_eq!(TICK_COUNT, 25);
        assert_eq!(tick_fraction(0), 0.0);
        assert_eq!(tick_fraction(24), 1.0);
        assert!((tick_fraction(6) - 0.25).abs() < f32::EPSILON);
        assert!((tick_fraction(12) - 0.5).abs() < f32::EPSILON);
        for i in 1..TICK_COUNT {
            let step = tick_fraction(i) - tick_fraction(i - 1);
            assert!((step - 1.0 / 24.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_parse_timestamp_accepts_both_separators() {
        let expected = dt("2024-03-01 08:00:00");
        assert_eq!(parse_timestamp(Some("2024-03-01 08:00:00")), Some(expected));
        assert_eq!(parse_timestamp(Some("2024/03/01 08:00:00")), Some(expected));
        assert_eq!(parse_timestamp(Some("2024-03-01T08:00:00")), Some(expected));
        assert_eq!(parse_timestamp(Some("2024-03-01 08:00")), Some(expected));
    }

    #[test]
    fn test_parse_timestamp_rejects_malformed() {
        assert_eq!(parse_timestamp(None), None);
        assert_eq!(parse_timestamp(Some("")), None);
        assert_eq!(parse_timestamp(Some("   ")), None);
        assert_eq!(parse_timestamp(Some("not a date")), None);
        assert_eq!(parse_timestamp(Some("2024-13-01 08:00:00")), None);
        assert_eq!(parse_timestamp(Some("08:00:00")), None);
    }

    #[test]
    fn test_day_window_bounds() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        assert_eq!(w.start, dt("2024-03-01 00:00:00"));
        assert_eq!(w.end, dt("2024-03-01 23:59:59"));
        assert_eq!((w.end - w.start).num_seconds(), 86_399);
    }

    #[test]
    fn test_day_window_contains_is_inclusive() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        assert!(w.contains(w.start));
        assert!(w.contains(w.end));
        assert!(w.contains(dt("2024-03-01 12:30:00")));
        assert!(!w.contains(dt("2024-02-29 23:59:59")));
        assert!(!w.contains(dt("2024-03-02 00:00:00")));
    }

    #[test]
    fn test_fraction_maps_hours_linearly() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        // 09:00 on an 86399s window sits at ~9/24 of the axis.
        let left = w.fraction(dt("2024-03-01 09:00:00"));
        assert!((left - 0.375).abs() < 1e-3);
        let width = w.fraction(dt("2024-03-01 10:00:00")) - left;
        assert!((width - 1.0 / 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_fraction_clamps_outside_window() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        assert_eq!(w.fraction(dt("2024-02-28 12:00:00")), 0.0);
        assert_eq!(w.fraction(dt("2024-03-05 12:00:00")), 1.0);
    }

    #[test]
    fn test_bar_span_nine_to_ten() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        let bar = BarSpan::clipped(
            Some("2024-03-01 09:00:00"),
            Some("2024-03-01 10:00:00"),
            &w,
        )
        .unwrap();
        assert!((bar.left - 0.375).abs() < 1e-3);
        assert!((bar.width - 0.0417).abs() < 1e-3);
        assert_eq!(bar.start, dt("2024-03-01 09:00:00"));
        assert_eq!(bar.end, dt("2024-03-01 10:00:00"));
    }

    #[test]
    fn test_bar_span_clips_to_window() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        // Overnight window: starts the previous evening, ends mid-morning.
        let bar = BarSpan::clipped(
            Some("2024-02-29 22:00:00"),
            Some("2024-03-01 02:00:00"),
            &w,
        )
        .unwrap();
        assert_eq!(bar.left, 0.0);
        assert_eq!(bar.start, w.start);
        assert!((bar.width - 2.0 / 24.0).abs() < 1e-3);

        // Runs past midnight: end truncates to 23:59:59.
        let bar = BarSpan::clipped(
            Some("2024-03-01 23:00:00"),
            Some("2024-03-02 01:00:00"),
            &w,
        )
        .unwrap();
        assert_eq!(bar.end, w.end);
        assert!((bar.left + bar.width - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_bar_span_outside_window_is_dropped() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        assert_eq!(
            BarSpan::clipped(
                Some("2024-03-02 09:00:00"),
                Some("2024-03-02 10:00:00"),
                &w
            ),
            None
        );
        assert_eq!(
            BarSpan::clipped(
                Some("2024-02-28 09:00:00"),
                Some("2024-02-28 10:00:00"),
                &w
            ),
            None
        );
    }

    #[test]
    fn test_bar_span_requires_both_timestamps() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        assert_eq!(
            BarSpan::clipped(Some("2024-03-01 09:00:00"), None, &w),
            None
        );
        assert_eq!(
            BarSpan::clipped(None, Some("2024-03-01 10:00:00"), &w),
            None
        );
        assert_eq!(
            BarSpan::clipped(Some("garbage"), Some("2024-03-01 10:00:00"), &w),
            None
        );
    }

    #[test]
    fn test_course_on_day_needs_one_timestamp_inside() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        // Only the sign-out end lands on the day.
        let c = course([
            Some("2024-02-28 08:00:00"),
            Some("2024-02-28 08:15:00"),
            Some("2024-02-28 17:00:00"),
            Some("2024-03-01 00:00:00"),
        ]);
        assert!(course_on_day(&c, &w));

        let c = course([
            Some("2024-02-28 08:00:00"),
            Some("2024-02-28 08:15:00"),
            None,
            None,
        ]);
        assert!(!course_on_day(&c, &w));
    }

    #[test]
    fn test_course_on_day_ignores_malformed_fields() {
        let w = DayWindow::for_date(date(2024, 3, 1));
        let c = course([Some("bogus"), Some(""), None, Some("2024-03-01 10:00:00")]);
        assert!(course_on_day(&c, &w));

        let c = course([Some("bogus"), Some(""), None, None]);
        assert!(!course_on_day(&c, &w));
    }

    #[test]
    fn test_local_now_is_utc_plus_eight() {
        let utc = Utc::now().naive_utc();
        let local = local_now();
        let diff = (local - utc).num_seconds();
        assert!((diff - i64::from(TZ_OFFSET_HOURS) * 3600).abs() <= 1);
    }
}
