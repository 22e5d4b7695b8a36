//! Application constants and configuration

use std::time::Duration;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default origin of the course backend; overridable in settings.
pub const DEFAULT_API_BASE: &str = "https://qcbldekt.bit.edu.cn";

/// Fixed query of the course list endpoint. The backend pages, but one
/// page of 60 covers a full day of courses.
pub const COURSE_LIST_QUERY: &str =
    "/api/course/list?page=1&limit=60&transcript_index_id=0&transcript_index_type_id=";

/// How often the course list is re-fetched while the app is open.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Hour ticks along the axis: 00:00 through 24:00 inclusive.
pub const TICK_COUNT: usize = 25;

/// Course times are Beijing wall-clock, regardless of host timezone.
pub const TZ_OFFSET_HOURS: i32 = 8;
