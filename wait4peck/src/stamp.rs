//! Formatting of the detection timestamp.

use chrono::{DateTime, Local};

/// Render a detection time as `YYYY-MM-DD HH:MM:SS.` followed by the
/// microsecond component as a bare integer.
///
/// The fractional field carries no width and no leading zeros; the framework
/// that execs us parses the line with `%Y-%m-%d %H:%M:%S.%f`, which accepts
/// the unpadded form, and the literal format is kept as-is for any other
/// consumer of the old tool's output.
pub fn peck_line(stamp: &DateTime<Local>) -> String {
    format!(
        "{}{}",
        stamp.format("%Y-%m-%d %H:%M:%S."),
        stamp.timestamp_subsec_micros()
    )
}
