//! Departure windows for each route segment.

use chrono::Duration;

use crate::domain::{DateRange, SearchWindow, Segment, StopoverSpec, end_of_day, start_of_day};

/// Admissible departure window for the segment after `previous`.
///
/// - No previous segment (segment 0), or a previous segment with no legs:
///   the whole user range, midnight of the first day to the end of the last.
/// - Previous segment ends at the stopover airport:
///   `[earliest + d days, latest + d days + 24h]`.
/// - Otherwise: `[earliest, latest + 24h]`.
pub fn compute_window(
    previous: Option<&Segment>,
    range: &DateRange,
    stopover: Option<&StopoverSpec>,
) -> SearchWindow {
    let full_range = SearchWindow::new(start_of_day(range.start()), end_of_day(range.end()));

    let Some(previous) = previous else {
        return full_range;
    };
    let Some(arrivals) = previous.arrivals() else {
        return full_range;
    };

    let shift = match stopover {
        Some(spec) if spec.is_at(previous.destination) => spec.offset(),
        _ => Duration::zero(),
    };

    SearchWindow::new(
        arrivals.earliest + shift,
        arrivals.latest + shift + Duration::hours(24),
    )
}
