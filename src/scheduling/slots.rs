//! Slot-window generation over a working interval

use chrono::{NaiveTime, Timelike};

/// A half-open [start, end) window within a single day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// Half-open overlap test: [a, b) and [c, d) overlap iff a < d and c < b
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && other.start < self.end
    }
}

fn minute_of_day(t: NaiveTime) -> u32 {
    t.num_seconds_from_midnight() / 60
}

fn time_at_minute(m: u32) -> NaiveTime {
    // m stays strictly below 1440 for any window carved out of a same-day
    // interval, so this cannot fail
    NaiveTime::from_num_seconds_from_midnight_opt(m * 60, 0).unwrap()
}

/// Carve back-to-back slot windows of `duration_minutes` out of
/// [`start`, `end`).
///
/// Windows are contiguous and non-overlapping. When the interval length is
/// not an exact multiple of the duration, the trailing partial remainder is
/// dropped rather than emitted as a short slot. An inverted or empty
/// interval, or a non-positive duration, yields no windows.
pub fn slot_windows(start: NaiveTime, end: NaiveTime, duration_minutes: i32) -> Vec<TimeRange> {
    if duration_minutes <= 0 || start >= end {
        return Vec::new();
    }
    let duration = duration_minutes as u32;
    let end_min = minute_of_day(end);

    let mut windows = Vec::new();
    let mut cursor = minute_of_day(start);
    while cursor + duration <= end_min {
        windows.push(TimeRange::new(
            time_at_minute(cursor),
            time_at_minute(cursor + duration),
        ));
        cursor += duration;
    }
    windows
}

/// Drop every candidate window that overlaps any busy range.
pub fn subtract_busy(candidates: Vec<TimeRange>, busy: &[TimeRange]) -> Vec<TimeRange> {
    candidates
        .into_iter()
        .filter(|w| !busy.iter().any(|b| w.overlaps(b)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn one_hour_interval_thirty_minute_service_yields_two_slots() {
        let windows = slot_windows(t(9, 0), t(10, 0), 30);
        assert_eq!(
            windows,
            vec![
                TimeRange::new(t(9, 0), t(9, 30)),
                TimeRange::new(t(9, 30), t(10, 0)),
            ]
        );
    }

    #[test]
    fn produces_floor_of_length_over_duration_slots() {
        // 9:00-17:00 is 480 minutes; 45-minute service fits 10 times with
        // a 30-minute remainder that must not surface as a partial slot
        let windows = slot_windows(t(9, 0), t(17, 0), 45);
        assert_eq!(windows.len(), 480 / 45);
        for w in &windows {
            assert_eq!(
                minute_of_day(w.end) - minute_of_day(w.start),
                45,
                "every slot has the full service duration"
            );
        }
        assert!(windows.last().unwrap().end <= t(17, 0));
    }

    #[test]
    fn windows_are_contiguous_and_non_overlapping() {
        let windows = slot_windows(t(10, 0), t(13, 0), 40);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert!(!pair[0].overlaps(&pair[1]));
        }
    }

    #[test]
    fn interval_shorter_than_duration_yields_nothing() {
        assert!(slot_windows(t(9, 0), t(9, 20), 30).is_empty());
    }

    #[test]
    fn inverted_or_empty_interval_yields_nothing() {
        assert!(slot_windows(t(10, 0), t(9, 0), 30).is_empty());
        assert!(slot_windows(t(9, 0), t(9, 0), 30).is_empty());
    }

    #[test]
    fn non_positive_duration_yields_nothing() {
        assert!(slot_windows(t(9, 0), t(12, 0), 0).is_empty());
        assert!(slot_windows(t(9, 0), t(12, 0), -15).is_empty());
    }

    #[test]
    fn adjacent_ranges_do_not_overlap() {
        let a = TimeRange::new(t(9, 0), t(9, 30));
        let b = TimeRange::new(t(9, 30), t(10, 0));
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn subtract_busy_removes_any_overlap() {
        let candidates = slot_windows(t(9, 0), t(11, 0), 30);
        // 9:45-10:15 straddles the 9:30 and 10:00 slots
        let busy = [TimeRange::new(t(9, 45), t(10, 15))];
        let free = subtract_busy(candidates, &busy);
        assert_eq!(
            free,
            vec![
                TimeRange::new(t(9, 0), t(9, 30)),
                TimeRange::new(t(10, 30), t(11, 0)),
            ]
        );
    }

    #[test]
    fn subtract_busy_with_no_busy_ranges_is_identity() {
        let candidates = slot_windows(t(9, 0), t(11, 0), 30);
        assert_eq!(subtract_busy(candidates.clone(), &[]), candidates);
    }
}
