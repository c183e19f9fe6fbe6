use chrono::{Days, NaiveDate};

/// Consecutive calendar days: `len` dates starting at `start`, one day apart.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange {
    next: NaiveDate,
    remaining: usize,
}

impl DateRange {
    /// `len` days starting at `start`.
    pub fn starting(start: NaiveDate, len: usize) -> DateRange {
        DateRange {
            next: start,
            remaining: len,
        }
    }

    /// `len` days whose last day is `end`.
    ///
    /// Ranges that would begin before the calendar minimum are shortened.
    pub fn ending(end: NaiveDate, len: usize) -> DateRange {
        let back = len.saturating_sub(1);
        match end.checked_sub_days(Days::new(back as u64)) {
            Some(start) => DateRange::starting(start, len),
            None => DateRange::starting(NaiveDate::MIN, (end - NaiveDate::MIN).num_days() as usize + 1),
        }
    }

    /// `len` days beginning the day after `last`.
    pub fn following(last: NaiveDate, len: usize) -> DateRange {
        match last.succ_opt() {
            Some(start) => DateRange::starting(start, len),
            None => DateRange::starting(last, 0),
        }
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        match current.succ_opt() {
            Some(next) => self.next = next,
            None => self.remaining = 0,
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::DateRange;
    use chrono::NaiveDate;

    #[test]
    fn test_ending_covers_window_through_end() {
        let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let dates: Vec<NaiveDate> = DateRange::ending(end, 90).collect();
        assert_eq!(dates.len(), 90);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(dates[89], end);
        assert!(dates.windows(2).all(|w| (w[1] - w[0]).num_days() == 1));
    }

    #[test]
    fn test_following_starts_next_day() {
        let last = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let dates: Vec<NaiveDate> = DateRange::following(last, 3).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
            ]
        );
    }

    #[test]
    fn test_date_range_empty() {
        let start = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        assert_eq!(DateRange::starting(start, 0).count(), 0);
        assert_eq!(DateRange::ending(start, 0).count(), 0);
    }

    #[test]
    fn test_date_range_stops_at_calendar_edge() {
        assert_eq!(DateRange::starting(NaiveDate::MAX, 5).count(), 1);
        assert_eq!(DateRange::following(NaiveDate::MAX, 5).count(), 0);
        let near_min = NaiveDate::MIN.succ_opt().unwrap();
        assert_eq!(DateRange::ending(near_min, 10).count(), 2);
    }
}
