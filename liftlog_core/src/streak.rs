//! Consecutive-day streak transitions.

use crate::Streak;
use chrono::NaiveDate;

/// Advance a streak for a workout completed on `today`.
///
/// Transition table, keyed on the stored last workout date:
/// - same day as `today`: current streak unchanged
/// - exactly one day before `today`: current streak + 1
/// - anything else (including none): reset to 1
///
/// `longest_streak` never decreases and is at least the new current value.
pub fn advance(streak: &Streak, today: NaiveDate) -> Streak {
    let yesterday = today - chrono::Duration::days(1);

    let current = match streak.last_workout_date {
        Some(last) if last == today => streak.current_streak,
        Some(last) if last == yesterday => streak.current_streak + 1,
        _ => 1,
    };

    Streak {
        current_streak: current,
        longest_streak: streak.longest_streak.max(current),
        last_workout_date: Some(today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn test_same_day_unchanged() {
        let streak = Streak {
            current_streak: 4,
            longest_streak: 6,
            last_workout_date: Some(day(7)),
        };
        let next = advance(&streak, day(7));
        assert_eq!(next.current_streak, 4);
        assert_eq!(next.longest_streak, 6);
        assert_eq!(next.last_workout_date, Some(day(7)));
    }

    #[test]
    fn test_consecutive_day_increments() {
        let streak = Streak {
            current_streak: 4,
            longest_streak: 6,
            last_workout_date: Some(day(6)),
        };
        let next = advance(&streak, day(7));
        assert_eq!(next.current_streak, 5);
        assert_eq!(next.longest_streak, 6);
    }

    #[test]
    fn test_gap_resets_to_one() {
        let streak = Streak {
            current_streak: 4,
            longest_streak: 6,
            last_workout_date: Some(day(4)),
        };
        let next = advance(&streak, day(7));
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.longest_streak, 6);
    }

    #[test]
    fn test_no_history_starts_at_one() {
        let next = advance(&Streak::default(), day(7));
        assert_eq!(next.current_streak, 1);
        assert_eq!(next.longest_streak, 1);
        assert_eq!(next.last_workout_date, Some(day(7)));
    }

    #[test]
    fn test_longest_tracks_new_high() {
        let streak = Streak {
            current_streak: 6,
            longest_streak: 6,
            last_workout_date: Some(day(6)),
        };
        let next = advance(&streak, day(7));
        assert_eq!(next.current_streak, 7);
        assert_eq!(next.longest_streak, 7);
    }

    #[test]
    fn test_longest_always_at_least_current() {
        for last in [None, Some(day(1)), Some(day(6)), Some(day(7))] {
            let streak = Streak {
                current_streak: 3,
                longest_streak: 3,
                last_workout_date: last,
            };
            let next = advance(&streak, day(7));
            assert!(next.longest_streak >= next.current_streak);
        }
    }

    #[test]
    fn test_month_boundary_counts_as_consecutive() {
        let streak = Streak {
            current_streak: 2,
            longest_streak: 2,
            last_workout_date: Some(NaiveDate::from_ymd_opt(2026, 7, 31).unwrap()),
        };
        let next = advance(&streak, day(1));
        assert_eq!(next.current_streak, 3);
    }
}
