//! Review scheduler for spaced repetition.
//!
//! Each answer moves a card's interval according to the reported recall quality:
//! - Easy: interval grows 2.5x
//! - Hard: interval grows 1.2x
//! - Wrong: interval resets to 1 day
//!
//! Growth is rounded to the nearest day, halves rounding away from zero.
//! The next review lands `interval` days after the day the answer was given.

use super::{NextReview, Quality};
use crate::error::{Error, Result};
use chrono::{Days, NaiveDate};

/// Multipliers as (numerator, denominator) so rounding stays exact.
const EASY_MULTIPLIER: (i64, i64) = (5, 2);
const HARD_MULTIPLIER: (i64, i64) = (6, 5);

const RESET_INTERVAL: i64 = 1;

/// Computes a card's new interval and review date.
/// `today` is the day the answer was submitted; the scheduler never reads a clock.
pub fn compute_next_review(
    current_interval: i64,
    quality: Quality,
    today: NaiveDate,
) -> Result<NextReview> {
    if current_interval < 1 {
        return Err(Error::invalid(format!(
            "interval must be at least 1, got {}",
            current_interval
        )));
    }

    let new_interval = match quality {
        Quality::Easy => scale(current_interval, EASY_MULTIPLIER)?,
        Quality::Hard => scale(current_interval, HARD_MULTIPLIER)?,
        Quality::Wrong => RESET_INTERVAL,
    };

    let next_review_date = today
        .checked_add_days(Days::new(new_interval as u64))
        .ok_or_else(|| {
            Error::invalid(format!(
                "review date out of range: {} + {} days",
                today, new_interval
            ))
        })?;

    Ok(NextReview {
        interval: new_interval,
        next_review_date,
    })
}

/// `round(interval * num / den)` with ties away from zero, for positive inputs.
fn scale(interval: i64, (num, den): (i64, i64)) -> Result<i64> {
    interval
        .checked_mul(2 * num)
        .and_then(|doubled| doubled.checked_add(den))
        .map(|n| n / (2 * den))
        .ok_or_else(|| Error::invalid(format!("interval {} is too large to grow", interval)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_easy_from_first_interval() {
        let next = compute_next_review(1, Quality::Easy, date(2024, 1, 1)).unwrap();
        // 2.5 rounds up to 3
        assert_eq!(next.interval, 3);
        assert_eq!(next.next_review_date, date(2024, 1, 4));
    }

    #[test]
    fn test_hard_from_ten_days() {
        let next = compute_next_review(10, Quality::Hard, date(2024, 1, 1)).unwrap();
        assert_eq!(next.interval, 12);
        assert_eq!(next.next_review_date, date(2024, 1, 13));
    }

    #[test]
    fn test_wrong_resets() {
        let next = compute_next_review(30, Quality::Wrong, date(2024, 1, 1)).unwrap();
        assert_eq!(next.interval, 1);
        assert_eq!(next.next_review_date, date(2024, 1, 2));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let err = compute_next_review(0, Quality::Easy, date(2024, 1, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn test_negative_interval_rejected() {
        assert!(matches!(
            compute_next_review(-4, Quality::Wrong, date(2024, 1, 1)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_known_roundings() {
        let today = date(2024, 1, 1);
        let easy = |i| compute_next_review(i, Quality::Easy, today).unwrap().interval;
        let hard = |i| compute_next_review(i, Quality::Hard, today).unwrap().interval;

        assert_eq!(easy(2), 5);
        assert_eq!(easy(3), 8); // 7.5
        assert_eq!(easy(5), 13); // 12.5
        assert_eq!(hard(1), 1); // 1.2
        assert_eq!(hard(2), 2); // 2.4
        assert_eq!(hard(3), 4); // 3.6
        assert_eq!(hard(4), 5); // 4.8
    }

    #[test]
    fn test_crosses_month_and_leap_day() {
        let next = compute_next_review(2, Quality::Easy, date(2024, 2, 26)).unwrap();
        assert_eq!(next.interval, 5);
        assert_eq!(next.next_review_date, date(2024, 3, 2));
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(
            compute_next_review(i64::MAX, Quality::Easy, date(2024, 1, 1)),
            Err(Error::InvalidArgument(_))
        ));
        // Fits in i64 but not in the calendar
        assert!(matches!(
            compute_next_review(1 << 40, Quality::Hard, date(2024, 1, 1)),
            Err(Error::InvalidArgument(_))
        ));
    }

    fn reference_round(interval: i64, factor: f64) -> i64 {
        (interval as f64 * factor).round() as i64
    }

    proptest! {
        #[test]
        fn prop_wrong_always_resets(interval in 1i64..100_000, offset in 0i64..20_000) {
            let today = date(2000, 1, 1) + chrono::Duration::days(offset);
            let next = compute_next_review(interval, Quality::Wrong, today).unwrap();
            prop_assert_eq!(next.interval, 1);
            prop_assert_eq!(next.next_review_date, today.succ_opt().unwrap());
        }

        #[test]
        fn prop_easy_matches_rounded_product(interval in 1i64..100_000) {
            let today = date(2024, 1, 1);
            let next = compute_next_review(interval, Quality::Easy, today).unwrap();
            prop_assert_eq!(next.interval, reference_round(interval, 2.5));
            prop_assert!(next.interval >= interval);
            prop_assert_eq!(next.next_review_date, today + chrono::Duration::days(next.interval));
        }

        #[test]
        fn prop_hard_matches_rounded_product(interval in 1i64..100_000) {
            let next = compute_next_review(interval, Quality::Hard, date(2024, 1, 1)).unwrap();
            prop_assert_eq!(next.interval, reference_round(interval, 1.2));
        }

        #[test]
        fn prop_easy_hard_wrong_ordering(interval in 1i64..100_000) {
            let today = date(2024, 1, 1);
            let easy = compute_next_review(interval, Quality::Easy, today).unwrap();
            let hard = compute_next_review(interval, Quality::Hard, today).unwrap();
            let wrong = compute_next_review(interval, Quality::Wrong, today).unwrap();
            prop_assert!(easy.interval >= hard.interval);
            prop_assert!(hard.interval >= wrong.interval);
            prop_assert!(wrong.interval >= 1);
        }

        #[test]
        fn prop_same_inputs_same_output(interval in 1i64..100_000, q in 0usize..3) {
            let today = date(2024, 6, 15);
            let quality = Quality::ALL[q];
            prop_assert_eq!(
                compute_next_review(interval, quality, today).unwrap(),
                compute_next_review(interval, quality, today).unwrap()
            );
        }
    }
}
