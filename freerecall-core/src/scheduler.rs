use crate::TopicSchedule;
use chrono::{DateTime, Duration, Utc};

/// Scores below this reset the interval to one day.
pub const PASS_SCORE: u32 = 60;
/// Scores at or above this double the interval.
pub const STRONG_SCORE: u32 = 80;

pub fn next_interval(prev: u32, score: u32) -> u32 {
    if prev == 0 || score < PASS_SCORE {
        1
    } else if score < STRONG_SCORE {
        prev.max(1)
    } else {
        prev.saturating_mul(2)
    }
}

pub fn apply_score(mut schedule: TopicSchedule, score: u32, now: DateTime<Utc>) -> TopicSchedule {
    let interval = next_interval(schedule.interval_days, score);
    schedule.interval_days = interval;
    schedule.last_review = Some(now);
    schedule.next_review = now + Duration::days(i64::from(interval));
    schedule
}
