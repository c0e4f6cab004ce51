//! Sleep-cycle timing and sleep-quality scoring.
//!
//! Timing works backward (or forward) from a target clock time in whole sleep
//! cycles, adding the time it takes to fall asleep. Times wrap across midnight.

use crate::config::SleepConfig;
use crate::types::SleepOption;
use chrono::{Duration, NaiveTime};

/// Cycle counts offered, ordered from the earliest bedtime
pub const CYCLE_OPTIONS: [u32; 3] = [6, 5, 4];

/// Cycle count flagged as recommended
pub const RECOMMENDED_CYCLES: u32 = 5;

fn option(cycles: u32, time: NaiveTime, config: &SleepConfig) -> SleepOption {
    SleepOption {
        cycles,
        time,
        sleep_minutes: cycles.saturating_mul(config.cycle_minutes),
        recommended: cycles == RECOMMENDED_CYCLES,
    }
}

/// Minutes from lying down to waking after `cycles` full cycles
fn offset_minutes(cycles: u32, config: &SleepConfig) -> i64 {
    i64::from(cycles) * i64::from(config.cycle_minutes) + i64::from(config.fall_asleep_minutes)
}

/// Bedtimes that end a whole number of cycles at `wake`.
///
/// ```text
/// bedtime = wake - n × cycle - latency,   n ∈ {6, 5, 4}
/// ```
pub fn bedtimes_for_wake(wake: NaiveTime, config: &SleepConfig) -> Vec<SleepOption> {
    CYCLE_OPTIONS
        .iter()
        .map(|&n| option(n, wake - Duration::minutes(offset_minutes(n, config)), config))
        .collect()
}

/// Wake-up times a whole number of cycles after going to bed at `bed`.
///
/// ```text
/// wake = bed + latency + n × cycle,   n ∈ {4, 5, 6}
/// ```
pub fn wake_times_for_bed(bed: NaiveTime, config: &SleepConfig) -> Vec<SleepOption> {
    CYCLE_OPTIONS
        .iter()
        .rev()
        .map(|&n| option(n, bed + Duration::minutes(offset_minutes(n, config)), config))
        .collect()
}

/// Duration sub-score: 100 for 7-9 h, linear down to 0 at 4 h and 12 h
pub fn duration_score(hours: f64) -> f64 {
    if hours < 7.0 {
        ((hours - 4.0) / 3.0 * 100.0).clamp(0.0, 100.0)
    } else if hours <= 9.0 {
        100.0
    } else {
        ((12.0 - hours) / 3.0 * 100.0).clamp(0.0, 100.0)
    }
}

/// Latency sub-score: 100 at <= 15 min, linear down to 0 at 60 min
pub fn latency_score(minutes: f64) -> f64 {
    if minutes <= 15.0 {
        100.0
    } else {
        ((60.0 - minutes) / 45.0 * 100.0).clamp(0.0, 100.0)
    }
}

/// Continuity sub-score: 100 - 20 per awakening, floored at 0
pub fn continuity_score(awakenings: u32) -> f64 {
    (100.0 - 20.0 * f64::from(awakenings)).max(0.0)
}

/// Subjective 1-5 rating mapped onto 0-100
pub fn rating_score(rating: u8) -> f64 {
    ((f64::from(rating) - 1.0) / 4.0 * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_bedtimes_for_seven_am() {
        let options = bedtimes_for_wake(t(7, 0), &SleepConfig::default());

        let times: Vec<NaiveTime> = options.iter().map(|o| o.time).collect();
        assert_eq!(times, vec![t(21, 46), t(23, 16), t(0, 46)]);

        let cycles: Vec<u32> = options.iter().map(|o| o.cycles).collect();
        assert_eq!(cycles, vec![6, 5, 4]);

        let recommended: Vec<bool> = options.iter().map(|o| o.recommended).collect();
        assert_eq!(recommended, vec![false, true, false]);
        assert_eq!(options[1].sleep_minutes, 450);
    }

    #[test]
    fn test_wake_times_wrap_midnight() {
        let options = wake_times_for_bed(t(23, 0), &SleepConfig::default());
        let times: Vec<NaiveTime> = options.iter().map(|o| o.time).collect();
        assert_eq!(times, vec![t(5, 14), t(6, 44), t(8, 14)]);
        assert!(options[1].recommended);
    }

    #[test]
    fn test_custom_cycle_length() {
        let config = SleepConfig {
            cycle_minutes: 100,
            fall_asleep_minutes: 0,
        };
        let options = bedtimes_for_wake(t(8, 0), &config);
        assert_eq!(options[1].time, t(23, 40));
    }

    #[test]
    fn test_extreme_config_does_not_overflow() {
        let config = SleepConfig {
            cycle_minutes: u32::MAX,
            fall_asleep_minutes: u32::MAX,
        };
        let options = bedtimes_for_wake(t(7, 0), &config);
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].sleep_minutes, u32::MAX);
        assert_eq!(wake_times_for_bed(t(23, 0), &config).len(), 3);
    }

    #[test]
    fn test_sub_scores() {
        assert_eq!(duration_score(8.0), 100.0);
        assert_eq!(duration_score(4.0), 0.0);
        assert!((duration_score(5.5) - 50.0).abs() < 1e-9);
        assert!((duration_score(10.5) - 50.0).abs() < 1e-9);
        assert_eq!(latency_score(10.0), 100.0);
        assert_eq!(latency_score(90.0), 0.0);
        assert_eq!(continuity_score(2), 60.0);
        assert_eq!(continuity_score(9), 0.0);
        assert_eq!(rating_score(1), 0.0);
        assert_eq!(rating_score(5), 100.0);
    }
}
