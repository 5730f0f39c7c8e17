/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Hyperperiod calculation.
//!
//! The hyperperiod of a set of periodic tasks is the Least Common Multiple
//! (LCM) of all their periods: the smallest time window after which the
//! entire task set repeats.  Every analysis in this crate materializes jobs
//! exactly up to the hyperperiod.

pub mod math;

use thiserror::Error;

use crate::task::{EtTask, Time, TtTask};
use math::lcm_of_slice;

// ── Error type ────────────────────────────────────────────────────────────────

/// Errors that can occur during hyperperiod calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HyperperiodError {
    /// LCM calculation overflowed the [`Time`] type.
    ///
    /// Carries the two operands that caused the overflow so the caller can
    /// log a useful message.
    #[error("LCM overflow computing lcm({a}, {b})")]
    Overflow { a: Time, b: Time },
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Hyperperiod of a mixed instance: LCM of every TT and ET task period.
///
/// An instance with no tasks has a hyperperiod of `1` (the analysis window is
/// trivially empty).  Task constructors guarantee positive periods, so the
/// only failure mode is [`HyperperiodError::Overflow`].
pub fn hyperperiod(tt_tasks: &[TtTask], et_tasks: &[EtTask]) -> Result<Time, HyperperiodError> {
    let periods: Vec<Time> = tt_tasks
        .iter()
        .map(|t| t.period)
        .chain(et_tasks.iter().map(|t| t.period))
        .collect();
    if periods.is_empty() {
        return Ok(1);
    }
    lcm_of_slice(&periods)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{EtTask, TtTask};

    fn et(id: usize, period: Time) -> EtTask {
        EtTask::new(id, period, period, 0, 0, 1, 1, 1).unwrap()
    }

    fn tt(id: usize, period: Time) -> TtTask {
        TtTask::new(id, period, period, 0, 1).unwrap()
    }

    #[test]
    fn hyperperiod_of_two_et_tasks() {
        let tasks = vec![et(0, 4), et(1, 6)];
        assert_eq!(hyperperiod(&[], &tasks).unwrap(), 12);
    }

    #[test]
    fn hyperperiod_mixes_tt_and_et_periods() {
        let tts = vec![tt(0, 10)];
        let ets = vec![et(1, 4)];
        assert_eq!(hyperperiod(&tts, &ets).unwrap(), 20);
    }

    #[test]
    fn hyperperiod_of_empty_instance_is_one() {
        assert_eq!(hyperperiod(&[], &[]).unwrap(), 1);
    }

    #[test]
    fn hyperperiod_is_the_slice_reduction_of_all_periods() {
        let tts = vec![tt(0, 4), tt(1, 6)];
        let ets = vec![et(2, 10)];
        assert_eq!(
            hyperperiod(&tts, &ets).unwrap(),
            math::lcm_of_slice(&[4, 6, 10]).unwrap()
        );
    }

    #[test]
    fn hyperperiod_all_same_period() {
        let tasks = vec![et(0, 5), et(1, 5), et(2, 5)];
        assert_eq!(hyperperiod(&[], &tasks).unwrap(), 5);
    }

    #[test]
    fn hyperperiod_overflow_is_reported() {
        let a = i64::MAX / 2 + 1;
        let b = a + 2;
        let tasks = vec![et(0, a), et(1, b)];
        assert!(matches!(
            hyperperiod(&[], &tasks),
            Err(HyperperiodError::Overflow { .. })
        ));
    }
}
