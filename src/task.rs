/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Task and job model for the schedulability analyzer.
//!
//! Two task flavours model the two sides of a mixed instance:
//!
//! ```text
//! TtTask  – time-triggered: fixed release offset, fixed execution time
//! EtTask  – event-triggered: [release_min, release_max] and
//!           [execution_min, execution_max] windows plus a priority class
//! ```
//!
//! A *task* is an immutable periodic template; a *job* is one dated
//! repetition of it inside the analysis window (the hyperperiod).  The n-th
//! repetition shifts every absolute time field by `n × period`.
//!
//! # Job identity
//! A job is a *slot*: equality and hashing use `(task_id, repetition)` only
//! and ignore timing fields.  The placement search overwrites a job's release
//! window and deadline while backtracking; the job stays "the same job"
//! throughout.
//!
//! # Validation
//! Constructing a task with an inverted window, a negative timing field or a
//! non-positive period is a configuration error reported before any analysis
//! starts.  `Task*::new` are the only validating constructors, so a
//! successfully built task set is known-consistent everywhere downstream.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use thiserror::Error;

/// Discrete time unit used throughout the analyzer.
///
/// All periods, deadlines, releases and execution times are integers in this
/// unit; the engine never divides time.
pub type Time = i64;

/// Priority value that designates the fixed-priority "critical" class used by
/// the P-RM policy.  By convention it also marks TT-derived tasks.
pub const CRITICAL_PRIORITY: i32 = 0;

// ── Errors ────────────────────────────────────────────────────────────────────

/// Configuration error raised while constructing a task.
///
/// These fail fast: no analysis ever starts on a partially valid task set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    /// A `[min, max]` window with `min > max`.
    #[error("task {task}: {field} window is inverted ({min} > {max})")]
    WindowInverted {
        task: usize,
        field: &'static str,
        min: Time,
        max: Time,
    },

    /// A timing field (or priority) below zero.
    #[error("task {task}: {field} must not be negative (got {value})")]
    NegativeField {
        task: usize,
        field: &'static str,
        value: Time,
    },

    /// Periods must be at least 1 — jobs repeat every `period` time units.
    #[error("task {task}: period must be positive (got {period})")]
    NonPositivePeriod { task: usize, period: Time },
}

fn check_non_negative(task: usize, field: &'static str, value: Time) -> Result<(), TaskError> {
    if value < 0 {
        return Err(TaskError::NegativeField { task, field, value });
    }
    Ok(())
}

// ── Time-triggered tasks and jobs ─────────────────────────────────────────────

/// A time-triggered periodic task: every repetition releases at the same
/// offset and runs for exactly `execution` time units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtTask {
    /// Dense 0-based task id.  The graph engine indexes its job tables by id,
    /// so ids must form `0..n` over the whole instance (TT tasks first).
    pub id: usize,
    pub period: Time,
    /// Deadline relative to the period start.
    pub deadline: Time,
    /// Release offset relative to the period start.
    pub release: Time,
    pub execution: Time,
}

impl TtTask {
    pub fn new(
        id: usize,
        period: Time,
        deadline: Time,
        release: Time,
        execution: Time,
    ) -> Result<Self, TaskError> {
        if period <= 0 {
            return Err(TaskError::NonPositivePeriod { task: id, period });
        }
        check_non_negative(id, "deadline", deadline)?;
        check_non_negative(id, "release", release)?;
        check_non_negative(id, "execution", execution)?;
        Ok(Self {
            id,
            period,
            deadline,
            release,
            execution,
        })
    }

    /// The n-th repetition as a dated job: all absolute time fields shifted
    /// by `n × period`.
    pub fn nth_repetition(&self, n: usize) -> TtJob {
        let shift = n as Time * self.period;
        TtJob {
            task_id: self.id,
            repetition: n,
            period: self.period,
            deadline: self.deadline + shift,
            release: self.release + shift,
            execution: self.execution,
        }
    }

    /// Utilization fraction of this task.
    pub fn utilization(&self) -> f64 {
        self.execution as f64 / self.period as f64
    }
}

/// One repetition of a [`TtTask`]: fixed absolute release, fixed execution.
#[derive(Debug, Clone)]
pub struct TtJob {
    pub task_id: usize,
    pub repetition: usize,
    pub period: Time,
    /// Absolute deadline.
    pub deadline: Time,
    /// Absolute release time.
    pub release: Time,
    pub execution: Time,
}

// ── Event-triggered tasks and jobs ────────────────────────────────────────────

/// An event-triggered periodic task whose release time and execution time
/// vary within closed integer windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtTask {
    /// Dense 0-based task id (see [`TtTask::id`]).
    pub id: usize,
    pub period: Time,
    /// Deadline relative to the period start.
    pub deadline: Time,
    /// Earliest release offset relative to the period start.
    pub release_min: Time,
    /// Latest release offset relative to the period start.
    pub release_max: Time,
    pub execution_min: Time,
    pub execution_max: Time,
    /// Priority class; smaller is more urgent.  [`CRITICAL_PRIORITY`] marks
    /// the class the P-RM policy protects.
    pub priority: i32,
}

impl EtTask {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: usize,
        period: Time,
        deadline: Time,
        release_min: Time,
        release_max: Time,
        execution_min: Time,
        execution_max: Time,
        priority: i32,
    ) -> Result<Self, TaskError> {
        if period <= 0 {
            return Err(TaskError::NonPositivePeriod { task: id, period });
        }
        check_non_negative(id, "deadline", deadline)?;
        check_non_negative(id, "release_min", release_min)?;
        check_non_negative(id, "release_max", release_max)?;
        check_non_negative(id, "execution_min", execution_min)?;
        check_non_negative(id, "execution_max", execution_max)?;
        check_non_negative(id, "priority", priority as Time)?;
        if release_min > release_max {
            return Err(TaskError::WindowInverted {
                task: id,
                field: "release",
                min: release_min,
                max: release_max,
            });
        }
        if execution_min > execution_max {
            return Err(TaskError::WindowInverted {
                task: id,
                field: "execution",
                min: execution_min,
                max: execution_max,
            });
        }
        Ok(Self {
            id,
            period,
            deadline,
            release_min,
            release_max,
            execution_min,
            execution_max,
            priority,
        })
    }

    /// Degenerate-window conversion of a time-triggered task:
    /// `release_min = release_max` and `execution_min = execution_max`.
    pub fn from_tt(task: &TtTask, priority: i32) -> Self {
        Self {
            id: task.id,
            period: task.period,
            deadline: task.deadline,
            release_min: task.release,
            release_max: task.release,
            execution_min: task.execution,
            execution_max: task.execution,
            priority,
        }
    }

    /// The n-th repetition as a dated job: deadline and both release bounds
    /// shifted by `n × period`, execution window unchanged.
    pub fn nth_repetition(&self, n: usize) -> EtJob {
        let shift = n as Time * self.period;
        EtJob {
            task_id: self.id,
            repetition: n,
            period: self.period,
            deadline: self.deadline + shift,
            release_min: self.release_min + shift,
            release_max: self.release_max + shift,
            execution_min: self.execution_min,
            execution_max: self.execution_max,
            priority: self.priority,
        }
    }

    /// Worst-case utilization fraction of this task.
    pub fn utilization(&self) -> f64 {
        self.execution_max as f64 / self.period as f64
    }
}

/// One repetition of an [`EtTask`].
///
/// The release window and the deadline are mutable on purpose: the placement
/// search narrows them while trying TT start times and restores them before
/// its frame returns (strict stack discipline — see the `placement` module).
#[derive(Debug, Clone)]
pub struct EtJob {
    pub task_id: usize,
    pub repetition: usize,
    pub period: Time,
    /// Absolute deadline.
    pub deadline: Time,
    /// Earliest absolute release time.
    pub release_min: Time,
    /// Latest absolute release time.
    pub release_max: Time,
    pub execution_min: Time,
    pub execution_max: Time,
    pub priority: i32,
}

impl EtJob {
    /// Degenerate-window conversion of a time-triggered job.
    pub fn from_tt(job: &TtJob, priority: i32) -> Self {
        Self {
            task_id: job.task_id,
            repetition: job.repetition,
            period: job.period,
            deadline: job.deadline,
            release_min: job.release,
            release_max: job.release,
            execution_min: job.execution,
            execution_max: job.execution,
            priority,
        }
    }

    /// Slot identity: two jobs are the same slot iff they are the same
    /// repetition of the same task, regardless of timing fields.
    pub fn same_slot(&self, other: &EtJob) -> bool {
        self.task_id == other.task_id && self.repetition == other.repetition
    }

    /// Key of the base total order shared by all four policies:
    /// ascending priority, then ascending deadline, then ascending task id.
    ///
    /// Priority is compared *before* deadline.  This is deliberate — all four
    /// policies as specified are built on this order.
    pub fn base_order_key(&self) -> (i32, Time, usize) {
        (self.priority, self.deadline, self.task_id)
    }
}

impl PartialEq for EtJob {
    fn eq(&self, other: &Self) -> bool {
        self.same_slot(other)
    }
}

impl Eq for EtJob {}

impl Hash for EtJob {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.task_id.hash(state);
        self.repetition.hash(state);
    }
}

impl PartialOrd for EtJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Consistent with slot equality: within one task set two distinct slots of
// the same task always differ in deadline (deadlines shift by whole periods),
// so `Ordering::Equal` coincides with `same_slot`.
impl Ord for EtJob {
    fn cmp(&self, other: &Self) -> Ordering {
        self.base_order_key().cmp(&other.base_order_key())
    }
}

/// An ET job pinned to one concrete realization of its windows.
///
/// Used by the brute-force simulator, which enumerates every combination of
/// concrete release and execution values.
#[derive(Debug, Clone)]
pub struct FixedJob {
    pub job: EtJob,
    pub release: Time,
    pub execution: Time,
}

impl FixedJob {
    /// Pin a job to the pessimistic corner of its windows (latest release,
    /// longest execution).  The simulator then walks the rest.
    pub fn pessimistic(job: EtJob) -> Self {
        let release = job.release_max;
        let execution = job.execution_max;
        Self {
            job,
            release,
            execution,
        }
    }
}

// ── Job materialization ───────────────────────────────────────────────────────

/// Materialize every TT job inside the hyperperiod, one `Vec` per task.
///
/// The outer index equals the task id; each inner list is ordered by
/// repetition.  The engine and the placement search both rely on this layout.
pub fn tt_jobs_by_task(tasks: &[TtTask], hyperperiod: Time) -> Vec<Vec<TtJob>> {
    tasks
        .iter()
        .map(|t| {
            (0..(hyperperiod / t.period) as usize)
                .map(|n| t.nth_repetition(n))
                .collect()
        })
        .collect()
}

/// Materialize every ET job inside the hyperperiod, one `Vec` per task.
pub fn et_jobs_by_task(tasks: &[EtTask], hyperperiod: Time) -> Vec<Vec<EtJob>> {
    tasks
        .iter()
        .map(|t| {
            (0..(hyperperiod / t.period) as usize)
                .map(|n| t.nth_repetition(n))
                .collect()
        })
        .collect()
}

/// Pin TT jobs to chosen start times, producing degenerate ET jobs.
///
/// Each fixed job releases exactly at its start time and its deadline is
/// tightened to `start + execution`, so a follow-up ET-only analysis treats
/// the TT placement as immovable.  `start_times[i][j]` is the start of
/// repetition `j` of TT task `i`.
pub fn fix_tt_jobs(tt_jobs: &[Vec<TtJob>], start_times: &[Vec<Time>]) -> Vec<Vec<EtJob>> {
    start_times
        .iter()
        .enumerate()
        .map(|(i, starts)| {
            starts
                .iter()
                .enumerate()
                .map(|(j, &start)| {
                    let tt = &tt_jobs[i][j];
                    let mut fixed = EtJob::from_tt(tt, CRITICAL_PRIORITY);
                    fixed.release_min = start;
                    fixed.release_max = start;
                    fixed.deadline = start + tt.execution;
                    fixed
                })
                .collect()
        })
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn et(id: usize) -> EtTask {
        EtTask::new(id, 10, 10, 0, 2, 1, 3, 1).unwrap()
    }

    // ── validation ────────────────────────────────────────────────────────────

    #[test]
    fn inverted_release_window_is_rejected() {
        let err = EtTask::new(0, 10, 10, 5, 2, 1, 1, 1).unwrap_err();
        assert_eq!(
            err,
            TaskError::WindowInverted {
                task: 0,
                field: "release",
                min: 5,
                max: 2
            }
        );
    }

    #[test]
    fn inverted_execution_window_is_rejected() {
        let err = EtTask::new(0, 10, 10, 0, 0, 4, 2, 1).unwrap_err();
        assert!(matches!(
            err,
            TaskError::WindowInverted {
                field: "execution",
                ..
            }
        ));
    }

    #[test]
    fn negative_fields_are_rejected() {
        assert!(matches!(
            EtTask::new(0, 10, -1, 0, 0, 1, 1, 1),
            Err(TaskError::NegativeField {
                field: "deadline",
                ..
            })
        ));
        assert!(matches!(
            EtTask::new(0, 10, 10, 0, 0, 1, 1, -2),
            Err(TaskError::NegativeField {
                field: "priority",
                ..
            })
        ));
        assert!(matches!(
            TtTask::new(0, 10, 10, -3, 1),
            Err(TaskError::NegativeField {
                field: "release",
                ..
            })
        ));
    }

    #[test]
    fn zero_period_is_rejected() {
        assert!(matches!(
            TtTask::new(0, 0, 5, 0, 1),
            Err(TaskError::NonPositivePeriod { .. })
        ));
        assert!(matches!(
            EtTask::new(0, -5, 5, 0, 0, 1, 1, 1),
            Err(TaskError::NonPositivePeriod { .. })
        ));
    }

    // ── repetitions ───────────────────────────────────────────────────────────

    #[test]
    fn nth_repetition_shifts_absolute_fields() {
        let task = EtTask::new(3, 10, 8, 1, 2, 1, 4, 2).unwrap();
        let job = task.nth_repetition(2);
        assert_eq!(job.task_id, 3);
        assert_eq!(job.repetition, 2);
        assert_eq!(job.deadline, 28);
        assert_eq!(job.release_min, 21);
        assert_eq!(job.release_max, 22);
        // execution window is relative and stays put
        assert_eq!(job.execution_min, 1);
        assert_eq!(job.execution_max, 4);
    }

    #[test]
    fn zeroth_repetition_is_the_template() {
        let task = TtTask::new(1, 5, 5, 2, 1).unwrap();
        let job = task.nth_repetition(0);
        assert_eq!(job.release, 2);
        assert_eq!(job.deadline, 5);
    }

    #[test]
    fn from_tt_produces_degenerate_windows() {
        let tt = TtTask::new(0, 10, 9, 3, 2).unwrap();
        let et = EtTask::from_tt(&tt, CRITICAL_PRIORITY);
        assert_eq!(et.release_min, et.release_max);
        assert_eq!(et.execution_min, et.execution_max);
        assert_eq!(et.priority, CRITICAL_PRIORITY);
    }

    // ── slot identity ─────────────────────────────────────────────────────────

    #[test]
    fn job_equality_ignores_timing_fields() {
        let a = et(0).nth_repetition(1);
        let mut b = a.clone();
        b.release_min = 99;
        b.release_max = 99;
        b.deadline = 200;
        assert_eq!(a, b, "same slot must stay equal after timing rewrite");

        let other_rep = et(0).nth_repetition(2);
        assert_ne!(a, other_rep);
    }

    // ── base order ────────────────────────────────────────────────────────────

    #[test]
    fn base_order_priority_dominates_deadline() {
        let mut urgent = et(0).nth_repetition(0);
        urgent.priority = 0;
        urgent.deadline = 100;
        let mut relaxed = et(1).nth_repetition(0);
        relaxed.priority = 1;
        relaxed.deadline = 5;
        assert!(
            urgent < relaxed,
            "lower priority value wins even with a later deadline"
        );
    }

    #[test]
    fn base_order_deadline_breaks_priority_ties() {
        let mut a = et(0).nth_repetition(0);
        a.deadline = 5;
        let mut b = et(1).nth_repetition(0);
        b.deadline = 9;
        assert!(a < b);
    }

    #[test]
    fn base_order_task_id_breaks_remaining_ties() {
        let a = et(0).nth_repetition(0);
        let b = et(1).nth_repetition(0);
        assert_eq!(a.priority, b.priority);
        assert_eq!(a.deadline, b.deadline);
        assert!(a < b);
    }

    // ── materialization ───────────────────────────────────────────────────────

    #[test]
    fn jobs_by_task_fills_the_hyperperiod() {
        let tasks = vec![
            EtTask::new(0, 5, 5, 0, 0, 1, 1, 1).unwrap(),
            EtTask::new(1, 10, 10, 0, 0, 1, 1, 1).unwrap(),
        ];
        let jobs = et_jobs_by_task(&tasks, 10);
        assert_eq!(jobs[0].len(), 2);
        assert_eq!(jobs[1].len(), 1);
        assert_eq!(jobs[0][1].deadline, 10);
        assert_eq!(jobs[0][1].repetition, 1);
    }

    #[test]
    fn fix_tt_jobs_pins_release_and_tightens_deadline() {
        let tt = vec![TtTask::new(0, 10, 10, 0, 3).unwrap()];
        let tt_jobs = tt_jobs_by_task(&tt, 20);
        let fixed = fix_tt_jobs(&tt_jobs, &[vec![4, 12]]);
        assert_eq!(fixed[0][0].release_min, 4);
        assert_eq!(fixed[0][0].release_max, 4);
        assert_eq!(fixed[0][0].deadline, 7);
        assert_eq!(fixed[0][1].release_min, 12);
        assert_eq!(fixed[0][1].deadline, 15);
    }
}
