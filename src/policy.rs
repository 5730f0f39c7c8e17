/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scheduling policy evaluator.
//!
//! Four priority policies are supported, all built on one *base total order*
//! over jobs: ascending priority, then ascending deadline, then ascending
//! task id (see [`EtJob::base_order_key`]).  Selection always means "pick the
//! least eligible job under the base order"; what differs between policies is
//! which jobs count as eligible.
//!
//! Three of the policies gate eligibility with a *critical bound*: a
//! designated critical job and a latest-finish-time (LFT) boundary.  A
//! non-critical job is eligible at time `t` only if starting it could not
//! push the critical job past the boundary, i.e. `t + execution_max ≤ LFT`.
//! The critical job itself is exempt from the boundary (but still has to be
//! released).
//!
//! | Policy | Critical job | LFT |
//! |---|---|---|
//! | EDF-FP | none | unbounded |
//! | P-RM | smallest max-execution job of the priority-0 class | `deadline − execution_max` |
//! | CP | smallest-deadline applicable job | `deadline − execution_max` |
//! | CW | last job of a descending-deadline stacking walk | the walk's final boundary |
//!
//! The bound computation is factored out as [`Policy::critical_bound`] so the
//! concrete-time selection here and the interval-time expansion in the graph
//! engine share one definition per policy.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::task::{EtJob, FixedJob, Time, CRITICAL_PRIORITY};

// ── Policy enum ───────────────────────────────────────────────────────────────

/// A job selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Earliest deadline first, fixed priority: the base order alone decides.
    EdfFp,
    /// Precautious rate-monotonic: protects the priority-0 class.
    PRm,
    /// Critical point: protects the earliest-deadline job.
    Cp,
    /// Critical window: protects the tightest stacked suffix of deadlines.
    Cw,
}

impl Policy {
    pub const ALL: [Policy; 4] = [Policy::EdfFp, Policy::PRm, Policy::Cp, Policy::Cw];

    /// Canonical policy name as used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Policy::EdfFp => "EDF-FP",
            Policy::PRm => "P-RM",
            Policy::Cp => "CP",
            Policy::Cw => "CW",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The policy name passed on the command line is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown policy: '{0}' (valid: EDF-FP, P-RM, CP, CW)")]
pub struct UnknownPolicy(pub String);

impl FromStr for Policy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "EDF-FP" => Ok(Policy::EdfFp),
            "P-RM" => Ok(Policy::PRm),
            "CP" => Ok(Policy::Cp),
            "CW" => Ok(Policy::Cw),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

// ── Critical bound ────────────────────────────────────────────────────────────

/// Per-policy safety margin over a set of applicable jobs.
///
/// `job` is `None` when the policy imposes no bound (EDF-FP always; P-RM when
/// no priority-0 job is applicable), in which case `lft` is `Time::MAX` and
/// every applicable job is eligible.
#[derive(Debug, Clone, Copy)]
pub struct CriticalBound<'a> {
    pub job: Option<&'a EtJob>,
    pub lft: Time,
}

impl<'a> CriticalBound<'a> {
    const UNBOUNDED: CriticalBound<'static> = CriticalBound {
        job: None,
        lft: Time::MAX,
    };

    /// Whether `job` is the designated critical job.
    pub fn is_critical(&self, job: &EtJob) -> bool {
        self.job.is_some_and(|c| c.same_slot(job))
    }

    /// Whether `job` may start at `t` without endangering the critical job.
    pub fn permits(&self, t: Time, job: &EtJob) -> bool {
        self.is_critical(job) || t + job.execution_max <= self.lft
    }
}

impl Policy {
    /// Compute the critical job and LFT for one set of applicable jobs.
    ///
    /// `applicable` is a per-task slot array: `slots[i]` holds task `i`'s
    /// next not-yet-executed job, or `None` once the task is exhausted.
    /// Applicability is the *caller's* notion — release times are not
    /// consulted here; each policy examines the whole slot set by design.
    pub fn critical_bound<'a>(self, applicable: &[Option<&'a EtJob>]) -> CriticalBound<'a> {
        match self {
            Policy::EdfFp => CriticalBound::UNBOUNDED,
            Policy::PRm => prm_bound(applicable),
            Policy::Cp => cp_bound(applicable),
            Policy::Cw => cw_bound(applicable),
        }
    }

    /// Concrete-time selection: among the applicable jobs, pick the job to
    /// run at time `t`, or `None` if nothing is both released and eligible.
    ///
    /// Used by the brute-force simulator where every job carries a concrete
    /// release and execution value.  Eligibility = released by `t` and
    /// permitted by the policy's critical bound; selection = least under the
    /// base order.
    pub fn select<'a>(self, t: Time, slots: &[Option<&'a FixedJob>]) -> Option<&'a FixedJob> {
        let jobs: Vec<Option<&EtJob>> = slots.iter().map(|s| s.map(|f| &f.job)).collect();
        let bound = self.critical_bound(&jobs);

        let mut best: Option<&FixedJob> = None;
        for &fixed in slots.iter().flatten() {
            if fixed.release > t || !bound.permits(t, &fixed.job) {
                continue;
            }
            if best.is_none_or(|b| fixed.job < b.job) {
                best = Some(fixed);
            }
        }
        best
    }
}

// ── Per-policy bound functions ────────────────────────────────────────────────

/// P-RM: the critical job is the priority-0 job with the smallest maximum
/// execution time (ties: smaller task id).  Without any priority-0 job the
/// bound is inactive.
fn prm_bound<'a>(applicable: &[Option<&'a EtJob>]) -> CriticalBound<'a> {
    let mut critical: Option<&EtJob> = None;
    for &job in applicable.iter().flatten() {
        if job.priority != CRITICAL_PRIORITY {
            continue;
        }
        if critical.is_none_or(|c| (job.execution_max, job.task_id) < (c.execution_max, c.task_id))
        {
            critical = Some(job);
        }
    }
    match critical {
        Some(c) => CriticalBound {
            job: Some(c),
            lft: c.deadline - c.execution_max,
        },
        None => CriticalBound::UNBOUNDED,
    }
}

/// CP: the critical job is the applicable job with the smallest deadline
/// (ties: smaller task id).
fn cp_bound<'a>(applicable: &[Option<&'a EtJob>]) -> CriticalBound<'a> {
    let mut critical: Option<&EtJob> = None;
    for &job in applicable.iter().flatten() {
        if critical.is_none_or(|c| (job.deadline, job.task_id) < (c.deadline, c.task_id)) {
            critical = Some(job);
        }
    }
    match critical {
        Some(c) => CriticalBound {
            job: Some(c),
            lft: c.deadline - c.execution_max,
        },
        None => CriticalBound::UNBOUNDED,
    }
}

/// CW: stack the applicable jobs from the latest deadline downwards,
/// maintaining a running boundary.  Whenever a job's deadline undercuts the
/// boundary the boundary restarts at `deadline − execution_max`; otherwise
/// the job's execution is stacked below it.  The last job processed (the
/// smallest deadline) is the critical job and the final boundary is the LFT.
fn cw_bound<'a>(applicable: &[Option<&'a EtJob>]) -> CriticalBound<'a> {
    let mut stacked: Vec<&EtJob> = applicable.iter().flatten().copied().collect();
    // Descending deadline, ties broken by descending task id, so the walk
    // ends on the job the base tie-breaks would rank first.
    stacked.sort_by(|a, b| (b.deadline, b.task_id).cmp(&(a.deadline, a.task_id)));

    let mut critical: Option<&EtJob> = None;
    let mut boundary = Time::MAX;
    for job in stacked {
        if job.deadline < boundary {
            boundary = job.deadline - job.execution_max;
        } else {
            boundary -= job.execution_max;
        }
        critical = Some(job);
    }
    match critical {
        Some(c) => CriticalBound {
            job: Some(c),
            lft: boundary,
        },
        None => CriticalBound::UNBOUNDED,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::EtTask;

    fn job(
        task_id: usize,
        deadline: Time,
        release: Time,
        execution: Time,
        priority: i32,
    ) -> EtJob {
        EtTask::new(task_id, 1000, deadline, release, release, execution, execution, priority)
            .unwrap()
            .nth_repetition(0)
    }

    fn fixed(job: EtJob) -> FixedJob {
        FixedJob::pessimistic(job)
    }

    fn slots(jobs: &[EtJob]) -> Vec<Option<&EtJob>> {
        jobs.iter().map(Some).collect()
    }

    // ── parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn policy_names_round_trip() {
        for p in Policy::ALL {
            assert_eq!(p.name().parse::<Policy>().unwrap(), p);
        }
    }

    #[test]
    fn unknown_policy_name_is_an_error() {
        let err = "RM".parse::<Policy>().unwrap_err();
        assert_eq!(err, UnknownPolicy("RM".into()));
    }

    // ── critical bounds ───────────────────────────────────────────────────────

    #[test]
    fn edffp_bound_is_inactive() {
        let jobs = [job(0, 10, 0, 2, 1)];
        let bound = Policy::EdfFp.critical_bound(&slots(&jobs));
        assert!(bound.job.is_none());
        assert_eq!(bound.lft, Time::MAX);
    }

    #[test]
    fn prm_bound_picks_shortest_priority_zero_job() {
        let jobs = [
            job(0, 20, 0, 5, 0),
            job(1, 10, 0, 2, 0), // shorter execution wins despite later position
            job(2, 5, 0, 1, 1),  // priority 1 — not a candidate
        ];
        let bound = Policy::PRm.critical_bound(&slots(&jobs));
        assert_eq!(bound.job.unwrap().task_id, 1);
        assert_eq!(bound.lft, 8);
    }

    #[test]
    fn prm_bound_without_priority_zero_is_inactive() {
        let jobs = [job(0, 10, 0, 2, 1), job(1, 5, 0, 1, 2)];
        let bound = Policy::PRm.critical_bound(&slots(&jobs));
        assert!(bound.job.is_none());
        assert_eq!(bound.lft, Time::MAX);
    }

    #[test]
    fn prm_bound_breaks_execution_ties_by_task_id() {
        let jobs = [job(1, 10, 0, 2, 0), job(0, 12, 0, 2, 0)];
        let bound = Policy::PRm.critical_bound(&slots(&jobs));
        assert_eq!(bound.job.unwrap().task_id, 0);
    }

    #[test]
    fn cp_bound_picks_earliest_deadline() {
        let jobs = [job(0, 10, 0, 2, 3), job(1, 7, 0, 3, 5)];
        let bound = Policy::Cp.critical_bound(&slots(&jobs));
        assert_eq!(bound.job.unwrap().task_id, 1);
        assert_eq!(bound.lft, 4);
    }

    #[test]
    fn cw_bound_restarts_on_undercutting_deadline() {
        // Walk order: A (d=10, C=2) then B (d=7, C=3).
        // A: 10 < MAX  → boundary = 8
        // B: 7 < 8     → boundary = 7 − 3 = 4
        let jobs = [job(0, 10, 0, 2, 1), job(1, 7, 0, 3, 1)];
        let bound = Policy::Cw.critical_bound(&slots(&jobs));
        assert_eq!(bound.job.unwrap().task_id, 1);
        assert_eq!(bound.lft, 4);
    }

    #[test]
    fn cw_bound_stacks_overlapping_deadlines() {
        // Walk order: A (d=10, C=2) then B (d=9, C=3).
        // A: 10 < MAX  → boundary = 8
        // B: 9 ≥ 8     → boundary = 8 − 3 = 5
        let jobs = [job(0, 10, 0, 2, 1), job(1, 9, 0, 3, 1)];
        let bound = Policy::Cw.critical_bound(&slots(&jobs));
        assert_eq!(bound.job.unwrap().task_id, 1);
        assert_eq!(bound.lft, 5);
    }

    // ── selection ─────────────────────────────────────────────────────────────

    #[test]
    fn edffp_selects_least_under_base_order() {
        let a = fixed(job(0, 10, 0, 2, 1));
        let b = fixed(job(1, 5, 0, 2, 1)); // earlier deadline, same priority
        let c = fixed(job(2, 3, 0, 2, 2)); // earliest deadline but worse priority
        let picked = Policy::EdfFp
            .select(0, &[Some(&a), Some(&b), Some(&c)])
            .unwrap();
        assert_eq!(picked.job.task_id, 1);
    }

    #[test]
    fn unreleased_jobs_are_not_selected() {
        let a = fixed(job(0, 10, 5, 2, 1));
        assert!(Policy::EdfFp.select(4, &[Some(&a)]).is_none());
        assert!(Policy::EdfFp.select(5, &[Some(&a)]).is_some());
    }

    #[test]
    fn empty_slot_set_selects_nothing() {
        for p in Policy::ALL {
            assert!(p.select(0, &[None, None]).is_none());
        }
    }

    #[test]
    fn prm_excludes_jobs_that_endanger_the_critical_job() {
        // Critical: task 0, priority 0, d=10, C=2 → LFT = 8.
        // Task 1 (C=5) fits at t=0 (0+5 ≤ 8) but not at t=4 (4+5 > 8).
        let critical = fixed(job(0, 10, 6, 2, 0));
        let long = fixed(job(1, 30, 0, 5, 1));

        let at0 = Policy::PRm.select(0, &[Some(&critical), Some(&long)]).unwrap();
        assert_eq!(at0.job.task_id, 1, "critical not yet released at t=0");

        // At t=4 the long job is excluded and the critical job is still
        // unreleased: nothing runs.
        assert!(Policy::PRm.select(4, &[Some(&critical), Some(&long)]).is_none());

        // Once released the critical job itself is exempt from the bound.
        let at6 = Policy::PRm.select(6, &[Some(&critical), Some(&long)]).unwrap();
        assert_eq!(at6.job.task_id, 0);
    }

    #[test]
    fn cp_excludes_jobs_that_endanger_the_earliest_deadline() {
        // Critical: task 1, d=7, C=3 → LFT = 4.
        let tight = fixed(job(1, 7, 5, 3, 1));
        let long = fixed(job(0, 30, 0, 5, 1));
        // 0 + 5 > 4 → the long job may not start even though it is released.
        assert!(Policy::Cp.select(0, &[Some(&long), Some(&tight)]).is_none());
    }

    #[test]
    fn cw_allows_jobs_inside_the_window() {
        // A (d=10, C=2), B (d=7, C=3) → LFT = 4 (critical = B).
        let a = fixed(job(0, 10, 0, 2, 1));
        let b = fixed(job(1, 7, 0, 3, 1));
        // A fits: 0 + 2 ≤ 4.  Base order picks B (earlier deadline).
        let picked = Policy::Cw.select(0, &[Some(&a), Some(&b)]).unwrap();
        assert_eq!(picked.job.task_id, 1);

        // With B unreleased, A still fits and runs.
        let b_late = fixed(job(1, 7, 3, 3, 1));
        let picked = Policy::Cw.select(0, &[Some(&a), Some(&b_late)]).unwrap();
        assert_eq!(picked.job.task_id, 0);
    }
}
