/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Brute-force schedulability check by exhaustive simulation.
//!
//! Every combination of concrete release and execution values inside the
//! jobs' windows is enumerated and simulated under the policy's concrete-time
//! selection rule ([`Policy::select`]).  The task set is schedulable iff no
//! combination misses a deadline.
//!
//! The combination count is the product of all window widths, so this is only
//! viable for small instances.  Its value is as an independent oracle: the
//! schedule-graph engine reaches the same verdict through interval abstraction
//! and state merging, and the two are cross-checked in the tests here.

use tracing::trace;

use crate::policy::Policy;
use crate::task::{et_jobs_by_task, EtJob, EtTask, FixedJob, Time};

/// Exhaustively check `jobs` (per task, repetition order) under `policy`.
///
/// Returns `false` as soon as one realization misses a deadline.
pub fn brute_force(jobs: &[Vec<EtJob>], policy: Policy) -> bool {
    // task_ranges[i] is task i's slice of the flattened job list.
    let mut task_ranges = Vec::with_capacity(jobs.len());
    let mut flat = Vec::new();
    for js in jobs {
        let start = flat.len();
        flat.extend(js.iter().cloned().map(FixedJob::pessimistic));
        task_ranges.push((start, flat.len()));
    }
    enumerate(&mut flat, 0, &task_ranges, policy)
}

/// Materialize the tasks' jobs up to `hyperperiod` and brute-force them.
pub fn brute_force_tasks(tasks: &[EtTask], hyperperiod: Time, policy: Policy) -> bool {
    brute_force(&et_jobs_by_task(tasks, hyperperiod), policy)
}

/// Walk every realization of jobs `idx..`, pessimistic corner first.
fn enumerate(
    fixed: &mut [FixedJob],
    idx: usize,
    task_ranges: &[(usize, usize)],
    policy: Policy,
) -> bool {
    if idx == fixed.len() {
        return simulate(fixed, task_ranges, policy);
    }
    let (r_min, r_max) = (fixed[idx].job.release_min, fixed[idx].job.release_max);
    let (e_min, e_max) = (fixed[idx].job.execution_min, fixed[idx].job.execution_max);
    for release in (r_min..=r_max).rev() {
        for execution in (e_min..=e_max).rev() {
            fixed[idx].release = release;
            fixed[idx].execution = execution;
            if !enumerate(fixed, idx + 1, task_ranges, policy) {
                return false;
            }
        }
    }
    true
}

/// Run one concrete realization to completion.
///
/// Non-preemptive: the selected job runs to its full execution value.  When
/// nothing is eligible the clock jumps to the next release; a released job
/// that stays blocked with no release left to wait for counts as a miss.
fn simulate(fixed: &[FixedJob], task_ranges: &[(usize, usize)], policy: Policy) -> bool {
    let mut next: Vec<usize> = task_ranges.iter().map(|&(start, _)| start).collect();
    let mut remaining = fixed.len();
    let mut t: Time = 0;

    while remaining > 0 {
        let slots: Vec<Option<&FixedJob>> = task_ranges
            .iter()
            .zip(&next)
            .map(|(&(_, end), &n)| (n < end).then(|| &fixed[n]))
            .collect();

        match policy.select(t, &slots) {
            Some(job) => {
                if t + job.execution > job.job.deadline {
                    trace!(
                        task = job.job.task_id,
                        repetition = job.job.repetition,
                        start = t,
                        "deadline miss"
                    );
                    return false;
                }
                t += job.execution;
                next[job.job.task_id] += 1;
                remaining -= 1;
            }
            None => {
                let Some(wake) = slots
                    .iter()
                    .flatten()
                    .map(|j| j.release)
                    .filter(|&r| r > t)
                    .min()
                else {
                    return false;
                };
                t = wake;
            }
        }
    }
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────
