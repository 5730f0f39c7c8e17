/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Start-time placement search for time-triggered tasks.
//!
//! A mixed instance becomes analyzable by the ET engine once every TT job is
//! pinned to a concrete start time: a pinned job is just an ET job with a
//! degenerate release window and a deadline tightened to `start + execution`.
//! This module searches the space of such placements by backtracking, asking
//! the schedule graph at every complete placement whether the ET tasks still
//! fit around it.
//!
//! Placement candidates are pruned with an [`IntervalTree`] holding the
//! intervals already reserved by pinned jobs: overlapping TT jobs can never
//! both run non-preemptively, so overlapping placements are skipped without
//! recursing.  Two search variants exist:
//!
//! * *with jitter* — each TT job is placed independently inside its own
//!   release-to-deadline window;
//! * *without jitter* — one offset is chosen per TT task and every repetition
//!   starts at `offset + n × period`.
//!
//! Exhaustive placement search is exponential, so a run can be cancelled
//! cooperatively through a shared flag.  A cancelled search stops committing
//! graph runs and reports the instance schedulable; that verdict is
//! *unverified* and callers surface it as such.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::graph::{AnalysisMode, ScheduleGraph};
use crate::interval_tree::IntervalTree;
use crate::policy::Policy;
use crate::task::{
    et_jobs_by_task, tt_jobs_by_task, EtJob, EtTask, Time, TtTask, CRITICAL_PRIORITY,
};

/// Backtracking placement search over one mixed instance.
pub struct TtPlacement {
    policy: Policy,
    /// TT-derived jobs first (task ids `0..tt_count`), then the ET jobs.
    /// TT entries are mutated in place while backtracking and restored on
    /// frame exit, so outside a search this always holds the original jobs.
    jobs: Vec<Vec<EtJob>>,
    tt_count: usize,
    reserved: IntervalTree,
    cancel: Arc<AtomicBool>,
    graph_runs: u64,
    starts: Option<Vec<Vec<Time>>>,
}

impl TtPlacement {
    /// Materialize all jobs of the instance up to `hyperperiod`.
    ///
    /// Task ids must be dense with TT tasks first, the layout the instance
    /// loader produces.
    pub fn new(
        tt_tasks: &[TtTask],
        et_tasks: &[EtTask],
        hyperperiod: Time,
        policy: Policy,
    ) -> Self {
        debug_assert!(tt_tasks.iter().enumerate().all(|(i, t)| t.id == i));
        debug_assert!(et_tasks
            .iter()
            .enumerate()
            .all(|(i, t)| t.id == tt_tasks.len() + i));

        let mut jobs: Vec<Vec<EtJob>> = tt_jobs_by_task(tt_tasks, hyperperiod)
            .iter()
            .map(|js| {
                js.iter()
                    .map(|j| EtJob::from_tt(j, CRITICAL_PRIORITY))
                    .collect()
            })
            .collect();
        jobs.extend(et_jobs_by_task(et_tasks, hyperperiod));

        Self {
            policy,
            jobs,
            tt_count: tt_tasks.len(),
            reserved: IntervalTree::new(),
            cancel: Arc::new(AtomicBool::new(false)),
            graph_runs: 0,
            starts: None,
        }
    }

    /// Shared cancellation flag; set it from another thread (or a timer) to
    /// abort the search cooperatively.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    /// Schedule-graph analyses committed by the last search.
    pub fn graph_runs(&self) -> u64 {
        self.graph_runs
    }

    /// Start times of the successful placement, `starts[i][n]` being the
    /// start of repetition `n` of TT task `i`.  `None` until a search
    /// succeeds with an actual (non-cancelled) verdict.
    pub fn start_times(&self) -> Option<&[Vec<Time>]> {
        self.starts.as_deref()
    }

    /// Search with per-job jitter: every TT job is placed independently.
    pub fn search_with_jitter(&mut self) -> bool {
        self.begin();
        let ok = self.place_job(0, 0);
        self.finish(ok)
    }

    /// Search without jitter: one offset per TT task, repetitions locked to
    /// `offset + n × period`.
    pub fn search_without_jitter(&mut self) -> bool {
        self.begin();
        let ok = self.place_task(0);
        self.finish(ok)
    }

    fn begin(&mut self) {
        self.graph_runs = 0;
        self.starts = None;
    }

    fn finish(&mut self, ok: bool) -> bool {
        if self.cancelled() {
            warn!(
                graph_runs = self.graph_runs,
                "placement search cancelled; schedulable verdict is unverified"
            );
        } else {
            debug!(graph_runs = self.graph_runs, schedulable = ok, "placement search done");
        }
        ok
    }

    // ── With-jitter recursion ─────────────────────────────────────────────────

    fn place_job(&mut self, task: usize, rep: usize) -> bool {
        if task == self.tt_count {
            return self.check_placement();
        }
        if rep == self.jobs[task].len() {
            return self.place_job(task + 1, 0);
        }

        let og_release = self.jobs[task][rep].release_min;
        let og_deadline = self.jobs[task][rep].deadline;
        let execution = self.jobs[task][rep].execution_max;

        for release in og_release..=og_deadline - execution {
            let deadline = release + execution;
            if self.reserved.intersects(release, deadline - 1) {
                continue;
            }
            self.pin(task, rep, release, deadline);
            self.reserved.add(release, deadline - 1);
            let ok = self.place_job(task, rep + 1);
            self.reserved.remove(release, deadline - 1);
            if ok {
                self.pin(task, rep, og_release, og_deadline);
                return true;
            }
        }
        self.pin(task, rep, og_release, og_deadline);
        false
    }

    // ── No-jitter recursion ───────────────────────────────────────────────────

    fn place_task(&mut self, task: usize) -> bool {
        if task == self.tt_count {
            return self.check_placement();
        }
        let reps = self.jobs[task].len();
        if reps == 0 {
            return self.place_task(task + 1);
        }

        let og: Vec<(Time, Time)> = self.jobs[task]
            .iter()
            .map(|j| (j.release_min, j.deadline))
            .collect();
        let execution = self.jobs[task][0].execution_max;
        let period = self.jobs[task][0].period;
        let (first_release, first_deadline) = og[0];

        'offsets: for offset in first_release..=first_deadline - execution {
            for r in 0..reps {
                let release = offset + r as Time * period;
                if self.reserved.intersects(release, release + execution - 1) {
                    continue 'offsets;
                }
            }
            for r in 0..reps {
                let release = offset + r as Time * period;
                self.pin(task, r, release, release + execution);
                self.reserved.add(release, release + execution - 1);
            }
            let ok = self.place_task(task + 1);
            for r in 0..reps {
                let release = offset + r as Time * period;
                self.reserved.remove(release, release + execution - 1);
            }
            if ok {
                self.restore(task, &og);
                return true;
            }
        }
        self.restore(task, &og);
        false
    }

    // ── Shared pieces ─────────────────────────────────────────────────────────

    fn pin(&mut self, task: usize, rep: usize, release: Time, deadline: Time) {
        let job = &mut self.jobs[task][rep];
        job.release_min = release;
        job.release_max = release;
        job.deadline = deadline;
    }

    fn restore(&mut self, task: usize, og: &[(Time, Time)]) {
        for (rep, &(release, deadline)) in og.iter().enumerate() {
            self.pin(task, rep, release, deadline);
        }
    }

    /// Every TT job is pinned: ask the graph whether the ET side still fits.
    fn check_placement(&mut self) -> bool {
        if self.cancelled() {
            return true;
        }
        self.graph_runs += 1;
        let mut graph = ScheduleGraph::from_jobs(self.jobs.clone());
        let ok = graph.analyze(self.policy, AnalysisMode::StopAtFirstMiss);
        if ok {
            self.starts = Some(
                self.jobs[..self.tt_count]
                    .iter()
                    .map(|js| js.iter().map(|j| j.release_max).collect())
                    .collect(),
            );
        }
        ok
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
