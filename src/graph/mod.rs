/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Schedule-graph schedulability analysis.
//!
//! The engine explores every scheduling decision a policy could make over one
//! hyperperiod of an event-triggered task set with uncertain timing.  A graph
//! node is an abstract system state: a *progress vector* (how many jobs of
//! each task have finished) plus a closed interval `[min, max]` bounding the
//! finish time of the last job run.  The root is "nothing done, time 0"; each
//! child runs exactly one more job, so the graph is a DAG layered by total
//! progress.
//!
//! Expanding a node asks the policy which jobs could be scheduled *first*
//! from that state, and over which start-time range.  Release jitter makes
//! this set-valued: a job that is only *possibly* released may or may not
//! beat a *certainly* released competitor, and each outcome becomes its own
//! child.  After a level is fully expanded, children with equal progress
//! vectors and overlapping intervals are merged (interval hull, OR of miss
//! flags); this merge is what keeps the graph from exploding and it never
//! loses a reachable state.
//!
//! A child whose latest finish exceeds its job's deadline carries a deadline
//! miss.  [`AnalysisMode::StopAtFirstMiss`] answers the yes/no question as
//! early as possible; [`AnalysisMode::FullGraph`] keeps building so the
//! complete graph can be exported and inspected.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`].  Merged
//! children are created in lexicographic progress-vector order, so node ids
//! are deterministic for a given task set, policy and mode.

pub mod export;

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use tracing::{debug, trace};

use crate::policy::Policy;
use crate::task::{et_jobs_by_task, EtJob, EtTask, Time};

// ── Graph types ───────────────────────────────────────────────────────────────

/// Handle to a node in the graph arena.
pub type NodeId = usize;

/// How far to build the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    /// Stop as soon as one level contains a deadline miss.
    StopAtFirstMiss,
    /// Build the whole graph regardless of misses.
    FullGraph,
}

/// One abstract system state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Earliest finish time of the job run on the way into this state.
    pub min: Time,
    /// Latest finish time of that job.
    pub max: Time,
    /// Finished-job count per task, indexed by task id.
    pub progress: Vec<u32>,
    /// The job leading here can finish past its deadline.
    pub deadline_miss: bool,
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
}

/// A child emitted by node expansion, before merging.
struct PendingChild {
    min: Time,
    max: Time,
    progress: Vec<u32>,
    miss: bool,
    parents: Vec<NodeId>,
}

/// Release events relevant to one expansion, bucketed per time point.
#[derive(Default)]
struct Event<'a> {
    /// Jobs whose release becomes certain at this time.
    new_cr: Vec<&'a EtJob>,
    /// Jobs whose release becomes possible at this time.
    new_pr: Vec<&'a EtJob>,
    /// Some job stops fitting in front of the critical job at this time.
    new_cm: bool,
}

// ── ScheduleGraph ─────────────────────────────────────────────────────────────

/// The analysis graph over one materialized job set.
#[derive(Debug, Clone)]
pub struct ScheduleGraph {
    /// Jobs per task, indexed by task id, ordered by repetition.
    jobs: Vec<Vec<EtJob>>,
    nodes: Vec<Node>,
    deadline_miss_found: bool,
}

impl ScheduleGraph {
    /// Build over the jobs of `tasks` materialized up to `hyperperiod`.
    pub fn from_et_tasks(tasks: &[EtTask], hyperperiod: Time) -> Self {
        Self::from_jobs(et_jobs_by_task(tasks, hyperperiod))
    }

    /// Build over an explicit per-task job table.  `jobs[i]` must hold the
    /// jobs of task id `i` in repetition order.
    pub fn from_jobs(jobs: Vec<Vec<EtJob>>) -> Self {
        debug_assert!(jobs
            .iter()
            .enumerate()
            .all(|(i, js)| js.iter().all(|j| j.task_id == i)));
        Self {
            jobs,
            nodes: Vec::new(),
            deadline_miss_found: false,
        }
    }

    pub fn jobs(&self) -> &[Vec<EtJob>] {
        &self.jobs
    }

    /// Arena of all nodes built by the last [`analyze`](Self::analyze) call.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn deadline_miss_found(&self) -> bool {
        self.deadline_miss_found
    }

    /// Run the analysis under `policy`.  Returns `true` iff no reachable
    /// state misses a deadline (the task set is schedulable).
    ///
    /// Rebuilds the graph from scratch, so the same instance can be analyzed
    /// repeatedly under different policies or modes.
    pub fn analyze(&mut self, policy: Policy, mode: AnalysisMode) -> bool {
        self.nodes.clear();
        self.deadline_miss_found = false;
        self.nodes.push(Node {
            id: 0,
            min: 0,
            max: 0,
            progress: vec![0; self.jobs.len()],
            deadline_miss: false,
            parents: Vec::new(),
            children: Vec::new(),
        });

        let mut frontier: Vec<NodeId> = vec![0];
        let mut level = 0usize;
        while !frontier.is_empty() {
            // Group this level's children by progress vector; the BTreeMap
            // also fixes the id assignment order.
            let mut groups: BTreeMap<Vec<u32>, Vec<PendingChild>> = BTreeMap::new();
            for &id in &frontier {
                let pending = match policy {
                    Policy::EdfFp => self.expand_edf_fp(id),
                    _ => self.expand_bounded(id, policy),
                };
                for child in pending {
                    groups.entry(child.progress.clone()).or_default().push(child);
                }
            }

            let mut next = Vec::new();
            for (_, group) in groups {
                for merged in merge_group(group) {
                    let id = self.nodes.len();
                    if merged.miss {
                        self.deadline_miss_found = true;
                    }
                    for &p in &merged.parents {
                        self.nodes[p].children.push(id);
                    }
                    self.nodes.push(Node {
                        id,
                        min: merged.min,
                        max: merged.max,
                        progress: merged.progress,
                        deadline_miss: merged.miss,
                        parents: merged.parents,
                        children: Vec::new(),
                    });
                    next.push(id);
                }
            }

            level += 1;
            debug!(
                level,
                expanded = frontier.len(),
                created = next.len(),
                miss = self.deadline_miss_found,
                "level built"
            );

            if self.deadline_miss_found && mode == AnalysisMode::StopAtFirstMiss {
                return false;
            }
            frontier = next;
        }
        !self.deadline_miss_found
    }

    // ── Expansion: EDF-FP fast path ───────────────────────────────────────────

    /// EDF-FP needs no critical bound, so expansion reduces to a two-pointer
    /// sweep over the next jobs' release events: track the best certainly
    /// released job (`ce`) and the possibly released jobs that could still
    /// beat it (`pe`), emitting a child whenever a candidate's window to run
    /// first closes.
    fn expand_edf_fp(&self, node_id: NodeId) -> Vec<PendingChild> {
        let node = &self.nodes[node_id];
        let next: Vec<&EtJob> = self
            .jobs
            .iter()
            .zip(&node.progress)
            .filter_map(|(js, &p)| js.get(p as usize))
            .collect();
        let Some(earliest_cr) = next.iter().map(|j| j.release_max).min() else {
            return Vec::new();
        };
        // No job can be forced to wait past the first certain release, so
        // nothing releasing after this horizon can run first.
        let extended_max = earliest_cr.max(node.max);

        let mut by_cr: Vec<&EtJob> = next
            .into_iter()
            .filter(|j| j.release_min <= extended_max)
            .collect();
        by_cr.sort_by_key(|j| j.release_max);
        let mut by_pr = by_cr.clone();
        by_pr.sort_by_key(|j| j.release_min);

        let mut children = Vec::new();
        let mut ce: Option<&EtJob> = None;
        let mut pe: Vec<&EtJob> = Vec::new();
        let (mut i, mut j) = (0usize, 0usize);
        loop {
            let next_cr = by_cr
                .get(i)
                .map_or(Time::MAX, |x| node.min.max(x.release_max));
            let next_pr = by_pr
                .get(j)
                .map_or(Time::MAX, |x| node.min.max(x.release_min));
            let t = next_cr.min(next_pr).min(extended_max + 1);

            if t > extended_max {
                if let Some(c) = ce {
                    children.push(self.pending(node, c, node.min.max(c.release_min), t - 1));
                }
                for p in &pe {
                    children.push(self.pending(node, p, node.min.max(p.release_min), t - 1));
                }
                break;
            }

            // Certain releases at t: only the best of them can displace ce.
            let mut new_ce: Option<&EtJob> = None;
            while i < by_cr.len() && by_cr[i].release_max <= t {
                let cand = by_cr[i];
                if new_ce.is_none_or(|b| cand < b) {
                    new_ce = Some(cand);
                }
                i += 1;
            }
            if let (Some(c), Some(n)) = (ce, new_ce) {
                if c < n {
                    new_ce = None;
                }
            }
            if let Some(n) = new_ce {
                if let Some(c) = ce {
                    children.push(self.pending(node, c, node.min.max(c.release_min), t - 1));
                }
                ce = Some(n);
                // Candidates no better than the new ce can no longer run
                // first; their window closed at t - 1.
                let mut kept = Vec::with_capacity(pe.len());
                for p in pe {
                    if p.same_slot(n) {
                        continue;
                    }
                    if n < p {
                        children.push(self.pending(node, p, node.min.max(p.release_min), t - 1));
                    } else {
                        kept.push(p);
                    }
                }
                pe = kept;
            }

            // Possible releases at t: only candidates that beat ce matter.
            while j < by_pr.len() && by_pr[j].release_min <= t {
                let cand = by_pr[j];
                if ce.is_none_or(|c| cand < c) {
                    pe.push(cand);
                }
                j += 1;
            }
        }
        trace!(node = node_id, children = children.len(), "edf-fp expansion");
        children
    }

    // ── Expansion: bounded policies ───────────────────────────────────────────

    /// P-RM, CP and CW share this path.  The policy's critical bound prunes
    /// which jobs may run first at all; within the survivors an event sweep
    /// tracks the best certainly released job (a min-heap over the base
    /// order) and the start window of every possibly released contender.
    fn expand_bounded(&self, node_id: NodeId, policy: Policy) -> Vec<PendingChild> {
        let node = &self.nodes[node_id];
        let slots: Vec<Option<&EtJob>> = self
            .jobs
            .iter()
            .zip(&node.progress)
            .map(|(js, &p)| js.get(p as usize))
            .collect();
        let applicable: Vec<&EtJob> = slots.iter().flatten().copied().collect();
        if applicable.is_empty() {
            return Vec::new();
        }

        let bound = policy.critical_bound(&slots);
        let (c_job, c_time) = match bound.job {
            Some(c) => (c, bound.lft),
            // P-RM without a priority-0 job imposes no bound; anchor the
            // bookkeeping on an arbitrary applicable job.
            None => (applicable[0], Time::MAX),
        };

        let fits = |j: &EtJob, from: Time| {
            j.same_slot(c_job) || from.saturating_add(j.execution_max) <= c_time
        };

        // Horizon: the first moment some runnable job is certainly released.
        let earliest_cr = applicable
            .iter()
            .filter(|j| fits(j, j.release_max.max(node.min)))
            .map(|j| j.release_max)
            .min()
            .unwrap_or(c_job.release_max);
        let actual_max = if earliest_cr > node.max {
            earliest_cr
        } else {
            let mut best = c_job;
            for &j in &applicable {
                if !j.same_slot(c_job)
                    && fits(j, j.release_max.max(node.max))
                    && j.release_max < best.release_max
                {
                    best = j;
                }
            }
            node.max.max(best.release_max)
        };

        let mut events: BTreeMap<Time, Event<'_>> = BTreeMap::new();
        for &jb in &applicable {
            let is_c = jb.same_slot(c_job);
            let actual_pr = node.min.max(jb.release_min);
            let actual_cr = node.min.max(jb.release_max);
            if !is_c && actual_pr.saturating_add(jb.execution_max) > c_time {
                continue;
            }
            if actual_pr != actual_cr && actual_pr <= actual_max {
                events.entry(actual_pr).or_default().new_pr.push(jb);
            }
            if actual_cr <= actual_max
                && (is_c || jb.release_max.saturating_add(jb.execution_max) <= c_time)
            {
                events.entry(actual_cr).or_default().new_cr.push(jb);
            }
            if !is_c {
                let cm = node
                    .min
                    .max(c_time.saturating_sub(jb.execution_max).saturating_add(1));
                if cm <= actual_max {
                    events.entry(cm).or_default().new_cm = true;
                }
            }
        }

        let mut children = Vec::new();
        let mut heap: BinaryHeap<Reverse<&EtJob>> = BinaryHeap::new();
        let mut ce_start: Time = 0;
        let mut pr_jobs: Vec<&EtJob> = Vec::new();
        let mut pr_start: Vec<Option<Time>> = Vec::new();

        for (&t, ev) in &events {
            let previous_best: Option<&EtJob> = heap.peek().map(|r| r.0);

            if ev.new_cm {
                // Starting at t would now push the critical job past its
                // boundary: retire every contender this disqualifies.
                while let Some(&Reverse(top)) = heap.peek() {
                    if fits(top, t) {
                        break;
                    }
                    heap.pop();
                }
                for k in 0..pr_jobs.len() {
                    if !fits(pr_jobs[k], t) {
                        if let Some(s) = pr_start[k].take() {
                            children.push(self.pending(node, pr_jobs[k], s, t - 1));
                        }
                    }
                }
            }

            for &jb in &ev.new_cr {
                heap.push(Reverse(jb));
            }
            let new_best = heap.peek().map(|r| r.0);

            // A possible release turning certain either carries its start
            // window over (it is now the best) or closes it.
            let mut carried_start: Option<Time> = None;
            for &jb in &ev.new_cr {
                if let Some(k) = pr_jobs.iter().position(|p| p.same_slot(jb)) {
                    if new_best.is_some_and(|b| b.same_slot(jb)) {
                        carried_start = pr_start[k];
                    } else if let Some(s) = pr_start[k] {
                        children.push(self.pending(node, jb, s, t - 1));
                    }
                    pr_jobs.remove(k);
                    pr_start.remove(k);
                }
            }
            let new_best_start = carried_start.unwrap_or(t);

            let changed = match (previous_best, new_best) {
                (Some(a), Some(b)) => !a.same_slot(b),
                (None, None) => false,
                _ => true,
            };
            if changed {
                if let Some(prev) = previous_best {
                    children.push(self.pending(node, prev, ce_start, t - 1));
                }
                ce_start = new_best_start;
                // Re-judge every tracked contender against the new best.
                for k in 0..pr_jobs.len() {
                    let p = pr_jobs[k];
                    let active = new_best.is_none_or(|b| p < b) && fits(p, t);
                    match (pr_start[k], active) {
                        (Some(s), false) => {
                            children.push(self.pending(node, p, s, t - 1));
                            pr_start[k] = None;
                        }
                        (None, true) => pr_start[k] = Some(t),
                        _ => {}
                    }
                }
            }

            for &jb in &ev.new_pr {
                let active = new_best.is_none_or(|b| jb < b);
                pr_jobs.push(jb);
                pr_start.push(active.then_some(t));
            }
        }

        // Horizon reached: every surviving candidate's window closes here.
        if let Some(&Reverse(best)) = heap.peek() {
            children.push(self.pending(node, best, ce_start, actual_max));
        }
        for k in 0..pr_jobs.len() {
            if let Some(s) = pr_start[k] {
                children.push(self.pending(node, pr_jobs[k], s, actual_max));
            }
        }
        trace!(node = node_id, children = children.len(), "bounded expansion");
        children
    }

    /// Child state for `job` running first, starting anywhere in
    /// `[earliest, latest]`.
    fn pending(&self, parent: &Node, job: &EtJob, earliest: Time, latest: Time) -> PendingChild {
        let finish_max = latest.saturating_add(job.execution_max);
        let mut progress = parent.progress.clone();
        progress[job.task_id] += 1;
        PendingChild {
            min: earliest + job.execution_min,
            max: finish_max,
            progress,
            miss: finish_max > job.deadline,
            parents: vec![parent.id],
        }
    }
}

// ── Merging ───────────────────────────────────────────────────────────────────

/// Coalesce pending children with equal progress vectors: sorted by interval
/// start, any two whose intervals touch collapse into their hull.  Miss flags
/// and parent sets are unioned.
fn merge_group(mut group: Vec<PendingChild>) -> Vec<PendingChild> {
    group.sort_by_key(|c| c.min);
    let mut merged: Vec<PendingChild> = Vec::with_capacity(group.len());
    for child in group {
        match merged.last_mut() {
            Some(last) if last.max >= child.min => {
                last.max = last.max.max(child.max);
                last.miss |= child.miss;
                last.parents.extend(child.parents);
            }
            _ => merged.push(child),
        }
    }
    merged
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperperiod::hyperperiod;

    fn analyze_all(tasks: &[EtTask], mode: AnalysisMode) -> Vec<(Policy, bool)> {
        let h = hyperperiod(&[], tasks).unwrap();
        Policy::ALL
            .iter()
            .map(|&p| {
                let mut graph = ScheduleGraph::from_et_tasks(tasks, h);
                (p, graph.analyze(p, mode))
            })
            .collect()
    }

    // ── degenerate instances ──────────────────────────────────────────────────

    #[test]
    fn empty_job_set_is_schedulable() {
        let mut graph = ScheduleGraph::from_jobs(Vec::new());
        for p in Policy::ALL {
            assert!(graph.analyze(p, AnalysisMode::FullGraph));
            assert_eq!(graph.nodes().len(), 1, "root only");
        }
    }

    #[test]
    fn single_task_fitting_its_deadline() {
        let tasks = vec![EtTask::new(0, 10, 5, 0, 0, 4, 4, 1).unwrap()];
        for (p, ok) in analyze_all(&tasks, AnalysisMode::FullGraph) {
            assert!(ok, "{p} must accept C ≤ D");
        }
    }

    #[test]
    fn single_task_overrunning_its_deadline() {
        let tasks = vec![EtTask::new(0, 10, 5, 0, 0, 6, 6, 1).unwrap()];
        for (p, ok) in analyze_all(&tasks, AnalysisMode::StopAtFirstMiss) {
            assert!(!ok, "{p} must reject C > D");
        }
    }

    #[test]
    fn two_harmonic_tasks_fit_under_every_policy() {
        // U = 3/10 + 2/5 = 0.7 with aligned certain releases.
        let tasks = vec![
            EtTask::new(0, 10, 10, 0, 0, 3, 3, 1).unwrap(),
            EtTask::new(1, 5, 5, 0, 0, 2, 2, 1).unwrap(),
        ];
        for (p, ok) in analyze_all(&tasks, AnalysisMode::FullGraph) {
            assert!(ok, "{p} verdict");
        }
    }

    #[test]
    fn overloaded_pair_misses_under_every_policy() {
        // Two jobs of 3 units both due at 4: infeasible for any policy.
        let tasks = vec![
            EtTask::new(0, 4, 4, 0, 0, 3, 3, 1).unwrap(),
            EtTask::new(1, 4, 4, 0, 0, 3, 3, 1).unwrap(),
        ];
        for (p, ok) in analyze_all(&tasks, AnalysisMode::FullGraph) {
            assert!(!ok, "{p} verdict");
        }
    }

    // ── interval propagation ──────────────────────────────────────────────────

    #[test]
    fn jittery_single_job_produces_its_finish_window() {
        // Release in [0, 1], execution in [1, 2]: finish in [1, 3].
        let tasks = vec![EtTask::new(0, 4, 4, 0, 1, 1, 2, 1).unwrap()];
        let mut graph = ScheduleGraph::from_et_tasks(&tasks, 4);
        assert!(graph.analyze(Policy::EdfFp, AnalysisMode::FullGraph));
        let leaf = graph
            .nodes()
            .iter()
            .find(|n| n.progress == vec![1])
            .unwrap();
        assert_eq!((leaf.min, leaf.max), (1, 3));
        assert!(!leaf.deadline_miss);
    }

    #[test]
    fn deterministic_ids_across_reruns() {
        let tasks = vec![
            EtTask::new(0, 6, 6, 0, 2, 1, 2, 1).unwrap(),
            EtTask::new(1, 3, 3, 0, 1, 1, 1, 2).unwrap(),
        ];
        let h = hyperperiod(&[], &tasks).unwrap();
        for p in Policy::ALL {
            let mut a = ScheduleGraph::from_et_tasks(&tasks, h);
            let mut b = ScheduleGraph::from_et_tasks(&tasks, h);
            a.analyze(p, AnalysisMode::FullGraph);
            b.analyze(p, AnalysisMode::FullGraph);
            assert_eq!(a.nodes(), b.nodes(), "{p} arena must be reproducible");
        }
    }

    #[test]
    fn merged_states_leave_no_overlapping_intervals() {
        let tasks = vec![
            EtTask::new(0, 8, 8, 0, 3, 1, 3, 1).unwrap(),
            EtTask::new(1, 4, 4, 0, 2, 1, 2, 1).unwrap(),
        ];
        let h = hyperperiod(&[], &tasks).unwrap();
        for p in Policy::ALL {
            let mut graph = ScheduleGraph::from_et_tasks(&tasks, h);
            graph.analyze(p, AnalysisMode::FullGraph);

            let mut by_progress: BTreeMap<&[u32], Vec<(Time, Time)>> = BTreeMap::new();
            for node in graph.nodes() {
                by_progress
                    .entry(&node.progress)
                    .or_default()
                    .push((node.min, node.max));
            }
            for (progress, mut ivs) in by_progress {
                ivs.sort();
                for w in ivs.windows(2) {
                    assert!(
                        w[0].1 < w[1].0,
                        "{p}: states {progress:?} overlap: {w:?}"
                    );
                }
            }
        }
    }

    fn child(min: Time, max: Time, miss: bool, parent: NodeId) -> PendingChild {
        PendingChild {
            min,
            max,
            progress: vec![1, 0],
            miss,
            parents: vec![parent],
        }
    }

    #[test]
    fn coalescing_takes_the_interval_hull_and_ors_miss_flags() {
        // Unsorted on purpose: [4, 9] (miss) overlaps [0, 5]; [20, 22] is
        // disjoint and must survive untouched.
        let merged = merge_group(vec![
            child(4, 9, true, 1),
            child(0, 5, false, 0),
            child(20, 22, false, 2),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!((merged[0].min, merged[0].max), (0, 9), "hull of the overlap");
        assert!(merged[0].miss, "one missing input taints the merged state");
        assert_eq!(merged[0].parents, vec![0, 1]);
        assert_eq!((merged[1].min, merged[1].max), (20, 22));
        assert!(!merged[1].miss);
        assert_eq!(merged[1].parents, vec![2]);
    }

    #[test]
    fn coalescing_chains_through_touching_intervals() {
        // [0, 3], [3, 6] and [6, 8] share endpoints pairwise and collapse
        // into one state; no flag is set anywhere, so none comes out.
        let merged = merge_group(vec![
            child(3, 6, false, 1),
            child(6, 8, false, 2),
            child(0, 3, false, 0),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!((merged[0].min, merged[0].max), (0, 8));
        assert!(!merged[0].miss);
        assert_eq!(merged[0].parents, vec![0, 1, 2]);
    }

    #[test]
    fn parent_child_links_are_mutual() {
        let tasks = vec![
            EtTask::new(0, 6, 6, 0, 1, 1, 2, 1).unwrap(),
            EtTask::new(1, 6, 6, 0, 2, 1, 2, 1).unwrap(),
        ];
        let mut graph = ScheduleGraph::from_et_tasks(&tasks, 6);
        graph.analyze(Policy::EdfFp, AnalysisMode::FullGraph);
        for node in graph.nodes() {
            for &c in &node.children {
                assert!(graph.nodes()[c].parents.contains(&node.id));
            }
            for &p in &node.parents {
                assert!(graph.nodes()[p].children.contains(&node.id));
            }
        }
    }

    // ── modes ─────────────────────────────────────────────────────────────────

    #[test]
    fn stop_mode_agrees_with_full_mode_and_builds_less() {
        let tasks = vec![
            EtTask::new(0, 4, 4, 0, 0, 3, 3, 1).unwrap(),
            EtTask::new(1, 4, 4, 0, 0, 3, 3, 1).unwrap(),
        ];
        for p in Policy::ALL {
            let mut stop = ScheduleGraph::from_et_tasks(&tasks, 4);
            let mut full = ScheduleGraph::from_et_tasks(&tasks, 4);
            assert!(!stop.analyze(p, AnalysisMode::StopAtFirstMiss));
            assert!(!full.analyze(p, AnalysisMode::FullGraph));
            assert!(stop.nodes().len() <= full.nodes().len());
            assert!(stop.deadline_miss_found());
        }
    }

    // ── policy-specific behaviour ─────────────────────────────────────────────

    #[test]
    fn prm_protects_the_critical_class_where_edf_fp_need_not() {
        // Task 0 is a tight priority-0 job releasing late; task 1 is a long
        // low-priority job released immediately.  P-RM holds task 1 back so
        // task 0 can meet d = 10 (LFT = 8); EDF-FP also succeeds here, but
        // via its priority order.  Both verdicts are positive, while the
        // graph shapes differ.
        let tasks = vec![
            EtTask::new(0, 20, 10, 6, 6, 2, 2, 0).unwrap(),
            EtTask::new(1, 20, 20, 0, 0, 5, 5, 1).unwrap(),
        ];
        for (p, ok) in analyze_all(&tasks, AnalysisMode::FullGraph) {
            assert!(ok, "{p} verdict");
        }
    }

    #[test]
    fn cp_blocks_work_that_endangers_the_earliest_deadline() {
        // Task 1's deadline-7 job (C = 2, LFT = 5) releases at 5.  Task 0's
        // 6-unit job cannot start before it without breaching the boundary,
        // so CP idles until 5, runs task 1, then task 0 at 7 — both fit.
        // EDF-FP greedily starts task 0 at 0 and task 1 misses at 8.
        let tasks = vec![
            EtTask::new(0, 16, 16, 0, 0, 6, 6, 1).unwrap(),
            EtTask::new(1, 16, 7, 5, 5, 2, 2, 1).unwrap(),
        ];
        let mut cp = ScheduleGraph::from_et_tasks(&tasks, 16);
        assert!(cp.analyze(Policy::Cp, AnalysisMode::FullGraph));
        let mut edf = ScheduleGraph::from_et_tasks(&tasks, 16);
        assert!(!edf.analyze(Policy::EdfFp, AnalysisMode::FullGraph));
    }
}
