/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Graphviz export of an analyzed schedule graph.
//!
//! Intended for eyeballing small graphs: states show their interval and
//! progress vector, edges show the job whose execution the transition
//! represents, and deadline-missing states are drawn in red.  Meaningful
//! output requires a graph built with [`AnalysisMode::FullGraph`]; a stopped
//! graph renders too, just truncated at the missing level.
//!
//! [`AnalysisMode::FullGraph`]: super::AnalysisMode::FullGraph

use std::io::{self, Write};

use super::{Node, ScheduleGraph};
use crate::task::EtJob;

/// Render `graph` as a Graphviz `digraph`.
pub fn write_dot<W: Write>(graph: &ScheduleGraph, out: &mut W) -> io::Result<()> {
    writeln!(out, "digraph schedule_graph {{")?;
    for node in graph.nodes() {
        let color = if node.deadline_miss { ",color=Red" } else { "" };
        writeln!(
            out,
            "    S{}[label=\"S{}: [{}, {}]\\n{:?}\"{}]",
            node.id, node.id, node.min, node.max, node.progress, color
        )?;
    }
    for node in graph.nodes() {
        for &child_id in &node.children {
            let child = &graph.nodes()[child_id];
            let job = transition_job(graph, node, child);
            writeln!(
                out,
                "    S{} -> S{}[label=\"{}\", fontsize=6]",
                node.id,
                child.id,
                edge_label(job)
            )?;
        }
    }
    writeln!(out, "}}")
}

/// Convenience wrapper producing an in-memory DOT string.
pub fn to_dot(graph: &ScheduleGraph) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec<u8> cannot fail.
    let _ = write_dot(graph, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// The job run on the edge `parent -> child`: the one task whose progress
/// differs, at the parent's repetition index.
fn transition_job<'a>(graph: &'a ScheduleGraph, parent: &Node, child: &Node) -> &'a EtJob {
    let task = parent
        .progress
        .iter()
        .zip(&child.progress)
        .position(|(a, b)| a != b)
        .unwrap_or(0);
    &graph.jobs()[task][parent.progress[task] as usize]
}

fn edge_label(job: &EtJob) -> String {
    format!(
        "T{} J{}\\nD={}\\nR={}|{}\\nC={}|{}\\nP={}\\n",
        job.task_id,
        job.repetition,
        job.deadline,
        job.release_min,
        job.release_max,
        job.execution_min,
        job.execution_max,
        job.priority
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────
