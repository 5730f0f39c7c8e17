/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Task-instance files: loading, validation and result export.
//!
//! An instance is a YAML document with one `tasks` list.  Every record
//! carries the full window form; a priority of `0` marks a time-triggered
//! task, which must have degenerate release and execution windows:
//!
//! ```yaml
//! tasks:
//!   - id: 0
//!     period: 10
//!     release_min: 0
//!     release_max: 0
//!     execution_min: 2
//!     execution_max: 2
//!     deadline: 10
//!     priority: 0        # time-triggered
//!   - id: 1
//!     period: 5
//!     release_min: 0
//!     release_max: 1
//!     execution_min: 1
//!     execution_max: 2
//!     deadline: 5
//!     priority: 1        # event-triggered
//! ```
//!
//! The analyses index job tables by task id, so ids are reassigned densely
//! on load — TT tasks first, then ET tasks, each group in file order.  A
//! warning is logged once if the file's ids differ from the assigned ones.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::hyperperiod::{hyperperiod, HyperperiodError};
use crate::task::{EtTask, TaskError, Time, TtTask};

// ── Errors ────────────────────────────────────────────────────────────────────

/// Errors raised while loading an instance file.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to read instance file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse instance file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Task(#[from] TaskError),

    /// TT tasks are fully deterministic; a window on one is a modelling
    /// mistake, not jitter.
    #[error("time-triggered task {task}: {field} window must be a single value")]
    TtWindow { task: usize, field: &'static str },
}

// ── File format ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct InstanceFile {
    tasks: Vec<TaskRecord>,
}

#[derive(Debug, Deserialize)]
struct TaskRecord {
    id: usize,
    period: Time,
    release_min: Time,
    release_max: Time,
    execution_min: Time,
    execution_max: Time,
    deadline: Time,
    priority: i32,
}

impl TaskRecord {
    fn is_tt(&self) -> bool {
        self.priority == 0
    }
}

// ── Instance ──────────────────────────────────────────────────────────────────

/// A validated mixed task set with dense ids, TT tasks first.
#[derive(Debug, Clone)]
pub struct Instance {
    pub tt_tasks: Vec<TtTask>,
    pub et_tasks: Vec<EtTask>,
}

impl Instance {
    pub fn from_yaml_path(path: &Path) -> Result<Self, InstanceError> {
        let text = fs::read_to_string(path)?;
        let instance = Self::from_yaml_str(&text)?;
        debug!(
            path = %path.display(),
            tt = instance.tt_tasks.len(),
            et = instance.et_tasks.len(),
            "instance loaded"
        );
        Ok(instance)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, InstanceError> {
        let file: InstanceFile = serde_yaml::from_str(text)?;

        let mut tt_tasks = Vec::new();
        let mut et_tasks = Vec::new();
        let mut renumbered = false;
        let mut next_id = 0usize;

        for record in file.tasks.iter().filter(|r| r.is_tt()) {
            if record.release_min != record.release_max {
                return Err(InstanceError::TtWindow {
                    task: record.id,
                    field: "release",
                });
            }
            if record.execution_min != record.execution_max {
                return Err(InstanceError::TtWindow {
                    task: record.id,
                    field: "execution",
                });
            }
            renumbered |= record.id != next_id;
            tt_tasks.push(TtTask::new(
                next_id,
                record.period,
                record.deadline,
                record.release_min,
                record.execution_min,
            )?);
            next_id += 1;
        }
        for record in file.tasks.iter().filter(|r| !r.is_tt()) {
            renumbered |= record.id != next_id;
            et_tasks.push(EtTask::new(
                next_id,
                record.period,
                record.deadline,
                record.release_min,
                record.release_max,
                record.execution_min,
                record.execution_max,
                record.priority,
            )?);
            next_id += 1;
        }

        if renumbered {
            warn!("instance task ids reassigned densely, time-triggered tasks first");
        }
        Ok(Self { tt_tasks, et_tasks })
    }

    pub fn has_tt_tasks(&self) -> bool {
        !self.tt_tasks.is_empty()
    }

    pub fn stats(&self) -> Result<InstanceStats, HyperperiodError> {
        Ok(InstanceStats {
            tt_count: self.tt_tasks.len(),
            et_count: self.et_tasks.len(),
            tt_utilization: self.tt_tasks.iter().map(TtTask::utilization).sum(),
            et_utilization: self.et_tasks.iter().map(EtTask::utilization).sum(),
            hyperperiod: hyperperiod(&self.tt_tasks, &self.et_tasks)?,
        })
    }
}

/// Summary figures for `--info` output.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceStats {
    pub tt_count: usize,
    pub et_count: usize,
    pub tt_utilization: f64,
    /// Worst-case (maximum execution) utilization of the ET tasks.
    pub et_utilization: f64,
    pub hyperperiod: Time,
}

impl fmt::Display for InstanceStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TT tasks:       {}", self.tt_count)?;
        writeln!(f, "ET tasks:       {}", self.et_count)?;
        writeln!(f, "TT utilization: {:.3}", self.tt_utilization)?;
        writeln!(f, "ET utilization: {:.3}", self.et_utilization)?;
        write!(f, "Hyperperiod:    {}", self.hyperperiod)
    }
}

// ── Start-time export ─────────────────────────────────────────────────────────

/// Write a TT start-time table as CSV, `starts[i][n]` being the start of
/// repetition `n` of TT task `i`.
pub fn write_start_times<W: Write>(starts: &[Vec<Time>], out: &mut W) -> io::Result<()> {
    writeln!(out, "Task ID,Job repetition,Start time")?;
    for (task, task_starts) in starts.iter().enumerate() {
        for (repetition, start) in task_starts.iter().enumerate() {
            writeln!(out, "{task},{repetition},{start}")?;
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
