/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! ettt-sched – offline schedulability analysis for mixed event-triggered /
//! time-triggered periodic task sets with uncertain timing.
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── task/           – task & job model, validation, job materialization
//! ├── hyperperiod/    – LCM / GCD helpers, analysis window
//! ├── policy/         – EDF-FP, P-RM, CP, CW: base order & critical bounds
//! ├── graph/          – schedule-graph engine + Graphviz export
//! ├── sim/            – exhaustive brute-force oracle
//! ├── interval_tree/  – augmented BST for placement pruning
//! ├── placement/      – TT start-time backtracking search
//! └── instance/       – YAML instance files, stats, CSV result export
//! ```

pub mod graph;
pub mod hyperperiod;
pub mod instance;
pub mod interval_tree;
pub mod placement;
pub mod policy;
pub mod sim;
pub mod task;
