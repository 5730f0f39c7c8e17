/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::Ordering;
use std::thread;
use std::time::Duration;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};

use ettt_sched::graph::{export, AnalysisMode, ScheduleGraph};
use ettt_sched::hyperperiod::hyperperiod;
use ettt_sched::instance::{write_start_times, Instance};
use ettt_sched::placement::TtPlacement;
use ettt_sched::policy::Policy;
use ettt_sched::sim;

// ── CLI argument definition ───────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Algorithm {
    /// Brute-force simulation of a pure event-triggered instance.
    EtBf,
    /// Schedule-graph analysis of a pure event-triggered instance.
    EtSg,
    /// TT placement search with per-job jitter, schedule graph per placement.
    EtttBfWj,
    /// TT placement search without jitter (one offset per TT task).
    EtttBfNj,
}

/// Schedulability analyzer for mixed ET/TT task sets.
///
/// Example:
///   ettt-sched -a ettt-bf-wj -p CP -s demos/mixed_instance.yaml
#[derive(Debug, Parser)]
#[command(
    name = "ettt-sched",
    about = "Schedulability analysis for mixed event- and time-triggered task sets",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML task instance file.
    instance: PathBuf,

    /// Analysis algorithm.
    #[arg(short = 'a', long = "algorithm", value_enum, default_value_t = Algorithm::EtSg)]
    algorithm: Algorithm,

    /// Scheduling policy (EDF-FP, P-RM, CP or CW).
    #[arg(short = 'p', long = "policy", default_value = "EDF-FP")]
    policy: Policy,

    /// Build the full schedule graph instead of stopping at the first miss.
    #[arg(short = 'f', long = "full-graph", default_value_t = false)]
    full_graph: bool,

    /// Save the schedule graph to <instance>.sg.dot (et-sg only; implies a
    /// full graph).
    #[arg(short = 'g', long = "save-graph", default_value_t = false)]
    save_graph: bool,

    /// Save found TT start times to <instance>.st.csv (ettt-bf-* only).
    #[arg(short = 's', long = "save-start-times", default_value_t = false)]
    start_times: bool,

    /// Print instance statistics before analyzing.
    #[arg(short = 'i', long = "info", default_value_t = false)]
    info: bool,

    /// Cancel a placement search after this many seconds; the verdict is
    /// then optimistic and unverified (ettt-bf-* only).
    #[arg(short = 't', long = "timeout")]
    timeout: Option<u64>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!(
        instance  = %cli.instance.display(),
        algorithm = ?cli.algorithm,
        policy    = %cli.policy,
        "Configuration"
    );

    match run(&cli) {
        Ok(schedulable) => {
            println!(
                "Result: {}",
                if schedulable { "schedulable" } else { "non-schedulable" }
            );
        }
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<bool> {
    let instance = Instance::from_yaml_path(&cli.instance)?;

    if cli.info {
        println!("{}", instance.stats()?);
    }
    if cli.start_times && !matches!(cli.algorithm, Algorithm::EtttBfWj | Algorithm::EtttBfNj) {
        warn!("--start-times only applies to the ettt-bf-* algorithms; ignored");
    }
    if cli.save_graph && cli.algorithm != Algorithm::EtSg {
        warn!("--save-graph only applies to et-sg; ignored");
    }

    let h = hyperperiod(&instance.tt_tasks, &instance.et_tasks)?;

    match cli.algorithm {
        Algorithm::EtSg => {
            ensure!(
                !instance.has_tt_tasks(),
                "et-sg requires a pure event-triggered instance; use an ettt-bf-* algorithm"
            );
            let mode = if cli.full_graph || cli.save_graph {
                AnalysisMode::FullGraph
            } else {
                AnalysisMode::StopAtFirstMiss
            };
            let mut graph = ScheduleGraph::from_et_tasks(&instance.et_tasks, h);
            let ok = graph.analyze(cli.policy, mode);
            info!(nodes = graph.nodes().len(), "analysis finished");
            if cli.save_graph {
                let path = suffixed(&cli.instance, ".sg.dot");
                let mut file = File::create(&path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                export::write_dot(&graph, &mut file)
                    .with_context(|| format!("failed to write {}", path.display()))?;
                info!(path = %path.display(), "schedule graph saved");
            }
            Ok(ok)
        }

        Algorithm::EtBf => {
            ensure!(
                !instance.has_tt_tasks(),
                "et-bf requires a pure event-triggered instance; use an ettt-bf-* algorithm"
            );
            Ok(sim::brute_force_tasks(&instance.et_tasks, h, cli.policy))
        }

        Algorithm::EtttBfWj | Algorithm::EtttBfNj => {
            let mut search =
                TtPlacement::new(&instance.tt_tasks, &instance.et_tasks, h, cli.policy);
            if let Some(secs) = cli.timeout {
                let flag = search.cancel_flag();
                thread::spawn(move || {
                    thread::sleep(Duration::from_secs(secs));
                    flag.store(true, Ordering::Relaxed);
                });
            }
            let ok = match cli.algorithm {
                Algorithm::EtttBfWj => search.search_with_jitter(),
                _ => search.search_without_jitter(),
            };
            info!(graph_runs = search.graph_runs(), "placement search finished");
            if cli.start_times {
                match search.start_times() {
                    Some(starts) => {
                        let path = suffixed(&cli.instance, ".st.csv");
                        let mut file = File::create(&path)
                            .with_context(|| format!("failed to create {}", path.display()))?;
                        write_start_times(starts, &mut file)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        info!(path = %path.display(), "start times saved");
                    }
                    None => warn!("no verified placement found; start times not saved"),
                }
            }
            Ok(ok)
        }
    }
}

fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}{}", path.display(), suffix))
}
