use std::path::PathBuf;

use clap::Parser;

use hpc_sched_sim::engine::Engine;
use hpc_sched_sim::policy::PolicyKind;
use hpc_sched_sim::trace;

/// Replays an SWF-like job trace against a simulated cluster under a named
/// scheduling policy and reports makespan, wait-time statistics, and
/// utilisation.
#[derive(Debug, clap::Parser)]
#[command(long_about = None)]
struct Args {
    /// Scheduling algorithm: fcfs, ff, sjf, or fcfs_easy
    algorithm: String,
    /// Number of nodes in the simulated cluster
    nodes: usize,
    /// Stop reading the trace after this many admitted jobs (absent or
    /// non-positive means no limit)
    task_limit: Option<i64>,
    /// Path to the SWF-like trace file
    #[arg(long, default_value = "ANL-Intrepid-2009-1.swf")]
    trace: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let policy = PolicyKind::from_name(&args.algorithm)?;
    log::info!("set {policy} as the scheduler");

    let task_limit = args
        .task_limit
        .and_then(|limit| if limit > 0 { Some(limit as u64) } else { None });

    let jobs = trace::load(&args.trace, args.nodes, task_limit)?;

    log::info!(
        "{} jobs will be scheduled on {} nodes. Ready for simulation.",
        jobs.len(),
        args.nodes
    );

    let report = Engine::new(args.nodes, jobs, policy).run();

    println!("{report}");

    Ok(())
}
