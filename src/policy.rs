//! Scheduling policies.
//!
//! A policy is a pure function `(queue, cluster view, clock) -> Option<JobId>`.
//! It is read-only over `queue` and `cluster` by construction: both are
//! handed to it as an immutable slice and a borrowed [`ClusterView`], never a
//! mutable reference. `Some(id)` means "dispatch the job with this id now";
//! the id is guaranteed to name a member of `queue` that currently fits. The
//! engine may call a policy repeatedly within the same tick until it returns
//! `None`.

use crate::cluster::ClusterView;
use crate::job::{Job, JobId};

/// The enumerated set of scheduling policies, looked up by name through this
/// closed registry rather than through reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Fcfs,
    FirstFit,
    Sjf,
    FcfsEasy,
}

impl PolicyKind {
    pub fn from_name(name: &str) -> anyhow::Result<Self> {
        match name {
            "fcfs" => Ok(PolicyKind::Fcfs),
            "ff" => Ok(PolicyKind::FirstFit),
            "sjf" => Ok(PolicyKind::Sjf),
            "fcfs_easy" => Ok(PolicyKind::FcfsEasy),
            other => Err(anyhow::anyhow!("unknown scheduling algorithm: {other}")),
        }
    }

    pub fn all() -> [PolicyKind; 4] {
        [
            PolicyKind::Fcfs,
            PolicyKind::FirstFit,
            PolicyKind::Sjf,
            PolicyKind::FcfsEasy,
        ]
    }

    /// Invokes the policy. `queue` is the waiting queue in arrival order;
    /// `clock` is the current simulated time.
    pub fn decide(&self, queue: &[Job], cluster: ClusterView<'_>, clock: u64) -> Option<JobId> {
        match self {
            PolicyKind::Fcfs => fcfs(queue, cluster),
            PolicyKind::FirstFit => first_fit(queue, cluster),
            PolicyKind::Sjf => sjf(queue, cluster),
            PolicyKind::FcfsEasy => fcfs_easy(queue, cluster, clock),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PolicyKind::Fcfs => "fcfs",
                PolicyKind::FirstFit => "ff",
                PolicyKind::Sjf => "sjf",
                PolicyKind::FcfsEasy => "fcfs_easy",
            }
        )
    }
}

/// Strict first-come-first-served: only ever considers the queue head, and
/// never skips ahead even if a later job would fit.
fn fcfs(queue: &[Job], cluster: ClusterView<'_>) -> Option<JobId> {
    let head = queue.first()?;
    cluster.can_fit(head.nodes).then_some(head.job_id)
}

/// First job in arrival order that fits right now.
fn first_fit(queue: &[Job], cluster: ClusterView<'_>) -> Option<JobId> {
    queue
        .iter()
        .find(|job| cluster.can_fit(job.nodes))
        .map(|job| job.job_id)
}

/// Among the jobs that fit now, the one with the smallest requested run
/// time; ties broken by ascending job id. Never reasons about future events.
fn sjf(queue: &[Job], cluster: ClusterView<'_>) -> Option<JobId> {
    queue
        .iter()
        .filter(|job| cluster.can_fit(job.nodes))
        .min_by_key(|job| (job.requested_run_time, job.job_id))
        .map(|job| job.job_id)
}

/// FCFS with EASY backfilling: the head of the queue is never delayed past
/// its own earliest possible start time `t_H`, but smaller jobs behind it may
/// run early if they are guaranteed to finish before `t_H`.
fn fcfs_easy(queue: &[Job], cluster: ClusterView<'_>, clock: u64) -> Option<JobId> {
    let head = queue.first()?;
    if cluster.can_fit(head.nodes) {
        return Some(head.job_id);
    }

    let t_h = earliest_start(cluster, head.nodes);

    queue
        .iter()
        .skip(1)
        .find(|candidate| {
            cluster.can_fit(candidate.nodes) && clock + candidate.requested_run_time <= t_h
        })
        .map(|job| job.job_id)
}

/// Earliest clock at which `nodes_needed` nodes are guaranteed to be free,
/// assuming every running job completes exactly at its `expected_end`.
/// Well-defined as long as `nodes_needed <= cluster.total_nodes()`, which is
/// enforced at trace-load time.
fn earliest_start(cluster: ClusterView<'_>, nodes_needed: usize) -> u64 {
    let mut running: Vec<_> = cluster.running().collect();
    running.sort_by_key(|entry| entry.expected_end);

    let mut free = cluster.available_nodes();
    for entry in running {
        free += entry.nodes;
        if free >= nodes_needed {
            return entry.expected_end;
        }
    }

    unreachable!(
        "running jobs hold {} nodes total but head needs only {}, on a cluster of {} nodes",
        cluster.total_nodes() - cluster.available_nodes(),
        nodes_needed,
        cluster.total_nodes()
    );
}
