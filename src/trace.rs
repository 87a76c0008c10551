//! Reads an SWF-like trace file into admitted [`Job`]s.
//!
//! Peripheral to the core (§1): the engine and policies never know this
//! module exists. Kept in the crate so the binary is runnable end to end.

use std::io::BufRead;
use std::path::Path;

use anyhow::Context;

use crate::job::Job;

/// Fixed processors-per-node assumption used to derive `nodes` from the
/// trace's "processors requested" field.
const PROCESSORS_PER_NODE: f64 = 4.0;

struct ParsedFields {
    job_id: u64,
    submit_time: u64,
    run_time: u64,
    requested_run_time: u64,
    processors: i64,
}

/// Reads `path` and returns the admitted jobs, in file order.
///
/// Lines starting with `;` are comments and skipped. Every data line must
/// have exactly 18 whitespace-separated fields; a line that doesn't, or that
/// has a non-integer value in a field this reader uses, is a hard error
/// (§7, Input-data). A job requiring more nodes than `total_nodes` is
/// skipped with a warning (§7, Input-soft) rather than rejected outright. A
/// job whose computed node count is zero or negative is a hard error.
///
/// If `task_limit` is `Some(n)` with `n > 0`, reading stops after `n` jobs
/// have been admitted (jobs skipped for exceeding `total_nodes` don't count
/// towards the limit).
pub fn load(path: &Path, total_nodes: usize, task_limit: Option<u64>) -> anyhow::Result<Vec<Job>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening trace file {}", path.display()))?;
    let reader = std::io::BufReader::new(file);

    let mut jobs = Vec::new();
    let mut skipped = 0usize;

    log::info!("reading trace file {} to populate the simulation", path.display());

    for (line_no, line) in reader.lines().enumerate() {
        let line_no = line_no + 1;
        let line =
            line.with_context(|| format!("reading line {line_no} of {}", path.display()))?;
        if line.starts_with(';') {
            continue;
        }

        let parsed = parse_line(&line, line_no)?;
        let nodes = job_nodes(parsed.processors, line_no)?;

        if nodes > total_nodes {
            log::warn!(
                "skipping job {} as it requires {nodes} > {total_nodes} nodes",
                parsed.job_id
            );
            skipped += 1;
            continue;
        }

        jobs.push(Job::new(
            parsed.job_id,
            parsed.submit_time,
            parsed.run_time,
            parsed.requested_run_time,
            nodes,
        ));

        if let Some(limit) = task_limit {
            if limit > 0 && jobs.len() as u64 >= limit {
                break;
            }
        }
    }

    log::info!(
        "finished reading the trace file: {} jobs admitted, {skipped} skipped, {total_nodes} nodes in the cluster",
        jobs.len(),
    );

    Ok(jobs)
}

fn parse_line(line: &str, line_no: usize) -> anyhow::Result<ParsedFields> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    anyhow::ensure!(
        fields.len() == 18,
        "line {line_no}: expected 18 fields, found {}",
        fields.len()
    );

    let field = |index: usize| -> anyhow::Result<i64> {
        fields[index].parse::<i64>().with_context(|| {
            format!(
                "line {line_no}: field {index} ({:?}) is not an integer",
                fields[index]
            )
        })
    };

    let job_id = field(0)?;
    let submit_time = field(1)?;
    let run_time = field(3)?;
    let processors = field(7)?;
    let requested_run_time = field(8)?;

    anyhow::ensure!(job_id >= 0, "line {line_no}: negative job id {job_id}");
    anyhow::ensure!(
        submit_time >= 0,
        "line {line_no}: negative submit time {submit_time}"
    );
    anyhow::ensure!(run_time >= 0, "line {line_no}: negative run time {run_time}");
    anyhow::ensure!(
        requested_run_time >= 0,
        "line {line_no}: negative requested run time {requested_run_time}"
    );

    Ok(ParsedFields {
        job_id: job_id as u64,
        submit_time: submit_time as u64,
        run_time: run_time as u64,
        requested_run_time: requested_run_time as u64,
        processors,
    })
}

fn job_nodes(processors: i64, line_no: usize) -> anyhow::Result<usize> {
    let nodes = (processors as f64 / PROCESSORS_PER_NODE).ceil() as i64;
    anyhow::ensure!(
        nodes > 0,
        "line {line_no}: job requires {nodes} nodes (from {processors} processors), which is not positive"
    );
    Ok(nodes as usize)
}
