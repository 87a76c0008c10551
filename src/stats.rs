//! Aggregated metrics reported at the end of a run.

/// Min/max/mean/median/sum over a completed run's wait times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitTimeStats {
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub median: f64,
    pub sum: u64,
}

impl WaitTimeStats {
    /// Computes stats over an exact sorted copy of `samples`. Returns `None`
    /// for an empty slice (no job ever completed) rather than panicking.
    ///
    /// Median follows the lower-middle-averaged-with-upper-middle convention
    /// for even counts, which an incremental/streaming accumulator cannot
    /// give without buffering everything anyway — so this sorts once, on
    /// demand, instead of reaching for a running-statistics crate.
    pub fn of(samples: &[u64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable();

        let sum: u64 = sorted.iter().sum();
        let len = sorted.len();
        let mean = sum as f64 / len as f64;
        let median = if len % 2 == 1 {
            sorted[len / 2] as f64
        } else {
            (sorted[len / 2 - 1] as f64 + sorted[len / 2] as f64) / 2.0
        };

        Some(Self {
            min: sorted[0],
            max: sorted[len - 1],
            mean,
            median,
            sum,
        })
    }
}

/// The final report produced by [`crate::engine::Engine::run`].
#[derive(Debug)]
pub struct SimulationReport {
    pub makespan: u64,
    pub wait_times: Option<WaitTimeStats>,
    pub total_completion_time: u64,
    pub utilization: String,
}

impl std::fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Simulation finished.")?;
        writeln!(f, "Statistics:")?;
        writeln!(f, "- makespan: {}", self.makespan)?;
        writeln!(f, "- total completion time: {}", self.total_completion_time)?;
        match self.wait_times {
            Some(w) => {
                writeln!(f, "- wait times:")?;
                writeln!(f, "-- min: {}", w.min)?;
                writeln!(f, "-- max: {}", w.max)?;
                writeln!(f, "-- mean: {}", w.mean)?;
                writeln!(f, "-- median: {}", w.median)?;
                writeln!(f, "-- total (sum): {}", w.sum)?;
            }
            None => writeln!(f, "- wait times: no job completed")?,
        }
        write!(f, "{}", self.utilization)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_samples_yield_none() {
        assert_eq!(WaitTimeStats::of(&[]), None);
    }

    #[test]
    fn odd_count_median_is_middle_element() {
        let stats = WaitTimeStats::of(&[5, 1, 3]).unwrap();
        assert_eq!(stats.min, 1);
        assert_eq!(stats.max, 5);
        assert_eq!(stats.sum, 9);
        assert_eq!(stats.median, 3.0);
        assert!((stats.mean - 3.0).abs() < 1e-9);
    }

    #[test]
    fn even_count_median_averages_the_two_middles() {
        let stats = WaitTimeStats::of(&[1, 2, 3, 4]).unwrap();
        assert_eq!(stats.median, 2.5);
    }

    #[test]
    fn single_sample() {
        let stats = WaitTimeStats::of(&[42]).unwrap();
        assert_eq!(stats.min, 42);
        assert_eq!(stats.max, 42);
        assert_eq!(stats.median, 42.0);
    }
}
