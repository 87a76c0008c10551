use crate::job::{Job, JobId};

/// A point in simulated time where the engine must act: either a job arrives
/// and joins the waiting queue, or a running job completes and frees its
/// nodes.
#[derive(Debug, Clone)]
pub enum Event {
    Arrival(u64, Job),
    Completion(u64, Job),
}

impl Event {
    fn timestamp(&self) -> u64 {
        match self {
            Event::Arrival(t, _) | Event::Completion(t, _) => *t,
        }
    }

    /// Completions rank before arrivals at the same timestamp (§3): freeing
    /// nodes before admitting a simultaneous arrival lets a job finishing at
    /// time `t` hand its nodes to a job arriving at `t` within the same tick.
    fn kind_rank(&self) -> u8 {
        match self {
            Event::Completion(..) => 0,
            Event::Arrival(..) => 1,
        }
    }

    fn job_id(&self) -> JobId {
        match self {
            Event::Arrival(_, job) | Event::Completion(_, job) => job.job_id,
        }
    }
}

/// Total order over events: `(timestamp, kind_rank, job_id)` ascending.
/// `BinaryHeap` is a max-heap, so this is implemented reversed and wrapped by
/// [`crate::event::EventQueue`], which always pops the minimum.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp() == other.timestamp()
            && self.kind_rank() == other.kind_rank()
            && self.job_id() == other.job_id()
    }
}

impl Eq for Event {}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let key = (self.timestamp(), self.kind_rank(), self.job_id());
        let other_key = (other.timestamp(), other.kind_rank(), other.job_id());
        // Reversed: BinaryHeap pops the greatest element, and we want pop()
        // to yield the earliest event.
        other_key.cmp(&key)
    }
}

/// Min-heap of [`Event`]s, ordered earliest-first.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: std::collections::BinaryHeap<Event>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            heap: std::collections::BinaryHeap::new(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.heap.push(event);
    }

    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: JobId) -> Job {
        Job::new(id, 0, 1, 1, 1)
    }

    #[test]
    fn pops_earliest_timestamp_first() {
        let mut q = EventQueue::new();
        q.push(Event::Arrival(10, job(1)));
        q.push(Event::Arrival(5, job(2)));
        q.push(Event::Completion(20, job(3)));
        assert_eq!(q.pop().unwrap().timestamp(), 5);
        assert_eq!(q.pop().unwrap().timestamp(), 10);
        assert_eq!(q.pop().unwrap().timestamp(), 20);
    }

    #[test]
    fn completion_ranks_before_arrival_at_same_timestamp() {
        let mut q = EventQueue::new();
        q.push(Event::Arrival(5, job(1)));
        q.push(Event::Completion(5, job(2)));
        match q.pop().unwrap() {
            Event::Completion(5, j) => assert_eq!(j.job_id, 2),
            other => panic!("expected completion first, got {other:?}"),
        }
        match q.pop().unwrap() {
            Event::Arrival(5, j) => assert_eq!(j.job_id, 1),
            other => panic!("expected arrival second, got {other:?}"),
        }
    }

    #[test]
    fn same_kind_same_timestamp_breaks_tie_by_job_id() {
        let mut q = EventQueue::new();
        q.push(Event::Arrival(5, job(9)));
        q.push(Event::Arrival(5, job(2)));
        q.push(Event::Arrival(5, job(4)));
        assert_eq!(q.pop().unwrap().job_id(), 2);
        assert_eq!(q.pop().unwrap().job_id(), 4);
        assert_eq!(q.pop().unwrap().job_id(), 9);
    }
}
