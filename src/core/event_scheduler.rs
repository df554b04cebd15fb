use super::collections::MinHeap;
use super::types::Fingerprint;
use std::cmp::Ordering;

/// An in-flight cleaning job
#[derive(Debug, Clone, Copy)]
pub struct ScheduledJob {
    pub completion_time: u64,
    pub sequence_num: u64,
    pub sword: Fingerprint,
}

impl PartialEq for ScheduledJob {
    fn eq(&self, other: &Self) -> bool {
        self.completion_time == other.completion_time && self.sequence_num == other.sequence_num
    }
}

impl Eq for ScheduledJob {}

impl PartialOrd for ScheduledJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledJob {
    fn cmp(&self, other: &Self) -> Ordering {
        // Earliest completion first, then first scheduled
        self.completion_time
            .cmp(&other.completion_time)
            .then_with(|| self.sequence_num.cmp(&other.sequence_num))
    }
}

/// Min-heap of cleaning jobs plus the sequence counter that keeps
/// simultaneous completions in scheduling order
pub struct CleaningScheduler {
    jobs: MinHeap<ScheduledJob>,
    sequence_counter: u64,
}

impl CleaningScheduler {
    /// Create a new CleaningScheduler
    pub fn new() -> Self {
        Self {
            jobs: MinHeap::new(),
            sequence_counter: 0,
        }
    }

    /// Schedule a cleaning of `sword` finishing at `completion_time`.
    /// Returns the sequence number the job was given.
    pub fn schedule(&mut self, sword: Fingerprint, completion_time: u64) -> u64 {
        let sequence_num = self.sequence_counter;
        self.jobs.insert(ScheduledJob {
            completion_time,
            sequence_num,
            sword,
        });
        self.sequence_counter += 1;
        sequence_num
    }

    /// Completion time of the earliest job without removing it
    pub fn peek_next_completion(&self) -> Option<u64> {
        self.jobs.peek_min().map(|job| job.completion_time)
    }

    /// Remove the earliest job if it completes no later than `now`
    pub fn pop_due(&mut self, now: u64) -> Option<ScheduledJob> {
        match self.jobs.peek_min() {
            Some(job) if job.completion_time <= now => self.jobs.extract_min(),
            _ => None,
        }
    }

    /// Check if there are any jobs remaining
    pub fn has_jobs(&self) -> bool {
        !self.jobs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Number of jobs currently queued for `sword`
    pub fn jobs_for(&self, sword: Fingerprint) -> usize {
        self.jobs.iter().filter(|job| job.sword == sword).count()
    }

    /// Drop all queued jobs. Sequence numbers keep counting up.
    pub fn clear(&mut self) {
        self.jobs.clear();
    }
}

impl Default for CleaningScheduler {
    fn default() -> Self {
        Self::new()
    }
}
