//! Configuration for a sword-cleaning simulation run
//!
//! Controls the starting sizes of the engine's containers and an optional
//! cut-off for simulated time.

use crate::core::collections::{hash_table, queue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial slot count of the inventory hash table
    pub table_capacity: usize,
    /// Initial (and minimum) capacity of every engine queue
    pub queue_capacity: usize,
    /// Stop once the next event would happen after this time
    pub time_limit: Option<u64>,
}

impl EngineConfig {
    /// Create a new engine configuration with default values
    ///
    /// Defaults match the containers' own defaults and impose no time limit
    pub fn new() -> Self {
        Self {
            table_capacity: hash_table::DEFAULT_CAPACITY,
            queue_capacity: queue::DEFAULT_CAPACITY,
            time_limit: None,
        }
    }

    /// Set the initial inventory table size
    pub fn with_table_capacity(mut self, capacity: usize) -> Self {
        self.table_capacity = capacity;
        self
    }

    /// Set the initial size of the request and result queues
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Stop the simulation before any event later than `limit`
    ///
    /// # Note
    /// Requests still waiting at the cut-off produce no outcome
    pub fn with_time_limit(mut self, limit: u64) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
