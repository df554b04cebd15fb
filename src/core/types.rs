use serde::{Deserialize, Serialize};
use std::rc::Rc;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

// Deterministic 64-bit FNV-1a, stable across toolchains and platforms.
fn fnv1a64(mut hash: u64, bytes: &[u8]) -> u64 {
    for &byte in bytes {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Integer key shared by a sword and every request for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(u64);

impl Fingerprint {
    /// Derive the key from the attributes that identify a sword class.
    /// Only these four fields take part; names and comments never do.
    ///
    /// The three integers are hashed as little-endian bytes followed by the
    /// style's UTF-8 bytes, so the value is the same on every build.
    pub fn derive(total_capacity: i64, throughput: i64, speed: i64, style: &str) -> Self {
        let mut hash = FNV_OFFSET_BASIS;
        for field in [total_capacity, throughput, speed] {
            hash = fnv1a64(hash, &field.to_le_bytes());
        }
        Self(fnv1a64(hash, style.as_bytes()))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Mutable scheduling state carried by each sword
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningState {
    /// Pending cleaning duration; `None` once the sword is clean
    pub dirty_level: Option<u64>,
    /// When the in-flight cleaning finishes; `None` while unscheduled
    pub completion_time: Option<u64>,
    /// Tie-break among jobs finishing at the same time
    pub sequence_num: Option<u64>,
}

impl CleaningState {
    pub fn is_scheduled(&self) -> bool {
        self.completion_time.is_some()
    }

    /// True when a cleaning was scheduled to finish no later than `time`
    pub fn is_done_by(&self, time: u64) -> bool {
        self.completion_time.is_some_and(|completion| completion <= time)
    }

    pub fn schedule(&mut self, dirty_level: u64, completion_time: u64, sequence_num: u64) {
        self.dirty_level = Some(dirty_level);
        self.completion_time = Some(completion_time);
        self.sequence_num = Some(sequence_num);
    }

    /// Mark the sword clean and available for a fresh cleaning
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// An inventory item.
///
/// Equality only looks at the identifying fields, never at `state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sword {
    pub total_capacity: i64,
    pub remaining_capacity: i64,
    /// Time one cleaning takes once servicing begins
    pub cleaning_duration: u64,
    pub length: i64,
    pub throughput: i64,
    pub speed: i64,
    pub name: String,
    pub description: String,
    pub comments: String,
    pub style: String,
    #[serde(skip)]
    pub state: CleaningState,
}

impl Sword {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(self.total_capacity, self.throughput, self.speed, &self.style)
    }

    /// Set how long the sword still needs before it is clean
    pub fn with_dirty_level(mut self, dirty_level: Option<u64>) -> Self {
        self.state.dirty_level = dirty_level;
        self
    }
}

impl PartialEq for Sword {
    fn eq(&self, other: &Self) -> bool {
        self.total_capacity == other.total_capacity
            && self.remaining_capacity == other.remaining_capacity
            && self.cleaning_duration == other.cleaning_duration
            && self.length == other.length
            && self.throughput == other.throughput
            && self.speed == other.speed
            && self.name == other.name
            && self.description == other.description
            && self.comments == other.comments
            && self.style == other.style
    }
}

impl Eq for Sword {}

/// A timestamped ask for a clean sword of a given class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub arrival_time: u64,
    pub total_capacity: i64,
    pub throughput: i64,
    pub speed: i64,
    pub style: String,
}

impl Request {
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::derive(self.total_capacity, self.throughput, self.speed, &self.style)
    }
}

/// One resolved request, holding the sword it was served with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub completion_time: u64,
    /// `completion_time - arrival_time`
    pub latency: u64,
    pub sword: Rc<Sword>,
}

impl Outcome {
    pub fn fingerprint(&self) -> Fingerprint {
        self.sword.fingerprint()
    }
}

/// Inventory and request stream as read from an input file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub swords: Vec<Sword>,
    pub requests: Vec<Request>,
}
