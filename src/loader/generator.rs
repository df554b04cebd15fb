use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{Request, Sword, Workload};

const STYLES: [&str; 6] = ["bastard", "katana", "rapier", "sabre", "claymore", "dagger"];

/// Size and timing parameters for a generated workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkloadShape {
    pub swords: usize,
    pub requests: usize,
    /// Largest gap between consecutive arrivals
    pub max_gap: u64,
    /// Largest cleaning duration
    pub max_duration: u64,
    /// Share of swords that start out dirty
    pub dirty_ratio: f64,
}

impl Default for WorkloadShape {
    fn default() -> Self {
        Self {
            swords: 20,
            requests: 200,
            max_gap: 5,
            max_duration: 20,
            dirty_ratio: 0.25,
        }
    }
}

/// Build a random but well-formed workload: every sword class is distinct,
/// every request targets a stocked class and arrivals never decrease.
pub fn random_workload<R: Rng>(rng: &mut R, shape: &WorkloadShape) -> Workload {
    let swords: Vec<Sword> = (0..shape.swords)
        .map(|index| {
            let total_capacity = rng.gen_range(10..500);
            let dirty_level = if rng.gen_bool(shape.dirty_ratio.clamp(0.0, 1.0)) {
                Some(rng.gen_range(0..=shape.max_duration))
            } else {
                None
            };
            Sword {
                total_capacity,
                remaining_capacity: rng.gen_range(0..=total_capacity),
                cleaning_duration: rng.gen_range(0..=shape.max_duration),
                length: rng.gen_range(20..150),
                throughput: rng.gen_range(1..100),
                speed: rng.gen_range(1..20),
                name: format!("Blade {}", index),
                description: format!("Forged as number {}", index),
                comments: String::new(),
                // the index keeps every class distinct
                style: format!("{}-{}", STYLES[index % STYLES.len()], index),
                state: Default::default(),
            }
            .with_dirty_level(dirty_level)
        })
        .collect();

    let mut arrival_time = 0;
    let requests = if swords.is_empty() {
        Vec::new()
    } else {
        (0..shape.requests)
            .map(|_| {
                arrival_time += rng.gen_range(0..=shape.max_gap);
                let target = &swords[rng.gen_range(0..swords.len())];
                Request {
                    arrival_time,
                    total_capacity: target.total_capacity,
                    throughput: target.throughput,
                    speed: target.speed,
                    style: target.style.clone(),
                }
            })
            .collect()
    };

    Workload { swords, requests }
}
