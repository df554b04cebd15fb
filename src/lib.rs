pub mod core;
pub mod error;
pub mod loader;
pub mod logger;

// Re-export commonly used types
pub use crate::core::execution::{EngineConfig, EngineError, SimulationEngine};
pub use crate::core::types::{Fingerprint, Outcome, Request, Sword, Workload};
pub use crate::error::{Error, Result};

use std::path::Path;

/// Parse `path` and run it to completion. The returned engine holds the
/// outcomes in the order the requests finished.
pub fn simulate_file(path: impl AsRef<Path>, config: EngineConfig) -> Result<SimulationEngine> {
    let path = path.as_ref();
    let workload = loader::load_workload(path)?;
    log::info!(
        "Loaded '{}': {} swords, {} requests",
        path.display(),
        workload.swords.len(),
        workload.requests.len()
    );

    let mut engine = SimulationEngine::from_workload(workload, config)?;
    engine.run()?;
    Ok(engine)
}
