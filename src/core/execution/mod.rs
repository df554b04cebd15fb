pub mod config;
pub mod simulation_engine;

pub use config::EngineConfig;
pub use simulation_engine::{EngineError, SimulationEngine};
