pub mod generator;
pub mod parser;
pub mod writer;

pub use generator::{random_workload, WorkloadShape};
pub use parser::{load_workload, parse_workload};
pub use writer::{format_outcome, write_workload};
