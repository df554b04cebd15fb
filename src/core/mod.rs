pub mod collections;
pub mod event_scheduler;
pub mod execution;
pub mod types;
