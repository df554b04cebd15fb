pub mod errors;
pub mod hash_table;
pub mod min_heap;
pub mod queue;

// Re-export commonly used types
pub use errors::ContainerError;
pub use hash_table::HashTable;
pub use min_heap::MinHeap;
pub use queue::Queue;
