use thiserror::Error;

/// Errors raised by the hand-rolled containers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContainerError {
    /// A constructor or operation was handed an argument it cannot work with
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Growing the backing storage would exceed the representable capacity
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),
}
