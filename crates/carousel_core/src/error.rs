#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("slide index {index} out of range for {len} items")]
    OutOfRange { index: usize, len: usize },
}
