use crate::ports::StoreError;

/// Infrastructure failure during allocation. Domain-level degradations
/// (unresolved stops, exhausted trains, unknown carriages) are outcome
/// variants, not errors.
#[derive(Debug)]
pub enum AllocError {
    Store(StoreError),
}

impl std::fmt::Display for AllocError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AllocError {}

impl From<StoreError> for AllocError {
    fn from(e: StoreError) -> Self {
        AllocError::Store(e)
    }
}
