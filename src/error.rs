use std::collections::TryReserveError;
use std::fmt;

/// Failures reported by [`ChainMap`](crate::ChainMap).
///
/// A missing key is not an error; lookups report absence through
/// `bool`/`Option`. After any of these errors the map is still usable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MapError {
    /// A map needs at least one bucket.
    ZeroCapacity,
    /// Bucket index past the end of the table.
    IndexOutOfBounds { index: usize, capacity: usize },
    /// Bucket table or key/value buffer could not be allocated.
    Alloc(TryReserveError),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::ZeroCapacity => f.write_str("capacity must be at least one bucket"),
            MapError::IndexOutOfBounds { index, capacity } => {
                write!(f, "bucket index {index} out of bounds for capacity {capacity}")
            }
            MapError::Alloc(e) => write!(f, "allocation failed: {e}"),
        }
    }
}

impl std::error::Error for MapError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapError::Alloc(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TryReserveError> for MapError {
    fn from(e: TryReserveError) -> Self {
        MapError::Alloc(e)
    }
}
