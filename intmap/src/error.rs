use thiserror::Error;

/// Errors that can occur when constructing or inserting into the map
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MapError {
    /// Construction parameters out of range (capacity, load factor)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Growth would push the capacity past the largest positive i32
    #[error("maximum capacity exceeded ({max})", max = i32::MAX)]
    CapacityExceeded,

    /// Growth attempted from a capacity that is not a power of two.
    /// Unreachable through the public API; indicates a bookkeeping bug.
    #[error("capacity must be a power of two, got {0}")]
    CapacityNotPowerOfTwo(usize),

    /// A probe walk visited `capacity` slots without finding a free one.
    /// Only possible when the probing strategy does not enumerate a full
    /// permutation of the slot range.
    #[error("probing strategy failed to reach a free slot within {capacity} probes")]
    ProbeExhausted { capacity: usize },
}

pub type Result<T> = std::result::Result<T, MapError>;
