use std::{collections::TryReserveError, result};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("allocation failure: {source}")]
    AllocationFailure {
        #[from]
        source: TryReserveError,
    },

    #[error("node not found")]
    NotFound,
}

pub type Result<T> = result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_failure_from_reserve() {
        let mut buf: Vec<u64> = Vec::new();
        let err: Error = buf.try_reserve(usize::MAX).unwrap_err().into();
        assert!(matches!(err, Error::AllocationFailure { .. }));
        assert!(err.to_string().starts_with("allocation failure"));
    }

    #[test]
    fn not_found_display() {
        assert_eq!(Error::NotFound.to_string(), "node not found");
    }
}
