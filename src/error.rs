//! Error taxonomy and the fatal-failure policy point.
//!
//! Expected misses (absent keys, empty arrays) are returned as data
//! (`None`/`false`) and never show up here. Allocation failure is either
//! propagated (`try_*` methods) or fatal (plain methods), see [`fatal`].

use std::collections::TryReserveError;
use thiserror::Error;

/// Errors returned by the fallible (`try_*`) operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The key (or, under `KeyMatch::HashOnly`, its hash) is already present.
    #[error("key already exists")]
    DuplicateKey,

    /// The allocator could not provide the requested storage.
    #[error("allocation failed: {0}")]
    Alloc(#[from] TryReserveError),

    /// Capacity arithmetic overflowed before reaching the allocator.
    #[error("capacity overflow: cannot hold {requested} elements")]
    CapacityOverflow {
        /// Requested element count
        requested: usize,
    },

    /// A `Display` implementation failed during a formatted append.
    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),

    /// Configuration rejected by `validate()`.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong
        message: String,
    },
}

impl Error {
    pub(crate) fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}

/// Error returned by `StrHashMap::insert`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    #[error("key already exists")]
    DuplicateKey,
}

impl From<InsertError> for Error {
    fn from(value: InsertError) -> Self {
        match value {
            InsertError::DuplicateKey => Self::DuplicateKey,
        }
    }
}

/// Crate result type
pub type Result<T> = std::result::Result<T, Error>;

/// Terminates the current operation on an unrecoverable storage failure.
///
/// Plain (non-`try_*`) methods route every allocation error through here:
/// the condition is logged and the thread panics. Embedders that need to
/// survive allocation failure use the `try_*` twins instead.
#[cold]
#[inline(never)]
pub(crate) fn fatal(err: Error) -> ! {
    log::error!("unrecoverable storage failure: {err}");
    panic!("unrecoverable storage failure: {err}")
}
