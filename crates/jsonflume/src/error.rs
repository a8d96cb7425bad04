use alloc::string::String;

use thiserror::Error;

use crate::value::Kind;

/// Everything a public operation of this crate can fail with.
///
/// The variants map one-to-one onto the failure categories of the codec:
/// type mismatches on read accessors, out-of-range array indexing, protocol
/// violations on builder or reader handles, parse failures, and rejected
/// sink writes. The crate never catches and converts internally; every error
/// surfaces at the operation that caused it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A read-only accessor was called on a value of the wrong kind.
    #[error("value is {found}, not {expected}")]
    Type {
        /// The kind the accessor requires.
        expected: Kind,
        /// The kind actually stored.
        found: Kind,
    },

    /// An array index was out of bounds.
    #[error("index {index} out of range for array of length {len}")]
    Range {
        /// The offending index.
        index: usize,
        /// The array length at the time of access.
        len: usize,
    },

    /// A builder handle was used out of protocol: already closed, stale, or
    /// the wrong kind for the requested operation.
    #[error("builder is not in an active state: {0}")]
    Builder(&'static str),

    /// A reader handle was used out of protocol: its composite is no longer
    /// on the active stack, or its value reference is stale.
    #[error("reader is not in an active state: {0}")]
    Reader(&'static str),

    /// The input does not parse as JSON. Carries the byte offset of the
    /// failure and a short reason.
    #[error("{reason} at byte {at}")]
    Deserialize {
        /// Byte offset into the input where the failure was detected.
        at: usize,
        /// Short description of what was expected or what went wrong.
        reason: String,
    },

    /// The sink rejected a write.
    #[error("sink rejected write")]
    Sink,
}

impl Error {
    pub(crate) fn mismatch(expected: Kind, found: Kind) -> Self {
        Error::Type { expected, found }
    }
}
