use std::fmt;

use arrow::datatypes::DataType;
use thiserror::Error;

/// Unified error type for all extension bridge operations.
///
/// This enum encompasses every failure mode of the conversion layer, from a producer
/// declaring the wrong physical storage for a known extension tag to Arrow refusing to
/// assemble a record batch. Each variant includes context-specific information to help
/// diagnose and handle the error appropriately.
///
/// # Error Handling Strategy
///
/// Errors propagate upward through the call stack using Rust's `?` operator. Conversions
/// abort at the first error; no partially converted table is ever returned. Nothing in the
/// bridge retries: every failure is a property of the data, not of the environment.
///
/// # Thread Safety
///
/// `Error` implements `Send` and `Sync`, allowing errors to be safely passed between threads.
#[derive(Error, Debug)]
pub enum Error {
    /// Arrow library error during columnar data operations.
    ///
    /// This error occurs when:
    /// - Assembling a `RecordBatch` from exported columns
    /// - Casting or concatenating arrays
    /// - Reading from an upstream `RecordBatchReader` that failed
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Invalid user input or API parameter.
    ///
    /// This error indicates a problem with arguments passed to the bridge:
    /// - Arrow types the engine has no native counterpart for
    /// - Out-of-range values (e.g. `UInt64` values above `i64::MAX`)
    /// - Malformed values (e.g. JSON text that does not parse when validation is on)
    /// - Bad options (e.g. a zero batch size)
    /// - Shape violations (e.g. columns of unequal length in one table)
    ///
    /// The message string provides specific details about what was invalid and why.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// An extension tag was declared over physical storage that does not match the
    /// storage registered for that tag.
    ///
    /// The rendered message reads `"<tag> must be <expected> but storage is <actual>"`, for
    /// example `arrow.uuid must be a fixed-size binary of 16 bytes but storage is
    /// FixedSizeBinary(4)`. Storage is never coerced; the conversion is aborted.
    #[error("Invalid argument: {tag} must be {expected} but storage is {actual}")]
    TypeMismatch {
        tag: String,
        expected: String,
        actual: String,
    },

    /// The opaque metadata blob attached to a recognised extension tag could not be decoded
    /// by that tag's codec.
    #[error("Invalid argument: malformed metadata for {tag}: {reason}")]
    MalformedMetadata { tag: String, reason: String },

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This error should never occur during normal operation. It indicates:
    /// - Violated internal invariants
    /// - An Arrow array whose concrete type disagrees with its declared `DataType`
    /// - A native column whose values disagree with its logical type
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create a storage mismatch error for `tag`.
    ///
    /// `expected` is the human-readable requirement (e.g. "a fixed-size binary of 16 bytes")
    /// and `actual` is the storage type that was found, rendered with `Debug`.
    ///
    /// # Examples
    ///
    /// ```
    /// use arrow::datatypes::DataType;
    /// use llkv_result::Error;
    ///
    /// let err = Error::type_mismatch(
    ///     "arrow.uuid",
    ///     "a fixed-size binary of 16 bytes",
    ///     &DataType::Int32,
    /// );
    /// assert!(err.to_string().contains("arrow.uuid must be a fixed-size binary of 16 bytes"));
    /// assert!(err.is_invalid_input());
    /// ```
    #[inline]
    pub fn type_mismatch(
        tag: impl Into<String>,
        expected: impl Into<String>,
        actual: &DataType,
    ) -> Self {
        Error::TypeMismatch {
            tag: tag.into(),
            expected: expected.into(),
            actual: format!("{actual:?}"),
        }
    }

    /// Create a malformed metadata error from any displayable reason.
    ///
    /// # Examples
    ///
    /// ```
    /// use llkv_result::Error;
    ///
    /// let err = Error::malformed_metadata("arrow.json", "expected an empty JSON object");
    /// assert!(matches!(err, Error::MalformedMetadata { ref tag, .. } if tag == "arrow.json"));
    /// ```
    #[inline]
    pub fn malformed_metadata<E: fmt::Display>(tag: impl Into<String>, reason: E) -> Self {
        Error::MalformedMetadata {
            tag: tag.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error means the caller handed over invalid data.
    ///
    /// Storage mismatches, malformed metadata and invalid arguments are all contract
    /// violations by the producer of the input and share this category.
    #[inline]
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidArgumentError(_)
                | Error::TypeMismatch { .. }
                | Error::MalformedMetadata { .. }
        )
    }
}
