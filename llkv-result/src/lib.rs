//! Error types and result definitions for the LLKV Arrow extension bridge.
//!
//! This crate provides the unified error type ([`Error`]) and result type alias ([`Result<T>`])
//! used by every crate in the workspace. All conversions that could fail return `Result<T>`,
//! where the error variant carries enough context to tell the caller what was wrong with the
//! data it handed over.
//!
//! # Error Philosophy
//!
//! A single error enum ([`Error`]) is shared rather than crate-specific error types. This:
//! - Allows errors to propagate naturally with the `?` operator across crate boundaries
//! - Provides clear error messages for end users
//! - Enables structured error matching for programmatic handling
//!
//! # Error Categories
//!
//! - **Storage mismatches** ([`Error::TypeMismatch`]): an extension tag declared over the wrong
//!   physical storage
//! - **Metadata failures** ([`Error::MalformedMetadata`]): the serialized extension parameters
//!   could not be decoded
//! - **User input errors** ([`Error::InvalidArgumentError`]): unsupported types, bad options,
//!   malformed values
//! - **Data format errors** ([`Error::Arrow`]): failures raised by Arrow itself
//! - **Internal errors** ([`Error::Internal`]): bugs or unexpected states
//!
//! The first three form the *invalid input* category, see [`Error::is_invalid_input`].

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
