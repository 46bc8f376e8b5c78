//! Byte layouts for native values that Arrow stores as fixed-size binary.
//!
//! ## A Note on Byte Order
//!
//! UUIDs are stored as their 16 bytes in **canonical (big-endian)** order,
//! the same order RFC 9562 prints them in. The raw storage of an Arrow
//! `FixedSizeBinary(16)` array and the engine's native value are therefore
//! the same bytes, and byte-wise comparison of stored values matches
//! comparison of the 128-bit integers they represent.

#![forbid(unsafe_code)]

pub mod uuid_bytes;

pub use crate::DecodeError;

/// A native value stored as exactly [`WIDTH`](Self::WIDTH) bytes per slot.
pub trait FixedWidth: Sized {
    const WIDTH: usize;

    /// Append this value's bytes to `dst`.
    fn write_bytes(&self, dst: &mut Vec<u8>);

    /// Read one value from a slot of exactly `WIDTH` bytes.
    fn read_bytes(src: &[u8]) -> Result<Self, DecodeError>;

    /// Append the zero-filled placeholder stored under a null slot.
    #[inline]
    fn write_null(dst: &mut Vec<u8>) {
        dst.resize(dst.len() + Self::WIDTH, 0);
    }
}
