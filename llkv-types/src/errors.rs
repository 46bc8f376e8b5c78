/// Failure to read one fixed-width value back from storage bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The slot holds fewer bytes than one value.
    NotEnoughData,
    /// The slot holds more bytes than one value.
    TrailingBytes,
}
