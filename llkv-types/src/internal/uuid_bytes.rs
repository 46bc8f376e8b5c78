use uuid::Uuid;

use super::{DecodeError, FixedWidth};

impl FixedWidth for Uuid {
    const WIDTH: usize = 16;

    #[inline]
    fn write_bytes(&self, dst: &mut Vec<u8>) {
        dst.extend_from_slice(self.as_bytes());
    }

    #[inline]
    fn read_bytes(src: &[u8]) -> Result<Uuid, DecodeError> {
        let bytes: [u8; 16] = match src.len() {
            n if n < Self::WIDTH => return Err(DecodeError::NotEnoughData),
            n if n > Self::WIDTH => return Err(DecodeError::TrailingBytes),
            _ => src.try_into().map_err(|_| DecodeError::NotEnoughData)?,
        };
        Ok(Uuid::from_bytes(bytes))
    }
}
