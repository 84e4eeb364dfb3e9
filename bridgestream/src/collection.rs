//! Homogeneous sequences. A list is encoded as its element count (`i32`) followed by every element
//! in iteration order, each in its own primitive encoding. Arrays and `Vec`s share the encoding.

use crate::error::{DecodeError, DecoderError, EncodeError};
use crate::stream::BridgeStream;

/// A value with a fixed, unframed encoding that may appear as a list element.
pub trait Primitive: Sized {
    fn write_to(&self, stream: &mut BridgeStream) -> Result<(), EncodeError>;
    fn read_from(stream: &mut BridgeStream) -> Result<Self, DecoderError>;
}

impl Primitive for u8 {
    fn write_to(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        stream.write_byte(*self);
        Ok(())
    }

    fn read_from(stream: &mut BridgeStream) -> Result<Self, DecoderError> {
        stream.read_byte()
    }
}

impl Primitive for bool {
    fn write_to(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        stream.write_bool(*self);
        Ok(())
    }

    fn read_from(stream: &mut BridgeStream) -> Result<Self, DecoderError> {
        stream.read_bool()
    }
}

impl Primitive for i32 {
    fn write_to(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        stream.write_i32(*self);
        Ok(())
    }

    fn read_from(stream: &mut BridgeStream) -> Result<Self, DecoderError> {
        stream.read_i32()
    }
}

impl Primitive for f32 {
    fn write_to(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        stream.write_f32(*self);
        Ok(())
    }

    fn read_from(stream: &mut BridgeStream) -> Result<Self, DecoderError> {
        stream.read_f32()
    }
}

impl Primitive for String {
    fn write_to(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        stream.write_str(self)
    }

    fn read_from(stream: &mut BridgeStream) -> Result<Self, DecoderError> {
        stream.read_string()
    }
}

/// A byte blob, so `Vec<Vec<u8>>` is a list of blobs.
impl Primitive for Vec<u8> {
    fn write_to(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        stream.write_bytes(self)
    }

    fn read_from(stream: &mut BridgeStream) -> Result<Self, DecoderError> {
        stream.read_bytes()
    }
}

impl BridgeStream {

    pub fn write_list<T: Primitive>(&mut self, values: &[T]) -> Result<(), EncodeError> {
        let start = self.len();
        let result = self.write_len(values.len()).and_then(|_| {
            values.iter().try_for_each(|value| value.write_to(self))
        });
        if result.is_err() {
            self.truncate(start);
        }
        result
    }

    /// Read a list into a new `Vec`, preserving order and duplicates.
    pub fn read_list<T: Primitive>(&mut self) -> Result<Vec<T>, DecoderError> {
        self.transact(|s| {
            let at = s.position();
            let count = s.read_len()?;
            let mut values = Vec::new();
            // every element occupies at least one byte, so this never over-reserves by much
            values.try_reserve(count.min(s.remaining())).map_err(|e| DecodeError::from(e).at(at))?;
            for _ in 0..count {
                values.push(T::read_from(s)?);
            }
            Ok(values)
        })
    }

}
