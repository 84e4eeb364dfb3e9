use serde::de::{self, DeserializeOwned, DeserializeSeed, EnumAccess, IntoDeserializer, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde::de::value::U32Deserializer;
use bridgestream::BridgeStream;
use std::convert::TryFrom;

use crate::error::{Error, Result};

/// Reads serde values from a `BridgeStream`. The wire format does not describe itself, so
/// `deserialize_any` and friends are not supported: the target type dictates what is read.
pub struct Deserializer<'s> {
    stream: &'s mut BridgeStream,
}

impl<'s> Deserializer<'s> {
    pub fn new(stream: &'s mut BridgeStream) -> Self {
        Deserializer { stream }
    }
}

/// Decode a value which must span all of `bytes`.
pub fn from_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut stream = BridgeStream::from(bytes);
    let t = from_stream(&mut stream)?;
    if stream.has_more() {
        Err(Error::Trailing(stream.position()))
    } else {
        Ok(t)
    }
}

/// Decode the next value of `stream`, leaving anything after it unread.
pub fn from_stream<T: DeserializeOwned>(stream: &mut BridgeStream) -> Result<T> {
    T::deserialize(&mut Deserializer::new(stream))
}

impl<'s> Deserializer<'s> {

    #[inline]
    fn read_int<T: TryFrom<i32>>(&mut self) -> Result<T> {
        T::try_from(self.stream.read_i32()?).map_err(|_| Error::Int)
    }

}

impl<'de, 'a, 's> de::Deserializer<'de> for &'a mut Deserializer<'s> {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported("deserialize_any"))
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_bool(self.stream.read_bool()?)
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i8(self.read_int()?)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i16(self.read_int()?)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i32(self.stream.read_i32()?)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_i64(i64::from(self.stream.read_i32()?))
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u8(self.stream.read_byte()?)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u16(self.read_int()?)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u32(self.read_int()?)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_u64(self.read_int()?)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_f32(self.stream.read_f32()?)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported("f64"))
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let v = self.stream.read_string()?;
        let mut chars = v.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::Char),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_string(self.stream.read_string()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_byte_buf(self.stream.read_bytes()?)
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        if self.stream.read_bool()? {
            visitor.visit_some(self)
        } else {
            visitor.visit_none()
        }
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(self, _name: &'static str, visitor: V) -> Result<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let len = self.stream.read_len()?;
        visitor.visit_seq(Counted::new(self, len))
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        visitor.visit_seq(Counted::new(self, len))
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(self, _name: &'static str, len: usize, visitor: V) -> Result<V::Value> {
        self.deserialize_tuple(len, visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value> {
        let len = self.stream.read_len()?;
        visitor.visit_map(Counted::new(self, len))
    }

    /// Structs live in a frame of their own. Fields are read in declaration order; bytes left in
    /// the frame after the last field are skipped.
    fn deserialize_struct<V: Visitor<'de>>(self, _name: &'static str, fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        let mut frame = self.stream.read_stream()?;
        let start = self.stream.position() - frame.len();
        visitor
            .visit_seq(Counted::new(&mut Deserializer::new(&mut frame), fields.len()))
            .map_err(|e| e.within(start))
    }

    fn deserialize_enum<V: Visitor<'de>>(self, _name: &'static str, _variants: &'static [&'static str], visitor: V) -> Result<V::Value> {
        visitor.visit_enum(self)
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported("deserialize_identifier"))
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, _visitor: V) -> Result<V::Value> {
        Err(Error::Unsupported("deserialize_ignored_any"))
    }

    fn is_human_readable(&self) -> bool {
        false
    }

}

/// Hands out a known number of elements, or key value pairs for maps.
struct Counted<'a, 's: 'a> {
    de: &'a mut Deserializer<'s>,
    remaining: usize,
}

impl<'a, 's> Counted<'a, 's> {
    fn new(de: &'a mut Deserializer<'s>, remaining: usize) -> Self {
        Self { de, remaining }
    }
}

impl<'de, 'a, 's> SeqAccess<'de> for Counted<'a, 's> {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(&mut self, seed: T) -> Result<Option<T::Value>> {
        if self.remaining == 0 {
            Ok(None)
        } else {
            self.remaining -= 1;
            seed.deserialize(&mut *self.de).map(Some)
        }
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

impl<'de, 'a, 's> MapAccess<'de> for Counted<'a, 's> {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>> {
        if self.remaining == 0 {
            Ok(None)
        } else {
            self.remaining -= 1;
            seed.deserialize(&mut *self.de).map(Some)
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value> {
        seed.deserialize(&mut *self.de)
    }

    #[inline]
    fn size_hint(&self) -> Option<usize> {
        Some(self.remaining)
    }
}

impl<'de, 'a, 's> EnumAccess<'de> for &'a mut Deserializer<'s> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> Result<(V::Value, Self::Variant)> {
        let index: u32 = self.read_int()?;
        let deserializer: U32Deserializer<Error> = index.into_deserializer();
        let variant = seed.deserialize(deserializer)?;
        Ok((variant, self))
    }
}

impl<'de, 'a, 's> VariantAccess<'de> for &'a mut Deserializer<'s> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, len: usize, visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_tuple(self, len, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(self, fields: &'static [&'static str], visitor: V) -> Result<V::Value> {
        de::Deserializer::deserialize_struct(self, "", fields, visitor)
    }

}

#[cfg(test)]
mod tests {
    use super::{from_bytes, from_stream};
    use crate::error::Error;
    use bridgestream::{BridgeStream, DecodeError};
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn trailing_bytes() {
        assert!(matches!(from_bytes::<i32>(&[1, 0, 0, 0, 9]), Err(Error::Trailing(4))));
    }

    #[test]
    fn truncated() {
        match from_bytes::<i32>(&[1, 0]) {
            Err(Error::Decode(e)) => assert_eq!(&DecodeError::Eof { needed: 4, remaining: 2 }, e.inner()),
            o => panic!("unexpected {:?}", o),
        }
    }

    #[test]
    fn struct_error_position() {
        let mut stream = BridgeStream::new();
        stream.write_i32(99);
        stream.write_i32(4);
        stream.write_i32(1);
        let mut stream = BridgeStream::from_bytes(stream.encode());
        assert_eq!(99, stream.read_i32().unwrap());
        match from_stream::<Point>(&mut stream) {
            Err(Error::Decode(e)) => assert_eq!(12, e.position()),
            o => panic!("unexpected {:?}", o),
        }
    }

    #[test]
    fn struct_ignores_extra_frame_bytes() {
        let mut stream = BridgeStream::new();
        let mut frame = BridgeStream::new();
        frame.write_i32(1);
        frame.write_i32(2);
        frame.write_str("extra").unwrap();
        stream.write_stream(Some(&frame)).unwrap();
        assert_eq!(Point { x: 1, y: 2 }, from_bytes(&stream.encode()).unwrap());
    }

    #[test]
    fn char_must_be_single() {
        let mut stream = BridgeStream::new();
        stream.write_str("ab").unwrap();
        assert!(matches!(from_bytes::<char>(&stream.encode()), Err(Error::Char)));
    }

    #[test]
    fn self_describing_is_rejected() {
        assert!(matches!(from_bytes::<serde::de::IgnoredAny>(&[]), Err(Error::Unsupported(_))));
    }

}
