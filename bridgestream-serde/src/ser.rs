use serde::{ser, Serialize};
use bridgestream::BridgeStream;
use std::convert::TryFrom;

use crate::error::{Error, Result};

/// Appends serde values to a `BridgeStream`.
pub struct Serializer<'s> {
    stream: &'s mut BridgeStream,
}

impl<'s> Serializer<'s> {
    pub fn new(stream: &'s mut BridgeStream) -> Self {
        Serializer { stream }
    }
}

pub fn to_bytes<T: ?Sized + Serialize>(value: &T) -> Result<Vec<u8>> {
    let mut stream = BridgeStream::new();
    to_stream(value, &mut stream)?;
    Ok(stream.encode())
}

/// Append `value` to an existing stream, e.g. in between values written by hand. If serializing
/// fails, the stream is truncated back to where it was.
pub fn to_stream<T: ?Sized + Serialize>(value: &T, stream: &mut BridgeStream) -> Result<()> {
    let start = stream.len();
    let result = value.serialize(&mut Serializer::new(stream));
    if result.is_err() {
        stream.truncate(start);
    }
    result
}

impl<'s> Serializer<'s> {
    fn serialize_variant_index(&mut self, index: u32) -> Result<()> {
        self.stream.write_i32(i32::try_from(index)?);
        Ok(())
    }
}

impl<'a, 's> ser::Serializer for &'a mut Serializer<'s> {

    type Ok = ();
    type Error = Error;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Frame<'a>;
    type SerializeStructVariant = Frame<'a>;

    fn serialize_bool(self, v: bool) -> Result<()> {
        self.stream.write_bool(v);
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<()> {
        self.serialize_i32(i32::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<()> {
        self.serialize_i32(i32::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<()> {
        self.stream.write_i32(v);
        Ok(())
    }

    fn serialize_i64(self, v: i64) -> Result<()> {
        self.serialize_i32(i32::try_from(v)?)
    }

    fn serialize_u8(self, v: u8) -> Result<()> {
        self.stream.write_byte(v);
        Ok(())
    }

    fn serialize_u16(self, v: u16) -> Result<()> {
        self.serialize_i32(i32::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<()> {
        self.serialize_i32(i32::try_from(v)?)
    }

    fn serialize_u64(self, v: u64) -> Result<()> {
        self.serialize_i32(i32::try_from(v)?)
    }

    fn serialize_f32(self, v: f32) -> Result<()> {
        self.stream.write_f32(v);
        Ok(())
    }

    fn serialize_f64(self, _v: f64) -> Result<()> {
        Err(Error::Unsupported("f64"))
    }

    fn serialize_char(self, v: char) -> Result<()> {
        self.serialize_str(v.encode_utf8(&mut [0u8; 4]))
    }

    fn serialize_str(self, v: &str) -> Result<()> {
        Ok(self.stream.write_str(v)?)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<()> {
        Ok(self.stream.write_bytes(v)?)
    }

    fn serialize_none(self) -> Result<()> {
        self.stream.write_bool(false);
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<()> {
        self.stream.write_bool(true);
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<()> {
        Ok(())
    }

    fn serialize_unit_variant(self, _name: &'static str, variant_index: u32, _variant: &'static str) -> Result<()> {
        self.serialize_variant_index(variant_index)
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(self, _name: &'static str, value: &T) -> Result<()> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(self, _name: &'static str, variant_index: u32, _variant: &'static str, value: &T) -> Result<()> {
        self.serialize_variant_index(variant_index)?;
        value.serialize(self)
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        self.stream.write_len(len.ok_or(Error::Length)?)?;
        Ok(self)
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeTupleStruct> {
        Ok(self)
    }

    fn serialize_tuple_variant(self, _name: &'static str, variant_index: u32, _variant: &'static str, _len: usize) -> Result<Self::SerializeTupleVariant> {
        self.serialize_variant_index(variant_index)?;
        Ok(self)
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        self.stream.write_len(len.ok_or(Error::Length)?)?;
        Ok(self)
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(Frame::new(&mut *self.stream))
    }

    fn serialize_struct_variant(self, _name: &'static str, variant_index: u32, _variant: &'static str, _len: usize) -> Result<Self::SerializeStructVariant> {
        self.serialize_variant_index(variant_index)?;
        Ok(Frame::new(&mut *self.stream))
    }

    fn is_human_readable(&self) -> bool {
        false
    }

}

impl<'a, 's> ser::SerializeSeq for &'a mut Serializer<'s> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 's> ser::SerializeTuple for &'a mut Serializer<'s> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 's> ser::SerializeTupleStruct for &'a mut Serializer<'s> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 's> ser::SerializeTupleVariant for &'a mut Serializer<'s> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

impl<'a, 's> ser::SerializeMap for &'a mut Serializer<'s> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<()> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<()> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<()> {
        Ok(())
    }
}

/// Collects the fields of a struct in a stream of their own and writes that stream to the parent
/// as a frame once the struct is complete, exactly like `BridgeStream::write_composite`.
pub struct Frame<'a> {
    parent: &'a mut BridgeStream,
    fields: BridgeStream,
}

impl<'a> Frame<'a> {
    fn new(parent: &'a mut BridgeStream) -> Self {
        Frame { parent, fields: BridgeStream::new() }
    }

    fn finish(self) -> Result<()> {
        Ok(self.parent.write_stream(Some(&self.fields))?)
    }
}

impl<'a> ser::SerializeStruct for Frame<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Result<()> {
        to_stream(value, &mut self.fields)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

impl<'a> ser::SerializeStructVariant for Frame<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _key: &'static str, value: &T) -> Result<()> {
        to_stream(value, &mut self.fields)
    }

    fn end(self) -> Result<()> {
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{to_bytes, to_stream};
    use crate::error::Error;
    use bridgestream::BridgeStream;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Point {
        x: i32,
        y: i32,
    }

    #[test]
    fn struct_is_framed() {
        assert_eq!(vec![8, 0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0], to_bytes(&Point { x: 1, y: 2 }).unwrap());
    }

    #[test]
    fn tuple_is_not_prefixed() {
        assert_eq!(vec![1, 0, 0, 0, 7], to_bytes(&(1i32, 7u8)).unwrap());
    }

    #[test]
    fn option_has_presence_flag() {
        assert_eq!(vec![0], to_bytes(&None::<i32>).unwrap());
        assert_eq!(vec![1, 5, 0, 0, 0], to_bytes(&Some(5i32)).unwrap());
    }

    #[test]
    fn narrowing() {
        assert_eq!(vec![0xff, 0xff, 0xff, 0x7f], to_bytes(&(i32::MAX as i64)).unwrap());
        assert!(matches!(to_bytes(&(i32::MAX as u32 + 1)), Err(Error::Int)));
        assert!(matches!(to_bytes(&i64::MIN), Err(Error::Int)));
        assert!(matches!(to_bytes(&1.5f64), Err(Error::Unsupported("f64"))));
    }

    #[test]
    fn failed_value_leaves_stream_untouched() {
        let mut stream = BridgeStream::new();
        stream.write_i32(7);
        assert!(matches!(to_stream(&(1i32, u32::MAX), &mut stream), Err(Error::Int)));
        assert_eq!(4, stream.len());
        assert!(matches!(to_stream(&vec![1i64, i64::MAX], &mut stream), Err(Error::Int)));
        assert_eq!(vec![7, 0, 0, 0], stream.encode());
        to_stream(&5u8, &mut stream).unwrap();
        assert_eq!(vec![7, 0, 0, 0, 5], stream.encode());
    }

    #[test]
    fn char_is_a_string() {
        assert_eq!(vec![2, 0, 0, 0, 0xc5, 0x9f], to_bytes(&'ş').unwrap());
    }

}
