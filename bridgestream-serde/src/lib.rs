//! Conveniently serialize and deserialize your Rust data structures into the `bridgestream` wire
//! format, without implementing `BridgeSerialize` by hand.
//!
//! # Mapping
//!
//! The serde data model is richer than the wire format, so some types are widened or rejected:
//!
//! | serde | wire |
//! |---|---|
//! | `bool` | bool |
//! | `u8` | byte |
//! | `i8`, `i16`, `u16`, `i32` | `i32` |
//! | `i64`, `u32`, `u64` | `i32`, values outside its range fail with `Error::Int` |
//! | `f32` | `f32` (`f64` is unsupported) |
//! | `char`, `str` | string |
//! | bytes | blob |
//! | `Option` | bool presence flag, followed by the value if present |
//! | unit, unit struct | nothing |
//! | seq, map | `i32` count, then elements (maps: key, value, key, value, ...) |
//! | tuple, tuple struct | the elements, no prefix |
//! | struct | a frame, just like a composite written with `write_composite` |
//! | enum | `i32` variant index, then the variant's content |
//!
//! Since structs are frames, a struct deriving `Serialize` produces exactly the bytes of a
//! hand-written `BridgeSerialize` impl that writes the same fields in the same order, and the two
//! can read each other's output. This holds for fields that map onto the same wire values; an
//! `Option` field is a bool flag here, whereas `write_optional` writes a zero length frame.
//!
//! # Examples
//!
//! ```
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct MatchInfo {
//!     match_id: i32,
//!     player_ids: Vec<i32>,
//!     player_names: Vec<String>,
//! }
//!
//! let info = MatchInfo { match_id: 10, player_ids: vec![1, 2], player_names: vec!["şek".into()] };
//! let bytes = bridgestream_serde::to_bytes(&info).unwrap();
//! assert_eq!(bytes, [
//!     0x1c, 0x00, 0x00, 0x00,             // frame of 28 bytes
//!       0x0a, 0x00, 0x00, 0x00,           // match_id 10
//!       0x02, 0x00, 0x00, 0x00,           // two player ids
//!         0x01, 0x00, 0x00, 0x00,
//!         0x02, 0x00, 0x00, 0x00,
//!       0x01, 0x00, 0x00, 0x00,           // one player name
//!         0x04, 0x00, 0x00, 0x00,         // string of 4 bytes
//!           0xc5, 0x9f, 0x65, 0x6b,       // 'şek'
//! ]);
//!
//! let deserialized: MatchInfo = bridgestream_serde::from_bytes(&bytes).unwrap();
//! assert_eq!(info, deserialized);
//! ```

mod de;
mod error;
mod ser;

pub use de::{from_bytes, from_stream, Deserializer};
pub use error::{Error, Result};
pub use ser::{to_bytes, to_stream, Frame, Serializer};

#[cfg(test)]
mod tests {
    use serde::{Serialize, Deserialize};
    use std::collections::BTreeMap;
    use bridgestream::{BridgeSerialize, BridgeStream, DecoderError, EncodeError};
    use super::{to_bytes, from_bytes, to_stream, from_stream};

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    enum Enum {
        UnitVariant,
        NewtypeVariant(bool),
        TupleVariant(f32, f32),
        StructVariant{ a: u8, b: u16, c: i32 },
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Struct {
        field: u8,
    }

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct UnitStruct;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct NewtypeStruct(String);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct TupleStruct(char, char, char);

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Test {
        bool: bool,
        i8: i8,
        i16: i16,
        i32: i32,
        i64: i64,
        u8: u8,
        u16: u16,
        u32: u32,
        u64: u64,
        f32: f32,
        char: char,
        str: String,
        #[serde(with = "serde_bytes")]
        bytes: Vec<u8>,
        none: Option<u8>,
        some: Option<u8>,
        unit: (),
        unit_struct: UnitStruct,
        newtype_struct: NewtypeStruct,
        tuple_struct: TupleStruct,
        seq: Vec<String>,
        tuple: (u16, u16, u16),
        map: BTreeMap<i32, String>,
        r#struct: Struct,
        unit_variant: Enum,
        newtype_variant: Enum,
        tuple_variant: Enum,
        struct_variant: Enum,
    }

    #[test]
    fn roundtrip() {
        let message = Test {
            bool: true,
            i8: -1,
            i16: -20,
            i32: i32::MIN,
            i64: -7000,
            u8: 255,
            u16: 20,
            u32: 7000,
            u64: i32::MAX as u64,
            f32: 1337.8472,
            char: 'ş',
            str: "Test".to_string(),
            bytes: vec![19, 20, 25, 10],
            none: None,
            some: Some(0),
            unit: (),
            unit_struct: UnitStruct,
            newtype_struct: NewtypeStruct("Qapla'".to_string()),
            tuple_struct: TupleStruct('a', 'ı', '✓'),
            seq: vec![
                "Elen".to_string(),
                "síla".to_string(),
                "lúmenn'".to_string(),
                "omentielvo".to_string(),
            ],
            tuple: (0, 0, 0),
            map: [
                (1701, "Enterprise".to_string()),
                (74656, "Voyager".to_string())
            ].into_iter().collect(),
            r#struct: Struct {
                field: 42,
            },
            unit_variant: Enum::UnitVariant,
            newtype_variant: Enum::NewtypeVariant(false),
            tuple_variant: Enum::TupleVariant(1.0, 0.999),
            struct_variant: Enum::StructVariant {
                a: 255,
                b: 0,
                c: 33,
            }
        };
        assert_eq!(message, from_bytes::<Test>(&to_bytes(&message).unwrap()).unwrap());
    }

    #[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
    struct MatchInfo {
        match_id: i32,
        player_ids: Vec<i32>,
        player_names: Vec<String>,
    }

    impl BridgeSerialize for MatchInfo {
        fn write(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
            stream.write_i32(self.match_id);
            stream.write_list(&self.player_ids)?;
            stream.write_list(&self.player_names)
        }

        fn read(&mut self, stream: &mut BridgeStream) -> Result<(), DecoderError> {
            self.match_id = stream.read_i32()?;
            self.player_ids = stream.read_list()?;
            self.player_names = stream.read_list()?;
            Ok(())
        }
    }

    fn info(match_id: i32) -> MatchInfo {
        MatchInfo {
            match_id,
            player_ids: vec![1, 2, 3],
            player_names: vec!["fer".into(), "meh".into(), "şek".into(), "sek".into()],
        }
    }

    #[test]
    fn same_bytes_as_composite() {
        let mut stream = BridgeStream::new();
        stream.write_composite(&info(10)).unwrap();
        assert_eq!(stream.encode(), to_bytes(&info(10)).unwrap());
    }

    #[test]
    fn composite_list_interop() {
        let list = vec![info(10), info(15), info(20)];
        let mut stream = BridgeStream::new();
        stream.write_composites(&list).unwrap();
        assert_eq!(list, from_bytes::<Vec<MatchInfo>>(&stream.encode()).unwrap());

        let bytes = to_bytes(&list).unwrap();
        assert_eq!(list, BridgeStream::from_bytes(bytes).read_composites::<MatchInfo>().unwrap());
    }

    #[test]
    fn byte_vec_with_and_without_serde_bytes() {
        #[derive(Serialize)]
        struct Wrapped(#[serde(with = "serde_bytes")] Vec<u8>);
        let plain = to_bytes(&vec![19u8, 20, 25, 10]).unwrap();
        assert_eq!(plain, to_bytes(&Wrapped(vec![19, 20, 25, 10])).unwrap());
        assert_eq!(vec![19, 20, 25, 10], BridgeStream::from_bytes(plain).read_bytes().unwrap());
    }

    #[test]
    fn mixed_with_manual_writes() {
        let mut stream = BridgeStream::new();
        stream.write_str("header").unwrap();
        to_stream(&info(1), &mut stream).unwrap();
        stream.write_bool(true);

        let mut decoded = BridgeStream::from_bytes(stream.encode());
        assert_eq!("header", decoded.read_string().unwrap());
        assert_eq!(info(1), from_stream::<MatchInfo>(&mut decoded).unwrap());
        assert!(decoded.read_bool().unwrap());
        assert!(!decoded.has_more());
    }

}
