//! `bridgestream` encodes application data into a flat byte sequence and back. A `BridgeStream`
//! is written to in producer mode and read from, in the same order, in consumer mode. Nothing on
//! the wire describes the types of the values; reader and writer have to agree on the layout.
//!
//! # Wire format
//!
//! | value | encoding |
//! |---|---|
//! | byte | one byte |
//! | bool | one byte, `1` for true |
//! | `i32` | four bytes, little-endian two's complement |
//! | `f32` | four bytes, little-endian IEEE-754 |
//! | string | `i32` length in bytes, then UTF-8 |
//! | blob | `i32` length, then the bytes |
//! | list | `i32` element count, then the elements |
//! | composite | `i32` length, then the bytes of the stream the composite wrote itself into |
//!
//! A composite is any type implementing [`BridgeSerialize`]. Since every composite is written into
//! a stream of its own and stored as a length prefixed frame, composites nest and each one can be
//! decoded without knowing what surrounds it. A missing composite is written as a frame of length
//! zero, which reads back as a stream for which `is_empty` is true.
//!
//! # A note on lengths
//!
//! All lengths and counts are `i32` on the wire. Encoding anything longer than `i32::MAX` raises
//! `EncodeError::Length`, decoding a negative prefix raises `DecodeError::Length`.
//!
//! # Examples
//!
//! ```
//! use bridgestream::*;
//!
//! let mut stream = BridgeStream::new();
//! stream.write_i32(10);
//! stream.write_str("şerhat").unwrap();
//! stream.write_bool(true);
//! assert_eq!(stream.encode(), [
//!     0x0a, 0x00, 0x00, 0x00, // 10
//!     0x07, 0x00, 0x00, 0x00, // String of 7 bytes
//!     0xc5, 0x9f,             // 'ş'
//!     0x65, 0x72, 0x68, 0x61, 0x74, // 'erhat'
//!     0x01,                   // true
//! ]);
//!
//! let mut decoded = BridgeStream::from_bytes(stream.encode());
//! assert_eq!(10, decoded.read_i32().unwrap());
//! assert_eq!("şerhat", decoded.read_string().unwrap());
//! assert!(decoded.read_bool().unwrap());
//! assert!(!decoded.has_more());
//! ```

mod buffer;
mod collection;
mod composite;
mod error;
mod geometry;
mod stream;

pub use buffer::*;
pub use collection::*;
pub use composite::*;
pub use error::*;
pub use geometry::*;
pub use stream::*;
