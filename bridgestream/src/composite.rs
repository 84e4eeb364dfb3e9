//! User defined records. A type implementing `BridgeSerialize` writes its fields into a fresh
//! `BridgeStream`; the outer stream then stores that stream's bytes as a frame: an `i32` byte
//! length followed by exactly that many bytes. Reading a composite reads the frame into a stream of
//! its own and lets the type populate itself from it, so a composite never reads past its frame no
//! matter what follows it, and composites nest to any depth.
//!
//! ```
//! use bridgestream::{BridgeSerialize, BridgeStream, DecoderError, EncodeError};
//!
//! #[derive(Default, Debug, PartialEq)]
//! struct MatchInfo {
//!     match_id: i32,
//!     player_ids: Vec<i32>,
//!     player_names: Vec<String>,
//! }
//!
//! impl BridgeSerialize for MatchInfo {
//!     fn write(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
//!         stream.write_i32(self.match_id);
//!         stream.write_list(&self.player_ids)?;
//!         stream.write_list(&self.player_names)
//!     }
//!
//!     fn read(&mut self, stream: &mut BridgeStream) -> Result<(), DecoderError> {
//!         self.match_id = stream.read_i32()?;
//!         self.player_ids = stream.read_list()?;
//!         self.player_names = stream.read_list()?;
//!         Ok(())
//!     }
//! }
//!
//! let info = MatchInfo { match_id: 10, player_ids: vec![1, 2, 3], player_names: vec!["şek".into()] };
//! let mut stream = BridgeStream::new();
//! stream.write_composite(&info).unwrap();
//!
//! let mut decoded = BridgeStream::from_bytes(stream.encode());
//! assert_eq!(info, decoded.read_composite::<MatchInfo>().unwrap());
//! ```

use crate::error::{DecoderError, EncodeError};
use crate::stream::BridgeStream;
use tracing::debug;

/// The capability of a record to write itself into and read itself from a `BridgeStream`.
/// Both operations see a stream dedicated to this one value.
pub trait BridgeSerialize {
    fn write(&self, stream: &mut BridgeStream) -> Result<(), EncodeError>;
    fn read(&mut self, stream: &mut BridgeStream) -> Result<(), DecoderError>;
}

impl<T: BridgeSerialize + ?Sized> BridgeSerialize for Box<T> {
    fn write(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        (**self).write(stream)
    }

    fn read(&mut self, stream: &mut BridgeStream) -> Result<(), DecoderError> {
        (**self).read(stream)
    }
}

impl BridgeStream {

    pub fn write_composite<T: BridgeSerialize + ?Sized>(&mut self, value: &T) -> Result<(), EncodeError> {
        let mut sub = BridgeStream::new();
        value.write(&mut sub)?;
        self.write_stream(Some(&sub))
    }

    /// `None` is written as a zero length frame without consulting `T` at all.
    pub fn write_optional<T: BridgeSerialize + ?Sized>(&mut self, value: Option<&T>) -> Result<(), EncodeError> {
        match value {
            Some(value) => self.write_composite(value),
            None        => self.write_stream(None),
        }
    }

    pub fn write_composites<T: BridgeSerialize>(&mut self, values: &[T]) -> Result<(), EncodeError> {
        let start = self.len();
        let result = self.write_len(values.len()).and_then(|_| {
            values.iter().try_for_each(|value| self.write_composite(value))
        });
        if result.is_err() {
            self.truncate(start);
        }
        result
    }

    pub fn read_composite<T: BridgeSerialize + Default>(&mut self) -> Result<T, DecoderError> {
        let mut value = T::default();
        self.read_into(&mut value)?;
        Ok(value)
    }

    /// Populate an existing value from the next frame.
    pub fn read_into<T: BridgeSerialize + ?Sized>(&mut self, value: &mut T) -> Result<(), DecoderError> {
        self.transact(|s| {
            let mut frame = s.read_stream()?;
            let len = frame.len();
            let start = s.position() - len;
            value.read(&mut frame).map_err(|e| {
                debug!(frame_start = start, frame_len = len, error = %e, "composite failed to decode");
                e.within(start)
            })
        })
    }

    pub fn read_composites<T: BridgeSerialize + Default>(&mut self) -> Result<Vec<T>, DecoderError> {
        let mut values = Vec::new();
        self.read_composites_into(&mut values)?;
        Ok(values)
    }

    /// Append every composite of the next list to `values`. On failure `values` is left as it was.
    pub fn read_composites_into<T: BridgeSerialize + Default>(&mut self, values: &mut Vec<T>) -> Result<(), DecoderError> {
        let before = values.len();
        let result = self.transact(|s| {
            let count = s.read_len()?;
            for _ in 0..count {
                values.push(s.read_composite()?);
            }
            Ok(())
        });
        if result.is_err() {
            values.truncate(before);
        }
        result
    }

}
