//! A `BridgeStream` couples a `GrowableBuffer` with an independent read cursor. Writes always
//! append at the end of the produced bytes, reads always start at the read cursor, so a stream can
//! be filled and consumed in the same lifetime without the two interfering.
//!
//! Fixed width values are encoded little-endian: bytes and bools take one byte, `i32` and `f32`
//! take four. Strings and byte blobs are prefixed with their length in bytes as an `i32`.

use crate::buffer::GrowableBuffer;
use crate::error::{DecodeError, DecoderError, EncodeError};
use std::convert::TryFrom;
use std::str::from_utf8;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BridgeStream {
    buffer: GrowableBuffer,
    read: usize,
}

impl BridgeStream {

    /// An empty stream ready to be written to.
    pub fn new() -> Self {
        Self { buffer: GrowableBuffer::new(), read: 0 }
    }

    /// An empty stream with room for `capacity` bytes before the first growth.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buffer: GrowableBuffer::with_capacity(capacity), read: 0 }
    }

    /// A stream over previously encoded bytes, positioned at their start.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { buffer: GrowableBuffer::from_bytes(bytes), read: 0 }
    }

    /// True if the stream holds no bytes at all, e.g. when it was read from a zero length frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// True while the read cursor has not reached the end of the stream.
    #[inline]
    pub fn has_more(&self) -> bool {
        self.read < self.buffer.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// The read cursor.
    #[inline]
    pub fn position(&self) -> usize {
        self.read
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.read)
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Returns a copy of every byte written so far. Neither cursor moves.
    pub fn encode(&self) -> Vec<u8> {
        self.buffer.encode()
    }

    /// Reset to the state of `BridgeStream::new()`.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.read = 0;
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buffer.push(value as u8);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buffer.write(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buffer.write(&value.to_le_bytes());
    }

    pub fn write_str(&mut self, value: &str) -> Result<(), EncodeError> {
        self.write_bytes(value.as_bytes())
    }

    pub fn write_bytes(&mut self, value: &[u8]) -> Result<(), EncodeError> {
        self.write_len(value.len())?;
        self.buffer.write(value);
        Ok(())
    }

    /// Write another stream's bytes as a frame. `None` is encoded as a zero length frame, which
    /// reads back as an empty stream.
    pub fn write_stream(&mut self, stream: Option<&BridgeStream>) -> Result<(), EncodeError> {
        match stream {
            Some(stream) => self.write_bytes(stream.as_bytes()),
            None         => self.write_len(0),
        }
    }

    pub fn read_byte(&mut self) -> Result<u8, DecoderError> {
        Ok(self.take_array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, DecoderError> {
        Ok(self.read_byte()? == 1)
    }

    pub fn read_i32(&mut self) -> Result<i32, DecoderError> {
        Ok(i32::from_le_bytes(self.take_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, DecoderError> {
        Ok(f32::from_le_bytes(self.take_array()?))
    }

    pub fn read_string(&mut self) -> Result<String, DecoderError> {
        self.transact(|s| {
            let len = s.read_len()?;
            let at = s.read;
            let bytes = s.take(len)?;
            from_utf8(bytes).map(str::to_owned).map_err(|e| DecodeError::from(e).at(at))
        })
    }

    pub fn read_bytes(&mut self) -> Result<Vec<u8>, DecoderError> {
        self.transact(|s| {
            let len = s.read_len()?;
            Ok(s.take(len)?.to_vec())
        })
    }

    /// Read a frame into a stream of its own. The returned stream owns a copy of the frame's
    /// bytes and is positioned at their start; reading stops exactly at the frame's end.
    pub fn read_stream(&mut self) -> Result<BridgeStream, DecoderError> {
        self.read_bytes().map(BridgeStream::from_bytes)
    }

    /// Write a length or count prefix.
    pub fn write_len(&mut self, len: usize) -> Result<(), EncodeError> {
        let len = i32::try_from(len).map_err(|_| EncodeError::Length(len))?;
        self.write_i32(len);
        Ok(())
    }

    /// Read a length or count prefix, rejecting negative values.
    pub fn read_len(&mut self) -> Result<usize, DecoderError> {
        let at = self.read;
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| {
            self.read = at;
            DecodeError::Length(len).at(at)
        })
    }

    /// Run a sequence of reads, restoring the read cursor if any of them fails.
    pub(crate) fn transact<T, F>(&mut self, f: F) -> Result<T, DecoderError>
    where
        F: FnOnce(&mut Self) -> Result<T, DecoderError>,
    {
        let start = self.read;
        let result = f(self);
        if result.is_err() {
            self.read = start;
        }
        result
    }

    /// Drop everything written after `len`, used to undo a partially written value. The read
    /// cursor is pulled back if it was past the new end.
    pub fn truncate(&mut self, len: usize) {
        self.buffer.truncate(len);
        self.read = self.read.min(self.buffer.len());
    }

    fn take(&mut self, len: usize) -> Result<&[u8], DecoderError> {
        let at = self.read;
        let bytes = self.buffer.slice(at, len).map_err(|e| e.at(at))?;
        self.read += len;
        Ok(bytes)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], DecoderError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

}

impl From<Vec<u8>> for BridgeStream {
    fn from(bytes: Vec<u8>) -> Self {
        BridgeStream::from_bytes(bytes)
    }
}

impl From<&[u8]> for BridgeStream {
    fn from(bytes: &[u8]) -> Self {
        BridgeStream::from_bytes(bytes.to_vec())
    }
}

impl AsRef<[u8]> for BridgeStream {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}
