//! The byte storage underneath a `BridgeStream`. A `GrowableBuffer` keeps its whole allocated
//! region initialized and tracks how much of it has been produced. When a write does not fit, the
//! capacity is doubled until it does, so a sequence of N writes costs amortized O(1) per write.

use crate::error::DecodeError;
use tracing::trace;

/// The capacity of a freshly constructed producer buffer.
pub const DEFAULT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq)]
pub struct GrowableBuffer {
    /// Always exactly `capacity` bytes long; only `[0, offset)` is meaningful.
    data: Vec<u8>,
    offset: usize,
}

impl GrowableBuffer {

    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: vec![0; capacity], offset: 0 }
    }

    /// Take ownership of already encoded bytes. Capacity equals their length and all of them
    /// count as written, so further writes append after the supplied data.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let offset = bytes.len();
        Self { data: bytes, offset }
    }

    /// Number of bytes produced so far, which is also the logical length of the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.offset == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.data[self.offset..self.offset + bytes.len()].copy_from_slice(bytes);
        self.offset += bytes.len();
    }

    pub fn push(&mut self, byte: u8) {
        self.reserve(1);
        self.data[self.offset] = byte;
        self.offset += 1;
    }

    /// A view of the produced bytes. Use `encode` for a snapshot that outlives later writes.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.offset]
    }

    /// An owned copy of exactly the produced bytes, without any trailing spare capacity.
    pub fn encode(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Bounds-checked access to `len` produced bytes starting at `at`.
    pub fn slice(&self, at: usize, len: usize) -> Result<&[u8], DecodeError> {
        if at > self.offset {
            return Err(DecodeError::Eof { needed: len, remaining: 0 });
        }
        let remaining = self.offset - at;
        if len > remaining {
            Err(DecodeError::Eof { needed: len, remaining })
        } else {
            Ok(&self.data[at..at + len])
        }
    }

    /// Forget everything produced after `len`. Capacity is kept.
    pub fn truncate(&mut self, len: usize) {
        self.offset = self.offset.min(len);
    }

    pub fn clear(&mut self) {
        trace!(capacity = self.capacity(), len = self.offset, "clearing buffer");
        *self = Self::new();
    }

    fn reserve(&mut self, additional: usize) {
        let needed = self.offset + additional;
        let mut capacity = self.capacity();
        if needed <= capacity {
            return;
        }
        if capacity == 0 {
            capacity = DEFAULT_CAPACITY;
        }
        while needed > capacity {
            capacity *= 2;
        }
        trace!(from = self.capacity(), to = capacity, "growing buffer");
        self.data.resize(capacity, 0);
    }

}

impl Default for GrowableBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{GrowableBuffer, DEFAULT_CAPACITY};
    use crate::error::DecodeError;

    #[test]
    fn starts_with_default_capacity() {
        let buf = GrowableBuffer::new();
        assert_eq!(DEFAULT_CAPACITY, buf.capacity());
        assert_eq!(0, buf.len());
        assert!(buf.is_empty());
    }

    #[test]
    fn doubles_until_write_fits() {
        let mut buf = GrowableBuffer::new();
        buf.write(&[1; 16]);
        assert_eq!(16, buf.capacity());
        buf.push(2);
        assert_eq!(32, buf.capacity());
        buf.write(&[3; 100]);
        assert_eq!(128, buf.capacity());
        assert_eq!(117, buf.len());
        assert_eq!(&[1; 16][..], &buf.as_slice()[..16]);
        assert_eq!(2, buf.as_slice()[16]);
        assert!(buf.as_slice()[17..].iter().all(|b| *b == 3));
    }

    #[test]
    fn grows_from_zero_capacity() {
        let mut buf = GrowableBuffer::from_bytes(Vec::new());
        assert_eq!(0, buf.capacity());
        buf.write(&[7, 8, 9]);
        assert_eq!(DEFAULT_CAPACITY, buf.capacity());
        assert_eq!(&[7, 8, 9], buf.as_slice());
    }

    #[test]
    fn encode_excludes_spare_capacity() {
        let mut buf = GrowableBuffer::new();
        buf.write(&[1, 2, 3]);
        let snapshot = buf.encode();
        assert_eq!(vec![1, 2, 3], snapshot);
        buf.write(&[4]);
        assert_eq!(vec![1, 2, 3], snapshot);
        assert_eq!(vec![1, 2, 3, 4], buf.encode());
    }

    #[test]
    fn from_bytes_counts_as_written() {
        let buf = GrowableBuffer::from_bytes(vec![5, 6]);
        assert_eq!(2, buf.capacity());
        assert_eq!(2, buf.len());
        assert_eq!(vec![5, 6], buf.encode());
    }

    #[test]
    fn slice_is_bounds_checked() {
        let buf = GrowableBuffer::from_bytes(vec![1, 2, 3]);
        assert_eq!(Ok(&[2u8, 3][..]), buf.slice(1, 2));
        assert_eq!(Err(DecodeError::Eof { needed: 3, remaining: 2 }), buf.slice(1, 3));
        assert_eq!(Err(DecodeError::Eof { needed: 1, remaining: 0 }), buf.slice(7, 1));
        assert_eq!(Ok(&[][..]), buf.slice(3, 0));
        assert_eq!(Err(DecodeError::Eof { needed: 0, remaining: 0 }), buf.slice(7, 0));
        assert_eq!(Err(DecodeError::Eof { needed: 0, remaining: 0 }), GrowableBuffer::new().slice(10, 0));
    }

    #[test]
    fn truncate_keeps_capacity() {
        let mut buf = GrowableBuffer::new();
        buf.write(&[1; 20]);
        buf.truncate(5);
        assert_eq!(5, buf.len());
        assert_eq!(32, buf.capacity());
        buf.truncate(10);
        assert_eq!(5, buf.len());
        buf.push(9);
        assert_eq!(&[1, 1, 1, 1, 1, 9], buf.as_slice());
    }

    #[test]
    fn clear_restores_initial_state() {
        let mut buf = GrowableBuffer::new();
        buf.write(&[0; 40]);
        buf.clear();
        assert_eq!(GrowableBuffer::new(), buf);
    }

}
