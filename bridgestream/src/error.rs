use std::fmt::{Display, Formatter, self};

/// A `DecodeError` together with the absolute input position of the read that failed.
#[derive(Debug, PartialEq)]
pub struct DecoderError {
    inner: DecodeError,
    at: usize,
}

impl DecoderError {
    pub fn into_inner(self) -> DecodeError {
        self.inner
    }

    pub fn inner(&self) -> &DecodeError {
        &self.inner
    }

    /// The offset of the failed read, counted from the start of the outermost stream.
    pub fn position(&self) -> usize {
        self.at
    }

    /// Rebase an error raised inside a nested frame onto the offsets of its parent, given the
    /// parent offset at which the frame's payload starts.
    pub fn within(self, frame_start: usize) -> DecoderError {
        DecoderError { inner: self.inner, at: self.at + frame_start }
    }
}

impl std::error::Error for DecoderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
       Some(&self.inner)
    }
}

impl Display for DecoderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} at input position {}", self.inner, self.at)
    }
}

#[derive(Debug, PartialEq)]
pub enum DecodeError {
    /// A read would move past the end of the stream.
    Eof { needed: usize, remaining: usize },
    Utf8(std::str::Utf8Error),
    /// A length or count prefix was negative.
    Length(i32),
    Allocation,
}

impl DecodeError {
    pub fn at(self, at: usize) -> DecoderError {
        DecoderError { inner: self, at }
    }
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(e: std::str::Utf8Error) -> DecodeError {
        DecodeError::Utf8(e)
    }
}

impl From<std::collections::TryReserveError> for DecodeError {
    fn from(_e: std::collections::TryReserveError) -> DecodeError {
        DecodeError::Allocation
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Utf8(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            DecodeError::Eof { needed, remaining } => write!(f, "Unexpected end of stream: needed {} bytes but only {} remain", needed, remaining),
            DecodeError::Utf8(e) => write!(f, "String slice was not valid Utf-8: {}", e),
            DecodeError::Length(value) => write!(f, "Negative length prefix {}", value),
            DecodeError::Allocation => f.write_str("An allocation failed"),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum EncodeError {
    /// The length of a string, blob, sequence or frame does not fit the int32 prefix.
    Length(usize),
}

impl std::error::Error for EncodeError {}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            EncodeError::Length(value) => write!(f, "Length {} exceeds maximum {}", value, i32::MAX),
        }
    }
}
