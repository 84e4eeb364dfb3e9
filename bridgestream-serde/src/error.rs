use std;
use std::fmt::{self, Display};
use serde::{de, ser};
use bridgestream::{DecoderError, EncodeError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    // Decode
    Decode(DecoderError),
    Trailing(usize),
    Char,
    // Encode
    Length,
    Encode(EncodeError),
    // Both
    Int,
    Unsupported(&'static str),
    Message(String),
}

impl Error {
    /// Shift the position of a decode error raised inside a struct's frame onto the parent stream.
    pub(crate) fn within(self, frame_start: usize) -> Error {
        match self {
            Error::Decode(e) => Error::Decode(e.within(frame_start)),
            o => o,
        }
    }
}

impl ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Message(msg) => fmt.write_str(msg),
            Error::Encode(e) => write!(fmt, "Encoding error: {}", e),
            Error::Decode(e) => write!(fmt, "Decoding error: {}", e),
            Error::Length => fmt.write_str("Length required"),
            Error::Trailing(at) => write!(fmt, "Trailing bytes in input after position {}", at),
            Error::Char => fmt.write_str("String did not contain exactly one character"),
            Error::Int => fmt.write_str("Integer didn't fit into target type"),
            Error::Unsupported(what) => write!(fmt, "{} is not supported by the bridgestream wire format", what),
        }
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Error {
        Error::Encode(e)
    }
}

impl From<DecoderError> for Error {
    fn from(e: DecoderError) -> Error {
        Error::Decode(e)
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(_e: std::num::TryFromIntError) -> Error {
        Error::Int
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            Error::Encode(e) => Some(e),
            _ => None,
        }
    }
}
