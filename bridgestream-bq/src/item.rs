use bridgestream::{BridgeStream, DecoderError, EncodeError};
use std::fmt::{self, Display, Formatter};

/// A decoded value, or one parsed from its textual form.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Byte(u8),
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
    Bytes(Vec<u8>),
    /// Count prefixed elements.
    List(Vec<Item>),
    /// A length prefixed frame, as written for a composite.
    Frame(Vec<Item>),
    /// The empty frame.
    Null,
    /// Consecutive values without any prefix, e.g. the components of a vector.
    Tuple(Vec<Item>),
}

impl Item {

    pub fn encode(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        match self {
            Item::Byte(v) => stream.write_byte(*v),
            Item::Bool(v) => stream.write_bool(*v),
            Item::Int(v) => stream.write_i32(*v),
            Item::Float(v) => stream.write_f32(*v),
            Item::Str(v) => stream.write_str(v)?,
            Item::Bytes(v) => stream.write_bytes(v)?,
            Item::List(items) => {
                stream.write_len(items.len())?;
                Item::encode_all(items, stream)?;
            },
            Item::Frame(items) => {
                let mut frame = BridgeStream::new();
                Item::encode_all(items, &mut frame)?;
                stream.write_stream(Some(&frame))?;
            },
            Item::Null => stream.write_stream(None)?,
            Item::Tuple(items) => Item::encode_all(items, stream)?,
        }
        Ok(())
    }

    pub fn encode_all(items: &[Item], stream: &mut BridgeStream) -> Result<(), EncodeError> {
        items.iter().try_for_each(|item| item.encode(stream))
    }

}

fn join(f: &mut Formatter<'_>, open: &str, items: &[Item], close: &str) -> fmt::Result {
    f.write_str(open)?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str(close)
}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Item::Byte(v) => write!(f, "#{}", v),
            Item::Bool(v) => write!(f, "{}", v),
            Item::Int(v) => write!(f, "{}", v),
            Item::Float(v) => write!(f, "${}", v),
            Item::Str(v) => write!(f, "\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")),
            Item::Bytes(v) => write!(f, ":{}", base64::encode(v)),
            Item::List(items) => join(f, "[", items, "]"),
            Item::Frame(items) => join(f, "{", items, "}"),
            Item::Null => f.write_str("null"),
            Item::Tuple(items) => join(f, "(", items, ")"),
        }
    }
}

/// Describes how to interpret the bytes of a stream, since they carry no type information.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Byte,
    Bool,
    I32,
    F32,
    Str,
    Bin,
    Vec3,
    Quat,
    List(Box<Layout>),
    Frame(Vec<Layout>),
    /// Decode the inner layout for as long as the stream has bytes left.
    Repeat(Box<Layout>),
}

impl Layout {

    pub fn decode(&self, stream: &mut BridgeStream, out: &mut Vec<Item>) -> Result<(), DecoderError> {
        let item = match self {
            Layout::Byte => Item::Byte(stream.read_byte()?),
            Layout::Bool => Item::Bool(stream.read_bool()?),
            Layout::I32 => Item::Int(stream.read_i32()?),
            Layout::F32 => Item::Float(stream.read_f32()?),
            Layout::Str => Item::Str(stream.read_string()?),
            Layout::Bin => Item::Bytes(stream.read_bytes()?),
            Layout::Vec3 => {
                let v = stream.read_vector3()?;
                Item::Tuple(vec![Item::Float(v.x), Item::Float(v.y), Item::Float(v.z)])
            },
            Layout::Quat => {
                let q = stream.read_quaternion()?;
                Item::Tuple(vec![Item::Float(q.x), Item::Float(q.y), Item::Float(q.z), Item::Float(q.w)])
            },
            Layout::List(inner) => {
                let count = stream.read_len()?;
                let mut items = Vec::new();
                for _ in 0..count {
                    inner.decode(stream, &mut items)?;
                }
                Item::List(items)
            },
            Layout::Frame(layouts) => {
                let mut frame = stream.read_stream()?;
                if frame.is_empty() {
                    Item::Null
                } else {
                    let start = stream.position() - frame.len();
                    Item::Frame(Layout::decode_all(layouts, &mut frame).map_err(|e| e.within(start))?)
                }
            },
            Layout::Repeat(inner) => {
                while stream.has_more() {
                    inner.decode(stream, out)?;
                }
                return Ok(());
            },
        };
        out.push(item);
        Ok(())
    }

    pub fn decode_all(layouts: &[Layout], stream: &mut BridgeStream) -> Result<Vec<Item>, DecoderError> {
        let mut items = Vec::new();
        for layout in layouts {
            layout.decode(stream, &mut items)?;
        }
        Ok(items)
    }

}

#[cfg(test)]
mod tests {
    use super::{Item, Layout};
    use bridgestream::{BridgeStream, Vector3};

    #[test]
    fn display() {
        let item = Item::Frame(vec![
            Item::Int(-3),
            Item::Byte(255),
            Item::Float(1.5),
            Item::Str("say \"hi\"".into()),
            Item::Bytes(vec![0, 1, 2]),
            Item::List(vec![Item::Bool(true), Item::Bool(false)]),
            Item::Null,
            Item::Tuple(vec![]),
        ]);
        assert_eq!(r#"{-3, #255, $1.5, "say \"hi\"", :AAEC, [true, false], null, ()}"#, item.to_string());
    }

    #[test]
    fn encode() {
        let mut stream = BridgeStream::new();
        Item::encode_all(&[
            Item::Int(10),
            Item::List(vec![Item::Byte(7)]),
            Item::Frame(vec![Item::Bool(true)]),
            Item::Null,
        ], &mut stream).unwrap();
        assert_eq!(vec![
            10, 0, 0, 0,
            1, 0, 0, 0, 7,
            1, 0, 0, 0, 1,
            0, 0, 0, 0,
        ], stream.encode());
    }

    #[test]
    fn decode() {
        let mut stream = BridgeStream::new();
        stream.write_i32(10);
        stream.write_str("şerhat").unwrap();
        stream.write_vector3(&Vector3::new(1.0, 2.0, 3.0));
        stream.write_stream(None).unwrap();
        let layouts = vec![
            Layout::I32,
            Layout::Str,
            Layout::Vec3,
            Layout::Frame(vec![Layout::I32]),
        ];
        let items = Layout::decode_all(&layouts, &mut BridgeStream::from_bytes(stream.encode())).unwrap();
        assert_eq!(vec![
            Item::Int(10),
            Item::Str("şerhat".into()),
            Item::Tuple(vec![Item::Float(1.0), Item::Float(2.0), Item::Float(3.0)]),
            Item::Null,
        ], items);
    }

    #[test]
    fn repeat_until_exhausted() {
        let mut stream = BridgeStream::new();
        for i in 0..3 {
            stream.write_i32(i);
        }
        let items = Layout::decode_all(&[Layout::Repeat(Box::new(Layout::I32))], &mut BridgeStream::from_bytes(stream.encode())).unwrap();
        assert_eq!(vec![Item::Int(0), Item::Int(1), Item::Int(2)], items);
    }

    #[test]
    fn nested_error_position() {
        let mut stream = BridgeStream::new();
        stream.write_i32(7);
        stream.write_stream(Some(&BridgeStream::from_bytes(vec![1, 2]))).unwrap();
        let layouts = [Layout::I32, Layout::Frame(vec![Layout::I32])];
        let err = Layout::decode_all(&layouts, &mut BridgeStream::from_bytes(stream.encode())).unwrap_err();
        assert_eq!(8, err.position());
    }

}
