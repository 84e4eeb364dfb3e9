//! Vectors and rotations are not framed: they are their components written as consecutive `f32`s,
//! `x, y, z` for a `Vector3` and `x, y, z, w` for a `Quaternion`.

use crate::collection::Primitive;
use crate::error::{DecoderError, EncodeError};
use crate::stream::BridgeStream;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::IDENTITY
    }
}

impl BridgeStream {

    pub fn write_vector3(&mut self, value: &Vector3) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
    }

    pub fn read_vector3(&mut self) -> Result<Vector3, DecoderError> {
        self.transact(|s| Ok(Vector3::new(s.read_f32()?, s.read_f32()?, s.read_f32()?)))
    }

    pub fn write_quaternion(&mut self, value: &Quaternion) {
        self.write_f32(value.x);
        self.write_f32(value.y);
        self.write_f32(value.z);
        self.write_f32(value.w);
    }

    pub fn read_quaternion(&mut self) -> Result<Quaternion, DecoderError> {
        self.transact(|s| Ok(Quaternion::new(s.read_f32()?, s.read_f32()?, s.read_f32()?, s.read_f32()?)))
    }

}

impl Primitive for Vector3 {
    fn write_to(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        stream.write_vector3(self);
        Ok(())
    }

    fn read_from(stream: &mut BridgeStream) -> Result<Self, DecoderError> {
        stream.read_vector3()
    }
}

impl Primitive for Quaternion {
    fn write_to(&self, stream: &mut BridgeStream) -> Result<(), EncodeError> {
        stream.write_quaternion(self);
        Ok(())
    }

    fn read_from(stream: &mut BridgeStream) -> Result<Self, DecoderError> {
        stream.read_quaternion()
    }
}
