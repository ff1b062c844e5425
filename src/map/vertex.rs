// src/map/vertex.rs
use std::io::{self, Read};
use byteorder::{LE, ReadBytesExt};

/// A map vertex as stored in a vertex lump: three little-endian `f32`s.
/// Only `x` and `y` take part in partitioning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vertex {
    pub const STRIDE: usize = 12;

    pub fn from_lump<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Vertex {
            x: reader.read_f32::<LE>()?,
            y: reader.read_f32::<LE>()?,
            z: reader.read_f32::<LE>()?,
        })
    }
}
