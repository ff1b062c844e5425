// src/map/edge.rs
use std::io::{self, Read};
use byteorder::{LE, ReadBytesExt};

/// An edge record: indices of its two vertices, as little-endian `u16`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub start: usize,
    pub end: usize,
}

impl Edge {
    pub const STRIDE: usize = 4;

    pub fn from_lump<R: Read>(reader: &mut R) -> io::Result<Self> {
        Ok(Edge {
            start: reader.read_u16::<LE>()? as usize,
            end: reader.read_u16::<LE>()? as usize,
        })
    }

    /// The same edge with its vertex indices in ascending order.
    pub fn canonical(&self) -> Edge {
        Edge {
            start: self.start.min(self.end),
            end: self.start.max(self.end),
        }
    }
}
