// src/map/mod.rs
//! Segment sources: text files, raw vertex/edge lumps, and the collinear
//! merge pass that cleans their output before a build.
pub mod edge;
pub mod lump;
pub mod merge;
pub mod segment_file;
pub mod vertex;

pub use edge::Edge;
pub use lump::{edges_to_segments, parse_edges, parse_vertices};
pub use merge::merge_collinear;
pub use segment_file::{load_segments, parse_segments, save_segments};
pub use vertex::Vertex;
