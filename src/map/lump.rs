// src/map/lump.rs
// Decoding of raw vertex and edge lumps into wall segments.

use std::collections::HashSet;
use std::io::Cursor;

use log::info;

use crate::bsp::{Point2D, Seg};
use crate::errors::SourceError;
use crate::map::{Edge, Vertex};

/// Edges shorter than this on both axes are trim, not walls.
pub const DEFAULT_MIN_EXTENT: f64 = 10.0;

fn check_stride(lump: &'static str, data: &[u8], stride: usize) -> Result<usize, SourceError> {
    if data.len() % stride != 0 {
        return Err(SourceError::TruncatedLump {
            lump,
            len: data.len(),
            stride,
        });
    }
    Ok(data.len() / stride)
}

pub fn parse_vertices(data: &[u8]) -> Result<Vec<Vertex>, SourceError> {
    let count = check_stride("VERTICES", data, Vertex::STRIDE)?;
    let mut reader = Cursor::new(data);
    let vertices = (0..count)
        .map(|_| Vertex::from_lump(&mut reader))
        .collect::<Result<Vec<_>, _>>()?;
    info!("Parsed {} vertices", vertices.len());
    Ok(vertices)
}

pub fn parse_edges(data: &[u8]) -> Result<Vec<Edge>, SourceError> {
    let count = check_stride("EDGES", data, Edge::STRIDE)?;
    let mut reader = Cursor::new(data);
    let edges = (0..count)
        .map(|_| Edge::from_lump(&mut reader))
        .collect::<Result<Vec<_>, _>>()?;
    info!("Parsed {} edges", edges.len());
    Ok(edges)
}

/// Turn edges into normalized wall segments.
///
/// Edges whose horizontal and vertical extents are both `<= min_extent` are
/// dropped, and an edge listed twice (in either direction) is kept once.
/// Labels are the index in the returned list.
pub fn edges_to_segments(vertices: &[Vertex], edges: &[Edge], min_extent: f64) -> Result<Vec<Seg>, SourceError> {
    let mut seen = HashSet::with_capacity(edges.len());
    let mut segs = Vec::new();

    for (i, edge) in edges.iter().enumerate() {
        let lookup = |index: usize| {
            vertices.get(index).ok_or(SourceError::BadVertexIndex {
                edge: i,
                index,
                count: vertices.len(),
            })
        };
        let a = lookup(edge.start)?;
        let b = lookup(edge.end)?;

        let (ax, ay, bx, by) = (a.x as f64, a.y as f64, b.x as f64, b.y as f64);
        if (ax - bx).abs() <= min_extent && (ay - by).abs() <= min_extent {
            continue;
        }
        if !seen.insert(edge.canonical()) {
            continue;
        }

        let idx = segs.len();
        segs.push(Seg::normalized(Point2D::new(ax, ay), Point2D::new(bx, by), idx.to_string(), idx));
    }

    info!("Kept {} of {} edges as walls", segs.len(), edges.len());
    Ok(segs)
}
