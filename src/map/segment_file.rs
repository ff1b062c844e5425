// src/map/segment_file.rs
//! Plain-text segment files.
//!
//! One wall per line, `x1 y1 x2 y2` with an optional fifth field used as the
//! segment label. Blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! # room
//! 0 0 10 0
//! 10 0 10 10 east
//! ```

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::info;

use crate::bsp::{Point2D, Seg};
use crate::errors::SourceError;

/// Parse segment text. Endpoints are normalized so `start <= end` (x, then y);
/// unlabelled segments get their index among the kept lines as label.
pub fn parse_segments(text: &str) -> Result<Vec<Seg>, SourceError> {
    let mut segs = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() != 4 && fields.len() != 5 {
            return Err(SourceError::Parse {
                line: line_no + 1,
                message: format!("expected 4 coordinates and an optional label, found {} fields", fields.len()),
            });
        }

        let mut coords = [0.0f64; 4];
        for (slot, field) in coords.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|e| SourceError::Parse {
                line: line_no + 1,
                message: format!("`{}`: {}", field, e),
            })?;
        }

        let idx = segs.len();
        let label = fields.get(4).map_or_else(|| idx.to_string(), |l| l.to_string());
        segs.push(Seg::normalized(
            Point2D::new(coords[0], coords[1]),
            Point2D::new(coords[2], coords[3]),
            label,
            idx,
        ));
    }

    Ok(segs)
}

pub fn load_segments(path: impl AsRef<Path>) -> Result<Vec<Seg>, SourceError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let segs = parse_segments(&text)?;
    info!("Loaded {} segments from {}", segs.len(), path.display());
    Ok(segs)
}

/// Render segments back to the text format. Labels are written out.
pub fn format_segments(segs: &[Seg]) -> String {
    let mut out = String::new();
    for seg in segs {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{} {} {} {} {}", seg.start.x, seg.start.y, seg.end.x, seg.end.y, seg.id);
    }
    out
}

pub fn save_segments(path: impl AsRef<Path>, segs: &[Seg]) -> Result<(), SourceError> {
    fs::write(path, format_segments(segs))?;
    Ok(())
}
