// src/map/merge.rs
// Merging of collinear walls that overlap or touch, run before building a tree.

use std::collections::HashMap;

use log::info;

use crate::bsp::{Point2D, Seg};
use crate::utils::geometry::Vector2D;

/// Tolerance used when the caller has no better one.
pub const DEFAULT_MERGE_EPSILON: f64 = 1e-4;

fn same_line(a: &Seg, b: &Seg, epsilon: f64) -> bool {
    let dir_a = Vector2D::of_seg(a).normalize();
    let dir_b = Vector2D::of_seg(b).normalize();
    if (dir_a.dot(&dir_b).abs() - 1.0).abs() > epsilon {
        return false;
    }
    // Perpendicular distance of b's start from a's line.
    dir_a.cross(&Vector2D::between(&a.start, &b.start)).abs() < epsilon
}

fn overlapping_or_touching(a: &Seg, b: &Seg, epsilon: f64) -> bool {
    if !same_line(a, b, epsilon) {
        return false;
    }
    let dir = Vector2D::of_seg(a).normalize();
    let (p1, p2) = (dir.project(&a.start), dir.project(&a.end));
    let (q1, q2) = (dir.project(&b.start), dir.project(&b.end));
    let (lo_a, hi_a) = (p1.min(p2), p1.max(p2));
    let (lo_b, hi_b) = (q1.min(q2), q1.max(q2));
    !(hi_b < lo_a - epsilon || lo_b > hi_a + epsilon)
}

// Hull of two collinear segments along a's direction.
fn merge_pair(a: &Seg, b: &Seg) -> Seg {
    let dir = Vector2D::of_seg(a).normalize();
    let mut points: [Point2D; 4] = [a.start, a.end, b.start, b.end];
    points.sort_by(|p, q| dir.project(p).total_cmp(&dir.project(q)));
    Seg::normalized(points[0], points[3], a.id.clone(), a.origin)
}

// Exact slope of a normalized segment; vertical walls share one key.
fn slope_key(seg: &Seg) -> u64 {
    let slope = if seg.dx() == 0.0 { f64::INFINITY } else { seg.dy() / seg.dx() };
    // Fold -0.0 into 0.0.
    (slope + 0.0).to_bits()
}

/// Merge overlapping or touching collinear segments into single walls.
///
/// Segments are grouped by slope, sorted within each group, and greedily
/// merged into the running hull until nothing else touches it. The result is
/// normalized and relabeled by position.
pub fn merge_collinear(segs: &[Seg], epsilon: f64) -> Vec<Seg> {
    let mut order: Vec<u64> = Vec::new();
    let mut groups: HashMap<u64, Vec<Seg>> = HashMap::new();
    for seg in segs {
        let seg = Seg::normalized(seg.start, seg.end, seg.id.clone(), seg.origin);
        let key = slope_key(&seg);
        groups
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(seg);
    }

    let mut merged = Vec::with_capacity(segs.len());
    for key in order {
        let Some(mut group) = groups.remove(&key) else {
            continue;
        };
        group.sort_by(|a, b| {
            a.start
                .x
                .total_cmp(&b.start.x)
                .then(a.start.y.total_cmp(&b.start.y))
                .then(a.end.x.total_cmp(&b.end.x))
                .then(a.end.y.total_cmp(&b.end.y))
        });

        let mut rest = group;
        while !rest.is_empty() {
            let mut current = rest.remove(0);
            let mut i = 0;
            while i < rest.len() {
                if overlapping_or_touching(&current, &rest[i], epsilon) {
                    current = merge_pair(&current, &rest[i]);
                    rest.remove(i);
                    // The hull grew; earlier misses may touch now.
                    i = 0;
                } else {
                    i += 1;
                }
            }
            merged.push(current);
        }
    }

    for (idx, seg) in merged.iter_mut().enumerate() {
        seg.id = idx.to_string();
        seg.origin = idx;
    }
    info!("Merged {} segments into {}", segs.len(), merged.len());
    merged
}
