// src/bsp/bsp_util.rs
// Geometry primitives, the sidedness predicate, classification and splitting.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::bsp::{SegPosition, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Lexicographic "x then y" ordering used to normalize segment endpoints.
    pub fn lex_gt(&self, other: &Point2D) -> bool {
        self.x > other.x || (self.x == other.x && self.y > other.y)
    }
}

/// An oriented wall segment.
///
/// `id` is a lineage label: input segments carry their own label and split
/// pieces carry a label derived from the parent and the partition. `origin`
/// is the index of the input segment a piece descends from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seg {
    pub start: Point2D,
    pub end: Point2D,
    pub id: String,
    pub origin: usize,
}

impl Seg {
    pub fn new(start: Point2D, end: Point2D, id: impl Into<String>, origin: usize) -> Self {
        Seg {
            start,
            end,
            id: id.into(),
            origin,
        }
    }

    /// Build a segment whose start is lexicographically <= its end.
    pub fn normalized(a: Point2D, b: Point2D, id: impl Into<String>, origin: usize) -> Self {
        if a.lex_gt(&b) {
            Seg::new(b, a, id, origin)
        } else {
            Seg::new(a, b, id, origin)
        }
    }

    pub fn is_normalized(&self) -> bool {
        !self.start.lex_gt(&self.end)
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    pub fn dx(&self) -> f64 {
        self.end.x - self.start.x
    }

    pub fn dy(&self) -> f64 {
        self.end.y - self.start.y
    }

    pub fn length(&self) -> f64 {
        self.dx().hypot(self.dy())
    }
}

/// Stable handle to a segment stored in a [`SegArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegHandle(usize);

impl SegHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns every segment a build touches: the inputs plus all split pieces.
/// Lists passed between tree levels are lists of handles into this arena.
#[derive(Debug, Default, Clone)]
pub struct SegArena {
    segs: Vec<Seg>,
}

impl SegArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        SegArena {
            segs: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, seg: Seg) -> SegHandle {
        self.segs.push(seg);
        SegHandle(self.segs.len() - 1)
    }

    pub fn get(&self, handle: SegHandle) -> Option<&Seg> {
        self.segs.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.segs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SegHandle, &Seg)> {
        self.segs.iter().enumerate().map(|(i, s)| (SegHandle(i), s))
    }
}

impl Index<SegHandle> for SegArena {
    type Output = Seg;

    fn index(&self, handle: SegHandle) -> &Seg {
        &self.segs[handle.0]
    }
}

/// Signed side of `point` relative to the infinite line through `partition`.
///
/// This is the cross product of `partition.end - partition.start` and
/// `point - partition.start`. Values `>= 0` are "front", `< 0` are "back".
/// The magnitude is partition length times perpendicular distance.
pub fn side_of(point: &Point2D, partition: &Seg) -> f64 {
    let dx = partition.end.x - partition.start.x;
    let dy = partition.end.y - partition.start.y;
    dx * (point.y - partition.start.y) - dy * (point.x - partition.start.x)
}

/// Classify `seg` against the line through `partition`.
///
/// Front is tested before Back, so a segment touching the line with its
/// other endpoint in front is Front, and a segment lying on the line is Front.
pub fn classify(seg: &Seg, partition: &Seg) -> SegPosition {
    let start_side = side_of(&seg.start, partition);
    let end_side = side_of(&seg.end, partition);

    if start_side >= 0.0 && end_side >= 0.0 {
        SegPosition::Front
    } else if start_side <= 0.0 && end_side <= 0.0 {
        SegPosition::Back
    } else {
        SegPosition::Split
    }
}

/// Outcome of [`split_seg`].
#[derive(Debug, Clone, PartialEq)]
pub enum SplitResult {
    /// The segment crosses the line: the piece holding the front endpoint
    /// and the piece holding the back endpoint.
    Pieces { front: Seg, back: Seg },
    /// Parallel lines, or an intersection at (or beyond) an endpoint.
    Unsplit,
}

/// Cut `seg` where it crosses the line through `partition`.
///
/// Pieces are `[start, I]` and `[I, end]`; they keep `origin` and get
/// labels `"{seg}/{partition}-front"` and `"{seg}/{partition}-back"`.
pub fn split_seg(seg: &Seg, partition: &Seg) -> SplitResult {
    let (rx, ry) = (seg.dx(), seg.dy());
    let (sx, sy) = (partition.dx(), partition.dy());

    let denominator = rx * sy - ry * sx;
    if denominator.abs() < EPSILON {
        return SplitResult::Unsplit;
    }

    let qx = partition.start.x - seg.start.x;
    let qy = partition.start.y - seg.start.y;
    let t = (qx * sy - qy * sx) / denominator;
    if !(t > 0.0 && t < 1.0) {
        return SplitResult::Unsplit;
    }

    let intersection = Point2D::new(seg.start.x + t * rx, seg.start.y + t * ry);
    if intersection.distance_to(&seg.start) < EPSILON || intersection.distance_to(&seg.end) < EPSILON {
        return SplitResult::Unsplit;
    }

    let head = Seg::new(seg.start, intersection, String::new(), seg.origin);
    let tail = Seg::new(intersection, seg.end, String::new(), seg.origin);

    let (mut front, mut back) = if side_of(&seg.start, partition) >= 0.0 {
        (head, tail)
    } else {
        (tail, head)
    };
    front.id = format!("{}/{}-front", seg.id, partition.id);
    back.id = format!("{}/{}-back", seg.id, partition.id);

    SplitResult::Pieces { front, back }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::new_empty()
    }
}

impl BoundingBox {
    pub fn new_empty() -> Self {
        BoundingBox {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox { min_x, min_y, max_x, max_y }
    }

    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    pub fn expand_point(&mut self, p: &Point2D) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub fn combine(&mut self, other: &BoundingBox) {
        self.min_x = self.min_x.min(other.min_x);
        self.min_y = self.min_y.min(other.min_y);
        self.max_x = self.max_x.max(other.max_x);
        self.max_y = self.max_y.max(other.max_y);
    }

    pub fn from_segs<'a>(segs: impl IntoIterator<Item = &'a Seg>) -> Self {
        let mut bbox = BoundingBox::new_empty();
        for seg in segs {
            bbox.expand_point(&seg.start);
            bbox.expand_point(&seg.end);
        }
        bbox
    }

    // Check if the bounding box contains a point
    pub fn contains_point(&self, p: &Point2D) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64, id: &str) -> Seg {
        Seg::new(Point2D::new(x1, y1), Point2D::new(x2, y2), id, 0)
    }

    fn random_point(rng: &mut StdRng) -> Point2D {
        Point2D::new(rng.random_range(-100.0..100.0), rng.random_range(-100.0..100.0))
    }

    // Snaps near-zero sides to the line before classifying.
    fn classify_within_epsilon(s: &Seg, partition: &Seg) -> SegPosition {
        let scale = partition.length().max(1.0);
        let snap = |v: f64| if v.abs() < EPSILON * scale { 0.0 } else { v };
        let a = snap(side_of(&s.start, partition));
        let b = snap(side_of(&s.end, partition));
        if a >= 0.0 && b >= 0.0 {
            SegPosition::Front
        } else if a <= 0.0 && b <= 0.0 {
            SegPosition::Back
        } else {
            SegPosition::Split
        }
    }

    #[test]
    fn test_side_of_signs() {
        let partition = seg(0.0, 0.0, 10.0, 0.0, "p");
        assert!(side_of(&Point2D::new(3.0, 2.0), &partition) > 0.0);
        assert!(side_of(&Point2D::new(3.0, -2.0), &partition) < 0.0);
        assert_eq!(side_of(&Point2D::new(42.0, 0.0), &partition), 0.0);
        // Unnormalized: length 10 times distance 2.
        assert_approx_eq!(side_of(&Point2D::new(3.0, 2.0), &partition), 20.0);
    }

    #[test]
    fn test_side_of_antisymmetry() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let a = random_point(&mut rng);
            let b = random_point(&mut rng);
            let p = random_point(&mut rng);
            let forward = Seg::new(a, b, "ab", 0);
            let reverse = Seg::new(b, a, "ba", 0);
            assert_approx_eq!(side_of(&p, &forward), -side_of(&p, &reverse), 1e-9);
        }
    }

    #[test]
    fn test_classify_front_back_split() {
        let partition = seg(0.0, 0.0, 0.0, 10.0, "p");
        // Direction (0, 10): side_of = -10 * x, so negative x is front.
        assert_eq!(classify(&seg(-3.0, 1.0, -1.0, 5.0, "a"), &partition), SegPosition::Front);
        assert_eq!(classify(&seg(1.0, 1.0, 3.0, 5.0, "b"), &partition), SegPosition::Back);
        assert_eq!(classify(&seg(-1.0, 1.0, 1.0, 1.0, "c"), &partition), SegPosition::Split);
    }

    #[test]
    fn test_classify_boundary_ties() {
        let partition = seg(0.0, 0.0, 10.0, 0.0, "p");
        // One endpoint on the line, the other in front.
        assert_eq!(classify(&seg(2.0, 0.0, 2.0, 4.0, "a"), &partition), SegPosition::Front);
        // One endpoint on the line, the other behind.
        assert_eq!(classify(&seg(2.0, -4.0, 2.0, 0.0, "b"), &partition), SegPosition::Back);
        // Collinear segments resolve to Front.
        assert_eq!(classify(&seg(20.0, 0.0, 30.0, 0.0, "c"), &partition), SegPosition::Front);
    }

    #[test]
    fn test_split_crossing_segment() {
        let s = seg(0.0, 0.0, 10.0, 0.0, "7");
        let partition = seg(5.0, -5.0, 5.0, 5.0, "3");
        assert_eq!(classify(&s, &partition), SegPosition::Split);

        match split_seg(&s, &partition) {
            SplitResult::Pieces { front, back } => {
                assert_eq!(front.start, Point2D::new(0.0, 0.0));
                assert_eq!(front.end, Point2D::new(5.0, 0.0));
                assert_eq!(back.start, Point2D::new(5.0, 0.0));
                assert_eq!(back.end, Point2D::new(10.0, 0.0));
                assert_eq!(front.id, "7/3-front");
                assert_eq!(back.id, "7/3-back");
            }
            SplitResult::Unsplit => panic!("expected a split"),
        }
    }

    #[test]
    fn test_split_orders_pieces_by_side() {
        // Start is behind the partition, so the tail piece is the front one.
        let s = seg(0.0, 0.0, 10.0, 0.0, "s");
        let partition = seg(5.0, 5.0, 5.0, -5.0, "p");
        match split_seg(&s, &partition) {
            SplitResult::Pieces { front, back } => {
                assert_eq!(front.start, Point2D::new(5.0, 0.0));
                assert_eq!(front.end, Point2D::new(10.0, 0.0));
                assert_eq!(back.end, Point2D::new(5.0, 0.0));
            }
            SplitResult::Unsplit => panic!("expected a split"),
        }
    }

    #[test]
    fn test_split_parallel_is_unsplit() {
        let s = seg(0.0, 1.0, 10.0, 1.0, "s");
        let partition = seg(0.0, 0.0, 4.0, 0.0, "p");
        assert_eq!(split_seg(&s, &partition), SplitResult::Unsplit);
    }

    #[test]
    fn test_split_at_endpoint_is_unsplit() {
        let s = seg(5.0, 0.0, 10.0, 0.0, "s");
        let partition = seg(5.0, -5.0, 5.0, 5.0, "p");
        assert_eq!(split_seg(&s, &partition), SplitResult::Unsplit);
    }

    #[test]
    fn test_split_is_deterministic() {
        let s = seg(0.3, 0.1, 9.7, 3.3, "s");
        let partition = seg(4.1, -2.0, 5.9, 7.5, "p");
        assert_eq!(split_seg(&s, &partition), split_seg(&s, &partition));
    }

    #[test]
    fn test_split_pieces_tile_and_reclassify() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut checked = 0;
        while checked < 300 {
            let s = Seg::new(random_point(&mut rng), random_point(&mut rng), "s", 0);
            let partition = Seg::new(random_point(&mut rng), random_point(&mut rng), "p", 0);
            if classify(&s, &partition) != SegPosition::Split {
                continue;
            }
            let SplitResult::Pieces { front, back } = split_seg(&s, &partition) else {
                continue;
            };
            checked += 1;

            assert_eq!(classify_within_epsilon(&front, &partition), SegPosition::Front);
            assert_eq!(classify_within_epsilon(&back, &partition), SegPosition::Back);

            // Project onto the original direction: the pieces cover [0, len]
            // and share exactly one parameter value.
            let len2 = s.dx() * s.dx() + s.dy() * s.dy();
            let project = |p: &Point2D| ((p.x - s.start.x) * s.dx() + (p.y - s.start.y) * s.dy()) / len2;
            let mut spans = [
                (project(&front.start), project(&front.end)),
                (project(&back.start), project(&back.end)),
            ];
            spans.sort_by(|a, b| a.0.total_cmp(&b.0));
            assert_approx_eq!(spans[0].0, 0.0, 1e-12);
            assert_approx_eq!(spans[1].1, 1.0, 1e-12);
            assert_eq!(spans[0].1, spans[1].0);
        }
    }

    #[test]
    fn test_normalized_orders_endpoints() {
        let s = Seg::normalized(Point2D::new(4.0, 1.0), Point2D::new(2.0, 9.0), "n", 0);
        assert_eq!(s.start, Point2D::new(2.0, 9.0));
        assert!(s.is_normalized());

        let vertical = Seg::normalized(Point2D::new(1.0, 5.0), Point2D::new(1.0, 2.0), "v", 1);
        assert_eq!(vertical.start, Point2D::new(1.0, 2.0));
    }

    #[test]
    fn test_arena_handles_distinguish_equal_segments() {
        let mut arena = SegArena::new();
        let a = arena.push(seg(0.0, 0.0, 1.0, 1.0, "x"));
        let b = arena.push(seg(0.0, 0.0, 1.0, 1.0, "x"));
        assert_ne!(a, b);
        assert_eq!(arena[a], arena[b]);
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn test_bounding_box_from_segs() {
        let segs = [seg(0.0, 0.0, 4.0, 2.0, "a"), seg(-1.0, 3.0, 2.0, 5.0, "b")];
        let bbox = BoundingBox::from_segs(segs.iter());
        assert_eq!(bbox, BoundingBox::new(-1.0, 0.0, 4.0, 5.0));
        assert!(bbox.contains_point(&Point2D::new(0.0, 4.0)));
        assert!(!BoundingBox::new_empty().contains_point(&Point2D::new(0.0, 0.0)));
    }
}
