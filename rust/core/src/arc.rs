// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared arc storage and signed arc references.
//!
//! An arc is a polyline of at least two vertices, stored exactly once in an
//! [`ArcStore`]. Shapes never hold coordinates for their paths; they hold
//! [`ArcRef`]s, which name an arc id plus a traversal direction.
//!
//! ## Reference encoding
//!
//! `ArcRef` wraps a signed integer. A non-negative value `i` means "arc `i`,
//! forward"; the bitwise complement `!i` (that is `-i - 1`) means "arc `i`,
//! reversed". Complementing twice gives the original reference back, so
//! reversing a path is just reversing the order of its references and
//! complementing each one.
//!
//! ## Storage layout
//!
//! Vertices of all arcs live in two flat coordinate buffers (`xx`, `yy`) with
//! an offset table, so a dataset with millions of vertices costs three
//! allocations instead of one per arc.

use std::fmt;
use std::ops::Not;

use crate::bounds::Bounds;
use crate::error::{Error, Result};

/// A 2D coordinate pair `[x, y]`.
pub type Point = [f64; 2];

/// Hashable identity of a coordinate (exact bit pattern, `-0.0` folded into `0.0`).
pub type CoordKey = (u64, u64);

/// Returns the exact-match hash key of a coordinate.
///
/// Two points get the same key only if their coordinates are bitwise equal,
/// with the single exception that negative zero is treated as zero.
#[inline]
pub fn coord_key(p: Point) -> CoordKey {
    let norm = |v: f64| if v == 0.0 { 0.0f64.to_bits() } else { v.to_bits() };
    (norm(p[0]), norm(p[1]))
}

/// A directed reference to an arc in an [`ArcStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ArcRef(i32);

impl ArcRef {
    /// Reference that traverses arc `id` in stored order.
    #[inline]
    pub fn forward(id: usize) -> Self {
        debug_assert!(id <= i32::MAX as usize, "arc id {id} overflows i32");
        ArcRef(id as i32)
    }

    /// Reference that traverses arc `id` from its last vertex to its first.
    #[inline]
    pub fn reversed(id: usize) -> Self {
        !Self::forward(id)
    }

    /// Builds a reference from its raw signed encoding.
    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        ArcRef(raw)
    }

    /// Returns the raw signed encoding.
    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Returns the referenced arc id, regardless of direction.
    #[inline]
    pub fn id(self) -> usize {
        if self.0 < 0 {
            (!self.0) as usize
        } else {
            self.0 as usize
        }
    }

    /// Returns `true` if the arc is traversed against its stored order.
    #[inline]
    pub const fn is_reversed(self) -> bool {
        self.0 < 0
    }

    /// Returns a reference to the same arc with the same direction as `self`
    /// but pointing at `id`.
    #[inline]
    pub fn with_id(self, id: usize) -> Self {
        if self.is_reversed() {
            Self::reversed(id)
        } else {
            Self::forward(id)
        }
    }
}

impl Not for ArcRef {
    type Output = ArcRef;

    #[inline]
    fn not(self) -> ArcRef {
        ArcRef(!self.0)
    }
}

impl fmt::Display for ArcRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_reversed() {
            write!(f, "~{}", self.id())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Reverses a path in place: reverses the order and flips every reference.
pub fn reverse_path(path: &mut [ArcRef]) {
    path.reverse();
    for r in path.iter_mut() {
        *r = !*r;
    }
}

/// Flat, deduplicated storage of arcs addressed by dense ids `0..len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcStore {
    xx: Vec<f64>,
    yy: Vec<f64>,
    /// `offsets[i]..offsets[i + 1]` is the vertex range of arc `i`.
    offsets: Vec<usize>,
}

impl ArcStore {
    /// Creates an empty arc store.
    pub fn new() -> Self {
        Self {
            xx: Vec::new(),
            yy: Vec::new(),
            offsets: vec![0],
        }
    }

    /// Creates an empty arc store with room for `arcs` arcs and `vertices` vertices.
    pub fn with_capacity(arcs: usize, vertices: usize) -> Self {
        let mut offsets = Vec::with_capacity(arcs + 1);
        offsets.push(0);
        Self {
            xx: Vec::with_capacity(vertices),
            yy: Vec::with_capacity(vertices),
            offsets,
        }
    }

    /// Builds a store from vertex sequences, validating every arc.
    ///
    /// # Example
    ///
    /// ```
    /// use arc_lite_core::{ArcRef, ArcStore};
    ///
    /// let arcs = ArcStore::from_paths(vec![vec![[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]]]).unwrap();
    /// assert_eq!(arcs.len(), 1);
    /// assert_eq!(arcs.first_point(ArcRef::reversed(0)), [1.0, 1.0]);
    /// ```
    pub fn from_paths<I, P>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[Point]>,
    {
        let mut store = Self::new();
        for path in paths {
            store.push_arc(path.as_ref().iter().copied());
        }
        store.validate()?;
        Ok(store)
    }

    /// Appends an arc and returns its id. The caller guarantees at least two
    /// finite vertices; use [`ArcStore::validate`] to check imported data.
    pub fn push_arc<I>(&mut self, points: I) -> usize
    where
        I: IntoIterator<Item = Point>,
    {
        for [x, y] in points {
            self.xx.push(x);
            self.yy.push(y);
        }
        self.offsets.push(self.xx.len());
        self.offsets.len() - 2
    }

    /// Checks that every arc has at least two finite vertices.
    pub fn validate(&self) -> Result<()> {
        for arc in 0..self.len() {
            let range = self.range(arc);
            if range.len() < 2 {
                return Err(Error::ShortArc { arc });
            }
            for (vertex, i) in range.enumerate() {
                if !self.xx[i].is_finite() || !self.yy[i].is_finite() {
                    return Err(Error::NonFiniteCoordinate { arc, vertex });
                }
            }
        }
        Ok(())
    }

    /// Number of arcs.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Returns `true` if the store holds no arcs.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of stored vertices.
    pub fn total_vertices(&self) -> usize {
        self.xx.len()
    }

    /// Number of vertices in arc `id`.
    #[inline]
    pub fn vertex_count(&self, id: usize) -> usize {
        self.offsets[id + 1] - self.offsets[id]
    }

    #[inline]
    fn range(&self, id: usize) -> std::ops::Range<usize> {
        self.offsets[id]..self.offsets[id + 1]
    }

    /// Returns vertex `k` of arc `id` in stored order.
    #[inline]
    pub fn vertex(&self, id: usize, k: usize) -> Point {
        let i = self.offsets[id] + k;
        [self.xx[i], self.yy[i]]
    }

    /// Returns `true` if `arc_ref` names an arc in this store.
    #[inline]
    pub fn contains(&self, arc_ref: ArcRef) -> bool {
        arc_ref.id() < self.len()
    }

    /// Iterates the vertices of an arc in the direction of the reference.
    pub fn points(&self, arc_ref: ArcRef) -> ArcPoints<'_> {
        let range = self.range(arc_ref.id());
        ArcPoints {
            store: self,
            front: range.start,
            back: range.end,
            reversed: arc_ref.is_reversed(),
        }
    }

    /// Collects the vertices of an arc in the direction of the reference.
    pub fn arc_vertices(&self, arc_ref: ArcRef) -> Vec<Point> {
        self.points(arc_ref).collect()
    }

    /// First vertex reached when traversing `arc_ref`.
    #[inline]
    pub fn first_point(&self, arc_ref: ArcRef) -> Point {
        let id = arc_ref.id();
        if arc_ref.is_reversed() {
            self.vertex(id, self.vertex_count(id) - 1)
        } else {
            self.vertex(id, 0)
        }
    }

    /// Last vertex reached when traversing `arc_ref`.
    #[inline]
    pub fn last_point(&self, arc_ref: ArcRef) -> Point {
        self.first_point(!arc_ref)
    }

    /// First vertex after the start of `arc_ref` that differs from the start.
    ///
    /// Falls back to the start vertex for a zero-length arc.
    pub fn leading_point(&self, arc_ref: ArcRef) -> Point {
        let start = self.first_point(arc_ref);
        self.points(arc_ref)
            .skip(1)
            .find(|p| *p != start)
            .unwrap_or(start)
    }

    /// Last vertex before the end of `arc_ref` that differs from the end.
    pub fn trailing_point(&self, arc_ref: ArcRef) -> Point {
        self.leading_point(!arc_ref)
    }

    /// Bounding box of arc `id`.
    pub fn arc_bounds(&self, id: usize) -> Bounds {
        let mut bounds = Bounds::empty();
        for i in self.range(id) {
            bounds.extend([self.xx[i], self.yy[i]]);
        }
        bounds
    }

    /// Appends every arc of `other`; returns the id offset applied to them.
    pub fn append(&mut self, other: &ArcStore) -> usize {
        let id_offset = self.len();
        let vertex_offset = self.xx.len();
        self.xx.extend_from_slice(&other.xx);
        self.yy.extend_from_slice(&other.yy);
        self.offsets
            .extend(other.offsets[1..].iter().map(|o| o + vertex_offset));
        id_offset
    }
}

impl Default for ArcStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the vertices of one directed arc.
#[derive(Debug, Clone)]
pub struct ArcPoints<'a> {
    store: &'a ArcStore,
    front: usize,
    back: usize,
    reversed: bool,
}

impl Iterator for ArcPoints<'_> {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.front >= self.back {
            return None;
        }
        let i = if self.reversed {
            self.back -= 1;
            self.back
        } else {
            self.front += 1;
            self.front - 1
        };
        Some([self.store.xx[i], self.store.yy[i]])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ArcPoints<'_> {}
