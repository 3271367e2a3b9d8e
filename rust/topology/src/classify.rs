// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arc classification by neighbouring shapes.
//!
//! Every arc used by a polygon layer is touched by one shape (an outer
//! boundary) or by two shapes (a shared boundary). The classifier records
//! both shape ids per arc; a [`KeyPolicy`] then turns that pair into an
//! optional [`LineKey`] used to group arcs into lines.

use std::fmt;

use arc_lite_core::{traverse_paths, ArcRef, AttributeTable, PathShape};

use crate::error::{Error, Result};

/// Grouping key of a classified arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineKey {
    /// Boundary of a single shape.
    Shape(u32),
    /// Boundary between two shapes, lower id first.
    Pair(u32, u32),
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKey::Shape(a) => write!(f, "{a}"),
            LineKey::Pair(a, b) => write!(f, "{a}-{b}"),
        }
    }
}

/// How a pair of neighbouring shapes is turned into a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPolicy {
    /// Arcs with no neighbouring shape (outer boundaries).
    NoNeighbor,
    /// Arcs shared by two shapes (inner boundaries).
    HasNeighbor,
    /// Shared arcs whose two shapes have different values in `field`.
    FieldDiffers { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Neighbors {
    a: i32,
    b: i32,
}

static OUTER: KeyPolicy = KeyPolicy::NoNeighbor;
static INNER: KeyPolicy = KeyPolicy::HasNeighbor;

const UNUSED: Neighbors = Neighbors { a: -1, b: -1 };

/// Per-arc neighbouring shape ids of a polygon layer.
#[derive(Debug, Clone)]
pub struct ArcClassifier {
    neighbors: Vec<Neighbors>,
}

impl ArcClassifier {
    /// Records which shapes use each of `arc_count` arcs.
    ///
    /// When more than two shapes use an arc (overlapping polygons), the two
    /// lowest shape ids are kept.
    pub fn new(shapes: &[Option<PathShape>], arc_count: usize) -> Self {
        let mut neighbors = vec![UNUSED; arc_count];
        traverse_paths(
            shapes,
            |_, _, _| {},
            |step| {
                let shape_id = step.shape as i32;
                let n = &mut neighbors[step.arc_ref.id()];
                if n.a == -1 {
                    n.a = shape_id;
                } else if n.b == -1 {
                    n.b = shape_id;
                }
            },
        );
        Self { neighbors }
    }

    pub fn arc_count(&self) -> usize {
        self.neighbors.len()
    }

    /// The shapes on either side of `arc_ref`: the lower id, then the other
    /// one if the arc is shared. `None` for arcs no shape uses.
    pub fn neighbors(&self, arc_ref: ArcRef) -> Option<(u32, Option<u32>)> {
        let n = self.neighbors.get(arc_ref.id())?;
        (n.a >= 0).then(|| (n.a as u32, (n.b >= 0).then_some(n.b as u32)))
    }

    /// Keys of outer boundary arcs.
    pub fn outer_keys(&self) -> ArcKeys<'_> {
        ArcKeys {
            classifier: self,
            policy: &OUTER,
            data: None,
        }
    }

    /// Keys of arcs shared by two shapes.
    pub fn inner_keys(&self) -> ArcKeys<'_> {
        ArcKeys {
            classifier: self,
            policy: &INNER,
            data: None,
        }
    }

    /// Binds a key policy, checking that the attribute field it needs exists.
    pub fn with_policy<'a>(
        &'a self,
        policy: &'a KeyPolicy,
        data: Option<&'a AttributeTable>,
    ) -> Result<ArcKeys<'a>> {
        if let KeyPolicy::FieldDiffers { field } = policy {
            let table = data.ok_or(Error::MissingDataTable)?;
            if !table.field_exists(field) {
                return Err(Error::UnknownField {
                    field: field.clone(),
                });
            }
        }
        Ok(ArcKeys {
            classifier: self,
            policy,
            data,
        })
    }
}

/// A classifier bound to a key policy.
#[derive(Debug, Clone, Copy)]
pub struct ArcKeys<'a> {
    classifier: &'a ArcClassifier,
    policy: &'a KeyPolicy,
    data: Option<&'a AttributeTable>,
}

impl ArcKeys<'_> {
    pub fn arc_count(&self) -> usize {
        self.classifier.arc_count()
    }

    /// Key of `arc_ref` under the bound policy, or `None` if the arc is not
    /// part of any line of this kind.
    pub fn key(&self, arc_ref: ArcRef) -> Option<LineKey> {
        let (a, b) = self.classifier.neighbors(arc_ref)?;
        match (self.policy, b) {
            (KeyPolicy::NoNeighbor, None) => Some(LineKey::Shape(a)),
            (KeyPolicy::NoNeighbor, Some(_)) => None,
            (KeyPolicy::HasNeighbor, Some(b)) => Some(LineKey::Pair(a, b)),
            (KeyPolicy::FieldDiffers { field }, Some(b)) => {
                let data = self.data?;
                let va = data.get(a as usize, field);
                let vb = data.get(b as usize, field);
                (va != vb).then_some(LineKey::Pair(a, b))
            }
            (_, None) => None,
        }
    }
}
