// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding boxes.

use crate::arc::Point;

/// An axis-aligned rectangle. An empty box has `xmin > xmax`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl Bounds {
    /// A box containing nothing; extending it with a point yields that point.
    pub const fn empty() -> Self {
        Self {
            xmin: f64::INFINITY,
            ymin: f64::INFINITY,
            xmax: f64::NEG_INFINITY,
            ymax: f64::NEG_INFINITY,
        }
    }

    pub const fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Returns `true` if no point has been added.
    pub fn is_empty(&self) -> bool {
        self.xmin > self.xmax || self.ymin > self.ymax
    }

    /// Grows the box to include `p`.
    pub fn extend(&mut self, p: Point) {
        self.xmin = self.xmin.min(p[0]);
        self.ymin = self.ymin.min(p[1]);
        self.xmax = self.xmax.max(p[0]);
        self.ymax = self.ymax.max(p[1]);
    }

    /// Grows the box to include `other`.
    pub fn merge(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.xmin = self.xmin.min(other.xmin);
        self.ymin = self.ymin.min(other.ymin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymax = self.ymax.max(other.ymax);
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.xmax - self.xmin
        }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() {
            0.0
        } else {
            self.ymax - self.ymin
        }
    }

    /// Inclusive containment test.
    pub fn contains_point(&self, p: Point) -> bool {
        p[0] >= self.xmin && p[0] <= self.xmax && p[1] >= self.ymin && p[1] <= self.ymax
    }

    /// Inclusive overlap test (touching boxes intersect).
    pub fn intersects(&self, other: &Bounds) -> bool {
        !(self.is_empty()
            || other.is_empty()
            || self.xmax < other.xmin
            || other.xmax < self.xmin
            || self.ymax < other.ymin
            || other.ymax < self.ymin)
    }

    /// Returns `[xmin, ymin, xmax, ymax]`, or `None` for an empty box.
    pub fn to_array(&self) -> Option<[f64; 4]> {
        (!self.is_empty()).then_some([self.xmin, self.ymin, self.xmax, self.ymax])
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}
