//! Region geometry as exchanged with the service.
//!
//! A region is a polygon in source-image pixel coordinates, serialized as
//! `[[x, y], [x, y], ...]`. Nothing here checks the shape: the backend decides
//! what a usable region is.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single `[x, y]` point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Point(pub f64, pub f64);

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self(x, y)
    }

    pub fn x(&self) -> f64 {
        self.0
    }

    pub fn y(&self) -> f64 {
        self.1
    }
}

/// A polygon to crop, usually the four corners of a detected document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct Region(pub Vec<Point>);

impl Region {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Build a region from raw `(x, y)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> Self {
        Self(pairs.into_iter().map(|(x, y)| Point(x, y)).collect())
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
