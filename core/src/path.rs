//! Immutable enemy path with arc-length parameterization.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Reasons a path cannot be built from the provided waypoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PathError {
    /// A path needs at least two waypoints to form a segment.
    #[error("a path needs at least two waypoints, got {count}")]
    TooFewWaypoints {
        /// Number of waypoints supplied.
        count: usize,
    },
}

/// Straight piece of the path between two consecutive waypoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    /// World-space start point.
    pub start: Vec2,
    /// World-space end point.
    pub end: Vec2,
    /// Euclidean length of the segment.
    pub length: f32,
    /// Cumulative distance at which the segment begins.
    pub start_distance: f32,
    /// Cumulative distance at which the segment ends.
    pub end_distance: f32,
}

/// Polyline traversed by every enemy, from spawn to base.
#[derive(Clone, Debug)]
pub struct PathModel {
    waypoints: Vec<CellCoord>,
    segments: Vec<Segment>,
    total_length: f32,
    tiles: BTreeSet<CellCoord>,
}

impl PathModel {
    /// Builds the path from grid waypoints, converting them to cell centers.
    pub fn from_waypoints(waypoints: &[CellCoord], tile_size: f32) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }

        let mut segments = Vec::with_capacity(waypoints.len() - 1);
        let mut total_length = 0.0;
        for pair in waypoints.windows(2) {
            let start = pair[0].center(tile_size);
            let end = pair[1].center(tile_size);
            let length = start.distance(end);
            segments.push(Segment {
                start,
                end,
                length,
                start_distance: total_length,
                end_distance: total_length + length,
            });
            total_length += length;
        }

        Ok(Self {
            waypoints: waypoints.to_vec(),
            segments,
            total_length,
            tiles: rasterize(waypoints),
        })
    }

    /// Total arc length of the path.
    #[must_use]
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Grid waypoints the path was built from.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// Contiguous segments in travel order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Reports whether the path crosses the provided cell.
    #[must_use]
    pub fn contains_cell(&self, cell: CellCoord) -> bool {
        self.tiles.contains(&cell)
    }

    /// Converts a travelled distance into a world-space position.
    ///
    /// Distances are clamped to `[0, total_length]`; anything at or past the
    /// end yields the final waypoint.
    #[must_use]
    pub fn position(&self, distance: f32) -> Vec2 {
        let distance = distance.max(0.0);
        let Some(last) = self.segments.last() else {
            return Vec2::ZERO;
        };
        if distance >= self.total_length {
            return last.end;
        }

        let segment = self
            .segments
            .iter()
            .find(|segment| distance >= segment.start_distance && distance < segment.end_distance)
            .unwrap_or(&self.segments[0]);

        let t = if segment.length > 0.0 {
            ((distance - segment.start_distance) / segment.length).clamp(0.0, 1.0)
        } else {
            0.0
        };
        segment.start.lerp(segment.end, t)
    }
}

fn rasterize(waypoints: &[CellCoord]) -> BTreeSet<CellCoord> {
    let mut tiles = BTreeSet::new();
    for pair in waypoints.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let dc = i64::from(to.column()) - i64::from(from.column());
        let dr = i64::from(to.row()) - i64::from(from.row());
        let steps = dc.abs().max(dr.abs());
        for step in 0..=steps {
            let (column, row) = if steps == 0 {
                (i64::from(from.column()), i64::from(from.row()))
            } else {
                (
                    i64::from(from.column()) + (dc * step + steps / 2 * dc.signum()) / steps,
                    i64::from(from.row()) + (dr * step + steps / 2 * dr.signum()) / steps,
                )
            };
            if let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) {
                let _ = tiles.insert(CellCoord::new(column, row));
            }
        }
    }
    if let Some(last) = waypoints.last() {
        let _ = tiles.insert(*last);
    }
    tiles
}
