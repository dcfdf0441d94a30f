//! Exposed tile faces projected as screen-space hexagons.
//!
//! A face is sampled at both endpoints and its midpoint. Each sample is
//! projected independently, so the outline bends at the midpoint the same
//! way a flat wall bends under the wide-angle column mapping.

use std::cmp::Ordering;

use crate::camera::Camera;
use crate::raycast::{self, RAY_STEP};
use crate::world::{Grid, Tile, TileCoord};

/// Angular resolution of the face sweep, degrees.
pub const FACE_DEGREE: f32 = 1.0;

/// One projected sample point of a face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSample {
    pub x: i32,
    pub top: i32,
    pub bottom: i32,
    pub dist: f32,
    pub forward: bool,
}

impl WallSample {
    /// `None` when `p` coincides with the viewer.
    pub fn project(cam: &Camera, p: [f32; 2]) -> Option<Self> {
        let projected = cam.project(p)?;
        let dist = cam.distance_to(p);
        let (top, bottom) = cam.wall_span(dist)?;
        Some(Self {
            x: projected.x,
            top,
            bottom,
            dist,
            forward: projected.forward,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WallSegment {
    pub tile: TileCoord,
    /// Start, midpoint, end.
    pub samples: [WallSample; 3],
}

impl WallSegment {
    /// Face running from `a` to `b`.
    pub fn new(tile: TileCoord, a: [f32; 2], b: [f32; 2], cam: &Camera) -> Option<Self> {
        let mid = [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0];
        Self::from_points(tile, [a, mid, b], cam)
    }

    pub fn from_points(tile: TileCoord, points: [[f32; 2]; 3], cam: &Camera) -> Option<Self> {
        let [a, m, b] = points;
        Some(Self {
            tile,
            samples: [
                WallSample::project(cam, a)?,
                WallSample::project(cam, m)?,
                WallSample::project(cam, b)?,
            ],
        })
    }

    /// Sort key: the nearer of the start and midpoint samples.
    #[inline]
    pub fn distance(&self) -> f32 {
        self.samples[0].dist.min(self.samples[1].dist)
    }

    /// Worth drawing when any sample is in front of the viewer.
    #[inline]
    pub fn visible(&self) -> bool {
        self.samples.iter().any(|s| s.forward)
    }

    /// Closed outline: down the start edge, along the top, up the end edge,
    /// back along the bottom.
    pub fn outline(&self) -> [[i32; 2]; 6] {
        let [l, m, r] = self.samples;
        [
            [l.x, l.bottom],
            [l.x, l.top],
            [m.x, m.top],
            [r.x, r.top],
            [r.x, r.bottom],
            [m.x, m.bottom],
        ]
    }
}

/// Faces of `tile` that the viewer can actually see.
///
/// A face counts only when the viewer is on its outer side and the tile next
/// to it is free, which filters out boundaries shared by two solid tiles. At
/// most one face per axis is produced.
pub fn exposed_faces(grid: &Grid, cam: &Camera, tile: TileCoord) -> Vec<WallSegment> {
    let ([x0, y0], [x1, y1]) = grid.tile_bounds(tile);
    let [px, py] = cam.pos;
    let mut faces = Vec::with_capacity(2);

    if px < x0 && grid.check(x0 - 1.0, y0 + 1.0) {
        faces.extend(WallSegment::new(tile, [x0, y0], [x0, y1], cam));
    } else if px > x1 && grid.check(x1 + 1.0, y0 + 1.0) {
        faces.extend(WallSegment::new(tile, [x1, y0], [x1, y1], cam));
    }

    if py < y0 && grid.check(x0 + 1.0, y0 - 1.0) {
        faces.extend(WallSegment::new(tile, [x0, y0], [x1, y0], cam));
    } else if py > y1 && grid.check(x0 + 1.0, y1 + 1.0) {
        faces.extend(WallSegment::new(tile, [x0, y1], [x1, y1], cam));
    }

    faces
}

/// Fine sweep across the field of view collecting every struck face.
///
/// Consecutive rays that stop on the same tile reuse the faces already built
/// for it. Rays leaving the field produce nothing.
pub fn sweep_faces(grid: &Grid, cam: &Camera, fov_half: f32) -> Vec<WallSegment> {
    let rays = (2.0 * fov_half / FACE_DEGREE) as usize + 1;
    let mut last = None;
    let mut segments = Vec::new();

    for i in 0..rays {
        let angle = cam.heading - fov_half + i as f32 * FACE_DEGREE;
        let hit = raycast::march(grid, cam.pos, angle, RAY_STEP);
        if last == Some(hit.tile) {
            continue;
        }
        last = Some(hit.tile);
        if let Tile::Solid(tile) = hit.tile {
            segments.extend(exposed_faces(grid, cam, tile));
        }
    }
    segments
}

/// Painter's order: farthest first, so nearer faces overpaint.
pub fn sort_far_to_near(segments: &mut [WallSegment]) {
    segments.sort_by(|a, b| b.distance().partial_cmp(&a.distance()).unwrap_or(Ordering::Equal));
}
