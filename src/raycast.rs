use crate::camera::Camera;
use crate::geom;
use crate::world::{Grid, Tile};

/// Ray step length used by both sweeps.
pub const RAY_STEP: f32 = 3.0;
/// Sub-step used for sight lines.
pub const SIGHT_STEP: f32 = 5.0;
/// Angular resolution of the column sweep, degrees.
pub const COLUMN_DEGREE: f32 = 0.5;

/// Where a marched ray stopped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// First point outside free space.
    pub point: [f32; 2],
    pub distance: f32,
    pub tile: Tile,
}

/// Steps from `start` along `angle_deg` while the grid stays passable.
///
/// Always terminates: every point outside the field is impassable.
pub fn march(grid: &Grid, start: [f32; 2], angle_deg: f32, step: f32) -> RayHit {
    let d = geom::polar(step, angle_deg);
    let mut p = start;
    let mut distance = 0.0;
    while grid.check(p[0], p[1]) {
        p = geom::add(p, d);
        distance += step;
    }
    RayHit {
        point: p,
        distance,
        tile: grid.tile_value(p[0], p[1]),
    }
}

/// True if a straight path from `from` reaches `to` without leaving free
/// space.
///
/// Succeeds as soon as the walker is within two sub-steps of `to` on both
/// axes.
pub fn clear_path(grid: &Grid, from: [f32; 2], to: [f32; 2], step: f32) -> bool {
    let Some(d) = geom::toward(from, to, step) else {
        return grid.check(from[0], from[1]);
    };
    let reach = 2.0 * step;
    let mut p = from;
    while grid.check(p[0], p[1]) {
        if (to[0] - p[0]).abs() < reach && (to[1] - p[1]).abs() < reach {
            return true;
        }
        p = geom::add(p, d);
    }
    false
}

/// One flat wall slab of the column renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColumnSlab {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// Coarse sweep: one ray per `COLUMN_DEGREE` across the field of view,
/// one slab per ray, laid out left to right.
pub fn column_slabs(grid: &Grid, cam: &Camera, fov_half: f32) -> Vec<ColumnSlab> {
    let rays = (2.0 * fov_half / COLUMN_DEGREE) as usize + 1;
    let width = (cam.screen_w / (2.0 * fov_half) * COLUMN_DEGREE) as i32;
    let mut slabs = Vec::with_capacity(rays);
    let mut left = 0;

    for i in 0..rays {
        let angle = cam.heading - fov_half + i as f32 * COLUMN_DEGREE;
        let hit = march(grid, cam.pos, angle, RAY_STEP);
        // Viewer inside a wall
        let Some((top, bottom)) = cam.wall_span(hit.distance) else {
            continue;
        };
        slabs.push(ColumnSlab {
            left,
            top,
            width: width - 1,
            height: bottom - top,
        });
        left += width;
    }
    slabs
}
