use std::f32::consts::SQRT_2;

use crate::config::GameConfig;
use crate::geom;

/// Viewer pose plus the screen geometry it projects onto.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub pos: [f32; 2],   // world position
    pub heading: f32,    // degrees, 0 = +x, grows clockwise on screen
    pub screen_w: f32,
    pub screen_h: f32,
    pub wall_height: f32, // base height of a wall one tile away
    pub tile_size: f32,
}

/// Where a world point lands horizontally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub x: i32,
    /// Within ±90° of the heading.
    pub forward: bool,
}

impl Camera {
    pub fn new(pos: [f32; 2], heading: f32, config: &GameConfig) -> Self {
        Self {
            pos,
            heading,
            screen_w: config.canvas_width as f32,
            screen_h: config.canvas_height as f32,
            wall_height: config.wall_height,
            tile_size: config.tile_size(),
        }
    }

    /// Cosine and sine of the angle from the heading to `p`.
    ///
    /// Uses the dot/cross product of the unit heading and the unit offset, so
    /// there is no quadrant handling. `None` when `p` is the viewer's own
    /// position.
    pub fn angle_to(&self, p: [f32; 2]) -> Option<(f32, f32)> {
        let [ox, oy] = geom::toward(self.pos, p, 1.0)?;
        let [fx, fy] = geom::polar(1.0, self.heading);
        let norm = fx * fx + fy * fy;
        let cos_a = (fx * ox + fy * oy) / norm;
        let sin_a = (fx * oy - ox * fy) / norm;
        Some((cos_a, sin_a))
    }

    /// Wide-angle mapping of `p` to a screen column.
    ///
    /// A point dead ahead lands on the center column; ±45° land on the edges.
    /// Walls and the target both go through here.
    #[inline]
    pub fn project(&self, p: [f32; 2]) -> Option<Projected> {
        let (cos_a, sin_a) = self.angle_to(p)?;
        let x = self.screen_w * (1.0 + SQRT_2 * sin_a) / 2.0;
        Some(Projected {
            x: x.round() as i32,
            forward: cos_a >= 0.0,
        })
    }

    /// Top and bottom rows of a wall seen at `dist`, centered on the horizon.
    #[inline]
    pub fn wall_span(&self, dist: f32) -> Option<(i32, i32)> {
        if !(dist > 0.0) {
            return None;
        }
        // capped so a face at point-blank range stays a sane pixel span
        let half = (self.wall_height * self.tile_size / dist / 2.0).min(self.screen_h) as i32;
        let cy = self.screen_center_y() as i32;
        Some((cy - half, cy + half))
    }

    #[inline]
    pub fn screen_center_y(&self) -> f32 {
        (self.screen_h / 2.0).floor()
    }

    #[inline]
    pub fn distance_to(&self, p: [f32; 2]) -> f32 {
        geom::distance(self.pos, p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(heading: f32) -> Camera {
        Camera::new([100.0, 100.0], heading, &GameConfig::default())
    }

    #[test]
    fn point_dead_ahead_hits_center_column() {
        let p = camera(0.0).project([300.0, 100.0]).unwrap();
        assert_eq!(p.x, 400);
        assert!(p.forward);
    }

    #[test]
    fn point_behind_is_not_forward() {
        let p = camera(0.0).project([-100.0, 100.0]).unwrap();
        assert!(!p.forward);
        assert_eq!(p.x, 400);

        let p = camera(180.0).project([300.0, 100.0]).unwrap();
        assert!(!p.forward);
    }

    #[test]
    fn heading_offsets_map_to_screen_edges() {
        let cam = camera(0.0);
        // +y is clockwise from +x, which is to the right on screen
        let right = cam.project([200.0, 200.0]).unwrap();
        let left = cam.project([200.0, 0.0]).unwrap();
        assert_eq!(right.x, 800);
        assert_eq!(left.x, 0);
        assert!(right.forward && left.forward);
    }

    #[test]
    fn rotated_heading_tracks_the_same_point() {
        let cam = camera(90.0);
        let p = cam.project([100.0, 400.0]).unwrap();
        assert_eq!(p.x, 400);
        assert!(p.forward);
    }

    #[test]
    fn own_position_has_no_projection() {
        let cam = camera(30.0);
        assert!(cam.project(cam.pos).is_none());
        assert!(cam.angle_to(cam.pos).is_none());
    }

    #[test]
    fn wall_span_shrinks_with_distance() {
        let cam = camera(0.0);
        let (t1, b1) = cam.wall_span(100.0).unwrap();
        let (t2, b2) = cam.wall_span(200.0).unwrap();
        assert_eq!((t1, b1), (150, 350));
        assert_eq!((t2, b2), (200, 300));
        assert!(cam.wall_span(0.0).is_none());
    }

    #[test]
    fn wall_span_is_capped_at_point_blank() {
        let cam = camera(0.0);
        assert_eq!(cam.wall_span(1e-6), Some((-250, 750)));
        assert_eq!(cam.wall_span(f32::MIN_POSITIVE), Some((-250, 750)));
    }
}
