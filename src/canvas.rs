//! Drawing surface used by the renderer.
//!
//! Coordinates are integer pixels with y growing downward. Angles for arcs
//! are radians, counter-clockwise as seen on screen.

use std::f32::consts::TAU;

/// 0x00RRGGBB, the layout softbuffer presents.
pub type Color = u32;

#[inline]
pub const fn pack_rgb(r: u8, g: u8, b: u8) -> Color {
    (b as u32) | ((g as u32) << 8) | ((r as u32) << 16)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// Primitive drawing operations. The renderer never reads pixels back.
pub trait Canvas {
    fn width(&self) -> i32;
    fn height(&self) -> i32;

    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_polygon(&mut self, points: &[[i32; 2]], color: Color);
    fn stroke_polygon(&mut self, points: &[[i32; 2]], width: i32, color: Color);
    fn fill_circle(&mut self, center: [i32; 2], radius: i32, color: Color);
    /// Ring `width` pixels thick, inside `radius`.
    fn stroke_circle(&mut self, center: [i32; 2], radius: i32, width: i32, color: Color);
    /// Elliptic arc inscribed in `bounds`, `width` pixels thick, from `start`
    /// to `end`.
    fn arc(&mut self, bounds: Rect, start: f32, end: f32, width: i32, color: Color);
    fn line(&mut self, from: [i32; 2], to: [i32; 2], width: i32, color: Color);
}

/// Software canvas over a packed pixel buffer.
pub struct FrameBuffer {
    pixels: Vec<Color>,
    width: usize,
    height: usize,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height],
            width,
            height,
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    #[cfg(test)]
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    #[inline]
    fn put(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Horizontal run `x0..=x1` on row `y`, clipped.
    fn span(&mut self, y: i32, x0: i32, x1: i32, color: Color) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        let x0 = x0.max(0);
        let x1 = x1.min(self.width as i32 - 1);
        if x0 > x1 {
            return;
        }
        let row = y as usize * self.width;
        self.pixels[row + x0 as usize..=row + x1 as usize].fill(color);
    }

    /// Offsets `-radius..=radius` around `cy` that land on a canvas row.
    fn rows_around(&self, cy: i32, radius: i32) -> std::ops::RangeInclusive<i32> {
        let (cy, r) = (i64::from(cy), i64::from(radius));
        let lo = (-r).max(-cy);
        let hi = r.min(self.height as i64 - 1 - cy);
        if lo > hi {
            return 1..=0;
        }
        lo as i32..=hi as i32
    }

    /// Run `cx + from..=cx + to` on row `y`, clamped before leaving floats.
    fn span_around(&mut self, y: i32, cx: i32, from: f32, to: f32, color: Color) {
        let limit = self.width as f32;
        let x0 = (cx as f32 + from).clamp(-1.0, limit) as i32;
        let x1 = (cx as f32 + to).clamp(-1.0, limit) as i32;
        self.span(y, x0, x1, color);
    }

    /// Clips a segment to the canvas grown by `pad` pixels (Liang-Barsky).
    fn clip_line(&self, from: [i32; 2], to: [i32; 2], pad: i32) -> Option<([i32; 2], [i32; 2])> {
        let pad = f64::from(pad);
        let (x0, y0) = (f64::from(from[0]), f64::from(from[1]));
        let (dx, dy) = (f64::from(to[0]) - x0, f64::from(to[1]) - y0);
        let x_max = self.width as f64 - 1.0 + pad;
        let y_max = self.height as f64 - 1.0 + pad;

        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        for (p, q) in [(-dx, x0 + pad), (dx, x_max - x0), (-dy, y0 + pad), (dy, y_max - y0)] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t0 = t0.max(t);
            } else {
                t1 = t1.min(t);
            }
            if t0 > t1 {
                return None;
            }
        }
        let at = |t: f64| [(x0 + t * dx).round() as i32, (y0 + t * dy).round() as i32];
        Some((at(t0), at(t1)))
    }

    /// Square brush used for thick lines.
    fn stamp(&mut self, x: i32, y: i32, width: i32, color: Color) {
        if width <= 1 {
            self.put(x, y, color);
            return;
        }
        let lo = width / 2;
        for yy in y - lo..y - lo + width {
            self.span(yy, x - lo, x - lo + width - 1, color);
        }
    }
}

impl Canvas for FrameBuffer {
    fn width(&self) -> i32 {
        self.width as i32
    }

    fn height(&self) -> i32 {
        self.height as i32
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.w <= 0 || rect.h <= 0 {
            return;
        }
        for y in rect.y..rect.y + rect.h {
            self.span(y, rect.x, rect.x + rect.w - 1, color);
        }
    }

    fn fill_polygon(&mut self, points: &[[i32; 2]], color: Color) {
        if points.len() < 3 {
            for w in points.windows(2) {
                self.line(w[0], w[1], 1, color);
            }
            return;
        }
        let y_min = points.iter().map(|p| p[1]).min().unwrap_or(0).max(0);
        let y_max = points
            .iter()
            .map(|p| p[1])
            .max()
            .unwrap_or(0)
            .min(self.height as i32 - 1);

        // Even-odd scanline fill sampled at pixel centers
        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y_min..=y_max {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                let (ay, by) = (a[1] as f32, b[1] as f32);
                if (ay <= sy && by > sy) || (by <= sy && ay > sy) {
                    let t = (sy - ay) / (by - ay);
                    crossings.push(a[0] as f32 + t * (b[0] as f32 - a[0] as f32));
                }
            }
            crossings.sort_by(|p, q| p.total_cmp(q));
            for pair in crossings.chunks_exact(2) {
                self.span(y, pair[0].round() as i32, pair[1].round() as i32 - 1, color);
            }
        }
    }

    fn stroke_polygon(&mut self, points: &[[i32; 2]], width: i32, color: Color) {
        for (i, &a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            self.line(a, b, width, color);
        }
    }

    fn fill_circle(&mut self, center: [i32; 2], radius: i32, color: Color) {
        if radius < 0 {
            return;
        }
        let r2 = radius as f32 * radius as f32;
        let [cx, cy] = center;
        for dy in self.rows_around(cy, radius) {
            let half = (r2 - dy as f32 * dy as f32).sqrt().trunc();
            self.span_around(cy + dy, cx, -half, half, color);
        }
    }

    fn stroke_circle(&mut self, center: [i32; 2], radius: i32, width: i32, color: Color) {
        if width <= 0 || width >= radius {
            self.fill_circle(center, radius, color);
            return;
        }
        let outer2 = radius as f32 * radius as f32;
        let inner = radius - width;
        let inner2 = inner as f32 * inner as f32;
        let [cx, cy] = center;
        for dy in self.rows_around(cy, radius) {
            let d2 = dy as f32 * dy as f32;
            let outer = (outer2 - d2).sqrt().trunc();
            let y = cy + dy;
            if dy.abs() >= inner {
                self.span_around(y, cx, -outer, outer, color);
                continue;
            }
            let hole = (inner2 - d2).sqrt().trunc() + 1.0;
            self.span_around(y, cx, -outer, -hole, color);
            self.span_around(y, cx, hole, outer, color);
        }
    }

    fn arc(&mut self, bounds: Rect, start: f32, end: f32, width: i32, color: Color) {
        if width <= 0 || bounds.w <= 0 || bounds.h <= 0 {
            return;
        }
        let rx = bounds.w as f32 / 2.0;
        let ry = bounds.h as f32 / 2.0;
        let cx = bounds.x as f32 + rx;
        let cy = bounds.y as f32 + ry;
        let ix = (rx - width as f32).max(0.0);
        let iy = (ry - width as f32).max(0.0);
        let sweep = (end - start).rem_euclid(TAU);

        let (x_lo, x_hi) = (bounds.x.max(0), (bounds.x + bounds.w).min(self.width as i32));
        let (y_lo, y_hi) = (bounds.y.max(0), (bounds.y + bounds.h).min(self.height as i32));
        for y in y_lo..y_hi {
            for x in x_lo..x_hi {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if (dx / rx).powi(2) + (dy / ry).powi(2) > 1.0 {
                    continue;
                }
                if ix > 0.0 && iy > 0.0 && (dx / ix).powi(2) + (dy / iy).powi(2) < 1.0 {
                    continue;
                }
                // screen y points down, arc angles run counter-clockwise
                let angle = (-dy).atan2(dx);
                if (angle - start).rem_euclid(TAU) <= sweep {
                    self.put(x, y, color);
                }
            }
        }
    }

    fn line(&mut self, from: [i32; 2], to: [i32; 2], width: i32, color: Color) {
        let Some((from, to)) = self.clip_line(from, to, width.max(1)) else {
            return;
        };
        // Bresenham
        let [mut x, mut y] = from;
        let dx = (to[0] - x).abs();
        let dy = -(to[1] - y).abs();
        let sx = if x < to[0] { 1 } else { -1 };
        let sy = if y < to[1] { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.stamp(x, y, width, color);
            if x == to[0] && y == to[1] {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const RED: Color = pack_rgb(255, 0, 0);

    /// Canvas double that records calls instead of drawing.
    #[derive(Default)]
    pub(crate) struct Recorder {
        pub calls: Vec<Call>,
    }

    #[derive(Clone, Debug, PartialEq)]
    pub(crate) enum Call {
        Clear,
        Rect(Rect, Color),
        Polygon(Vec<[i32; 2]>, Color),
        Outline(Vec<[i32; 2]>, Color),
        Circle([i32; 2], i32, Color),
        Ring([i32; 2], i32, i32),
        Arc(Rect),
        Line(i32),
    }

    impl Canvas for Recorder {
        fn width(&self) -> i32 {
            800
        }
        fn height(&self) -> i32 {
            500
        }
        fn clear(&mut self, _: Color) {
            self.calls.push(Call::Clear);
        }
        fn fill_rect(&mut self, rect: Rect, color: Color) {
            self.calls.push(Call::Rect(rect, color));
        }
        fn fill_polygon(&mut self, points: &[[i32; 2]], color: Color) {
            self.calls.push(Call::Polygon(points.to_vec(), color));
        }
        fn stroke_polygon(&mut self, points: &[[i32; 2]], _: i32, color: Color) {
            self.calls.push(Call::Outline(points.to_vec(), color));
        }
        fn fill_circle(&mut self, center: [i32; 2], radius: i32, color: Color) {
            self.calls.push(Call::Circle(center, radius, color));
        }
        fn stroke_circle(&mut self, center: [i32; 2], radius: i32, width: i32, _: Color) {
            self.calls.push(Call::Ring(center, radius, width));
        }
        fn arc(&mut self, bounds: Rect, _: f32, _: f32, _: i32, _: Color) {
            self.calls.push(Call::Arc(bounds));
        }
        fn line(&mut self, from: [i32; 2], _: [i32; 2], _: i32, _: Color) {
            self.calls.push(Call::Line(from[1]));
        }
    }

    fn count(fb: &FrameBuffer, color: Color) -> usize {
        fb.pixels().iter().filter(|&&p| p == color).count()
    }

    #[test]
    fn pack_rgb_layout() {
        assert_eq!(pack_rgb(0x12, 0x34, 0x56), 0x0012_3456);
    }

    #[test]
    fn fill_rect_clips_to_canvas() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.fill_rect(Rect::new(-5, 8, 8, 5), RED);
        assert_eq!(count(&fb, RED), 3 * 2);
        assert_eq!(fb.pixel(2, 9), Some(RED));
        assert_eq!(fb.pixel(3, 9), Some(0));
    }

    #[test]
    fn fill_polygon_covers_square() {
        let mut fb = FrameBuffer::new(20, 20);
        fb.fill_polygon(&[[2, 2], [12, 2], [12, 12], [2, 12]], RED);
        assert_eq!(count(&fb, RED), 100);
        assert_eq!(fb.pixel(2, 2), Some(RED));
        assert_eq!(fb.pixel(12, 12), Some(0));
    }

    #[test]
    fn fill_polygon_hexagon_stays_inside_bounds() {
        let mut fb = FrameBuffer::new(40, 40);
        let hexagon = [[5, 30], [5, 10], [20, 5], [35, 10], [35, 30], [20, 35]];
        fb.fill_polygon(&hexagon, RED);
        assert_eq!(fb.pixel(20, 20), Some(RED));
        assert_eq!(fb.pixel(6, 6), Some(0));
        assert_eq!(fb.pixel(36, 20), Some(0));
    }

    #[test]
    fn line_reaches_both_ends() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.line([1, 1], [8, 5], 1, RED);
        assert_eq!(fb.pixel(1, 1), Some(RED));
        assert_eq!(fb.pixel(8, 5), Some(RED));
    }

    #[test]
    fn thick_horizontal_line_spans_rows() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.line([0, 5], [9, 5], 3, RED);
        for y in 4..=6 {
            assert_eq!(fb.pixel(5, y), Some(RED));
        }
        assert_eq!(fb.pixel(5, 3), Some(0));
        assert_eq!(fb.pixel(5, 7), Some(0));
    }

    #[test]
    fn line_far_outside_is_clipped() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.line([-1_000_000_000, 5], [1_000_000_000, 5], 1, RED);
        assert_eq!(count(&fb, RED), 10);

        let mut fb = FrameBuffer::new(10, 10);
        fb.line([i32::MIN, -50], [i32::MAX, -40], 3, RED);
        assert_eq!(count(&fb, RED), 0);
    }

    #[test]
    fn huge_circle_covers_canvas() {
        let mut fb = FrameBuffer::new(80, 50);
        fb.fill_circle([40, 25], 100_000, RED);
        assert_eq!(count(&fb, RED), 80 * 50);

        // the whole canvas sits inside the hole
        let mut fb = FrameBuffer::new(80, 50);
        fb.stroke_circle([40, 25], 100_000, 10, RED);
        assert_eq!(count(&fb, RED), 0);
    }

    #[test]
    fn ring_leaves_center_empty() {
        let mut fb = FrameBuffer::new(30, 30);
        fb.stroke_circle([15, 15], 10, 2, RED);
        assert_eq!(fb.pixel(15, 15), Some(0));
        assert_eq!(fb.pixel(15, 5), Some(RED));
        assert_eq!(fb.pixel(25, 15), Some(RED));
    }

    #[test]
    fn zero_width_ring_fills() {
        let mut fb = FrameBuffer::new(30, 30);
        fb.stroke_circle([15, 15], 5, 0, RED);
        assert_eq!(fb.pixel(15, 15), Some(RED));
    }

    #[test]
    fn arc_draws_only_requested_sweep() {
        let mut fb = FrameBuffer::new(40, 40);
        // lower half: from -pi to 0 counter-clockwise on screen
        fb.arc(Rect::new(0, 0, 40, 40), -2.0 * FRAC_PI_2, 0.0, 3, RED);
        assert_eq!(fb.pixel(20, 38), Some(RED));
        assert_eq!(fb.pixel(20, 1), Some(0));
        assert_eq!(fb.pixel(20, 20), Some(0));
    }

    #[test]
    fn zero_width_arc_draws_nothing() {
        let mut fb = FrameBuffer::new(40, 40);
        fb.arc(Rect::new(0, 0, 40, 40), 0.0, 1.0, 0, RED);
        assert_eq!(count(&fb, RED), 0);
    }
}
