use std::f32::consts::FRAC_PI_2;

use crate::camera::Camera;
use crate::canvas::{Canvas, Color, Rect, pack_rgb};
use crate::config::{GameConfig, RenderMode};
use crate::entity::{Player, RoundState, Target};
use crate::game::Game;
use crate::raycast;
use crate::wall::{self, WallSegment};
use crate::world::{Grid, TileCoord};

const BACKGROUND: Color = pack_rgb(0, 0, 0);
const WALL_FILL: Color = pack_rgb(150, 150, 150);
const WALL_EDGE: Color = pack_rgb(60, 60, 60);
const BALL: Color = pack_rgb(255, 255, 0);
const EYE: Color = pack_rgb(255, 255, 255);
const MOUTH: Color = pack_rgb(200, 0, 0);
const MAP_FREE: Color = pack_rgb(255, 255, 255);
const MAP_SOLID: Color = pack_rgb(80, 80, 80);
const MAP_PLAYER: Color = pack_rgb(0, 0, 0);
const BANNER: Color = pack_rgb(255, 0, 0);

const STRIP_WIDTH: i32 = 3;
const EDGE_WIDTH: i32 = 2;
const MAP_TARGET_RADIUS: i32 = 4;

/// Draws one complete frame.
pub fn render_frame(canvas: &mut impl Canvas, game: &Game) {
    let config = game.config();
    canvas.clear(BACKGROUND);
    draw_floor_ceiling(canvas);

    if game.round == RoundState::Ended {
        draw_game_over(canvas);
        return;
    }

    let cam = Camera::new(game.player.pos, game.player.heading, config);
    match config.render_mode {
        RenderMode::Faces => {
            let mut segments = wall::sweep_faces(&game.grid, &cam, config.fov_half_angle);
            wall::sort_far_to_near(&mut segments);
            draw_walls(canvas, &segments);
        }
        RenderMode::Columns => {
            for slab in raycast::column_slabs(&game.grid, &cam, config.fov_half_angle) {
                canvas.fill_rect(Rect::new(slab.left, slab.top, slab.width, slab.height), WALL_FILL);
            }
        }
    }
    draw_target(canvas, &game.grid, &cam, &game.target, config);
    draw_minimap(canvas, game, config);
}

/// Gradient strips fading out from the horizon.
fn draw_floor_ceiling(canvas: &mut impl Canvas) {
    let (w, h) = (canvas.width(), canvas.height());
    let mut shade: i32 = 150;
    for y in (0..h / 2).step_by(STRIP_WIDTH as usize) {
        let c = shade as u8;
        let sky = pack_rgb(0, c, (shade + 50).min(255) as u8);
        canvas.line([0, y], [w, y], STRIP_WIDTH, sky);
        canvas.line([0, h - y], [w, h - y], STRIP_WIDTH, pack_rgb(c, c, c));
        shade = (shade - 2).max(0);
    }
}

/// Paints segments in the given order; callers sort far to near first.
pub fn draw_walls(canvas: &mut impl Canvas, segments: &[WallSegment]) {
    for seg in segments.iter().filter(|s| s.visible()) {
        let outline = seg.outline();
        canvas.fill_polygon(&outline, WALL_FILL);
        canvas.stroke_polygon(&outline, EDGE_WIDTH, WALL_EDGE);
    }
}

/// The ball: a face at the horizon, scaled by distance.
///
/// Hidden when the sight line is blocked or it is behind the viewer.
fn draw_target(
    canvas: &mut impl Canvas,
    grid: &Grid,
    cam: &Camera,
    target: &Target,
    config: &GameConfig,
) {
    if !target.in_sight(grid, cam.pos) {
        return;
    }
    let Some(projected) = cam.project(target.pos) else {
        return;
    };
    if !projected.forward {
        return;
    }
    let dist = cam.distance_to(target.pos);
    let size = (config.target_size * cam.tile_size / dist)
        .min(cam.screen_w.max(cam.screen_h)) as i32;
    let x = projected.x;
    let y = cam.screen_center_y() as i32;

    canvas.fill_circle([x, y], size, BALL);
    for eye_x in [x - size / 2, x + size / 2] {
        canvas.stroke_circle([eye_x, y - size / 4], size / 6, size / 14, EYE);
    }
    let mouth = size / 4 * 3;
    let spread = cam.tile_size / dist;
    canvas.arc(
        Rect::new(x - mouth, y - mouth, mouth * 2, mouth * 2),
        -FRAC_PI_2 - spread,
        -FRAC_PI_2 + spread,
        size / 20,
        MOUTH,
    );
}

/// Top-down map in the bottom-right corner.
fn draw_minimap(canvas: &mut impl Canvas, game: &Game, config: &GameConfig) {
    let grid = &game.grid;
    let scale = config.minimap_scale as i32;
    let (map_w, map_h) = (scale * grid.cols() as i32, scale * grid.rows() as i32);
    let origin = [canvas.width() - map_w, canvas.height() - map_h];

    canvas.fill_rect(Rect::new(origin[0], origin[1], map_w, map_h), BACKGROUND);
    for row in 0..grid.rows() {
        for col in 0..grid.cols() {
            let color = if grid.is_solid(TileCoord { col, row }) {
                MAP_SOLID
            } else {
                MAP_FREE
            };
            let cell = Rect::new(
                origin[0] + col as i32 * scale,
                origin[1] + row as i32 * scale,
                scale - 1,
                scale - 1,
            );
            canvas.fill_rect(cell, color);
        }
    }

    let to_map = |p: [f32; 2]| {
        let k = scale as f32 / grid.tile_size();
        [origin[0] + (p[0] * k) as i32, origin[1] + (p[1] * k) as i32]
    };
    draw_player_marker(canvas, &game.player, to_map(game.player.pos), config);
    canvas.fill_circle(to_map(game.target.pos), MAP_TARGET_RADIUS, BALL);
}

/// A 90° wedge opening along the heading.
fn draw_player_marker(
    canvas: &mut impl Canvas,
    player: &Player,
    at: [i32; 2],
    config: &GameConfig,
) {
    let size = config.player_marker_size as i32;
    let bounds = Rect::new(at[0] - size / 2, at[1] - size / 2, size, size);
    // arc angles run counter-clockwise, headings clockwise
    let heading = -player.heading;
    canvas.arc(
        bounds,
        (heading - 45.0).to_radians(),
        (heading + 45.0).to_radians(),
        size,
        MAP_PLAYER,
    );
}

/// Red band across the horizon.
fn draw_game_over(canvas: &mut impl Canvas) {
    let band = canvas.height() / 10;
    let y = canvas.height() / 2 - band / 2;
    canvas.fill_rect(Rect::new(0, y, canvas.width(), band), BANNER);
}
