//! Session configuration: screen geometry, movement tuning and loaders.
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Which wall renderer draws the view.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderMode {
    /// One projected hexagon per exposed tile face.
    #[default]
    Faces,
    /// One flat slab per 0.5° ray.
    Columns,
}

impl FromStr for RenderMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "faces" => Ok(Self::Faces),
            "columns" => Ok(Self::Columns),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// World units per tile edge.
    pub tile_scale: u32,
    /// Minimap pixels per tile edge.
    pub minimap_scale: u32,
    pub player_step: f32,
    /// Degrees per turn request.
    pub player_turn: f32,
    pub wall_height: f32,
    pub target_step: f32,
    pub target_size: f32,
    pub player_marker_size: u32,
    pub fov_half_angle: f32,
    pub frame_delay: Duration,
    pub render_mode: RenderMode,
    pub map_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl GameConfig {
    pub const DEFAULT_CANVAS_WIDTH: u32 = 800;
    pub const DEFAULT_CANVAS_HEIGHT: u32 = 500;
    pub const DEFAULT_TILE_SCALE: u32 = 50;
    pub const DEFAULT_MINIMAP_SCALE: u32 = 10;
    pub const DEFAULT_PLAYER_STEP: f32 = 10.0;
    pub const DEFAULT_PLAYER_TURN: f32 = 10.0;
    pub const DEFAULT_WALL_HEIGHT: f32 = 400.0;
    pub const DEFAULT_TARGET_STEP: f32 = 8.0;
    pub const DEFAULT_TARGET_SIZE: f32 = 300.0;
    pub const DEFAULT_PLAYER_MARKER_SIZE: u32 = 8;
    pub const DEFAULT_FOV_HALF_ANGLE: f32 = 45.0;
    pub const DEFAULT_FRAME_DELAY_MS: u64 = 100;

    pub fn new() -> Self {
        Self {
            canvas_width: Self::DEFAULT_CANVAS_WIDTH,
            canvas_height: Self::DEFAULT_CANVAS_HEIGHT,
            tile_scale: Self::DEFAULT_TILE_SCALE,
            minimap_scale: Self::DEFAULT_MINIMAP_SCALE,
            player_step: Self::DEFAULT_PLAYER_STEP,
            player_turn: Self::DEFAULT_PLAYER_TURN,
            wall_height: Self::DEFAULT_WALL_HEIGHT,
            target_step: Self::DEFAULT_TARGET_STEP,
            target_size: Self::DEFAULT_TARGET_SIZE,
            player_marker_size: Self::DEFAULT_PLAYER_MARKER_SIZE,
            fov_half_angle: Self::DEFAULT_FOV_HALF_ANGLE,
            frame_delay: Duration::from_millis(Self::DEFAULT_FRAME_DELAY_MS),
            render_mode: RenderMode::Faces,
            map_path: None,
            seed: None,
        }
    }

    /// Defaults overlaid with process environment variables.
    ///
    /// Environment variables:
    /// - `RAYCAST_CANVAS_WIDTH`, `RAYCAST_CANVAS_HEIGHT` - canvas size in pixels
    /// - `RAYCAST_TILE_SCALE` - world units per tile (default: 50)
    /// - `RAYCAST_MINIMAP_SCALE` - minimap pixels per tile (default: 10)
    /// - `RAYCAST_PLAYER_STEP` - player step length (default: 10)
    /// - `RAYCAST_PLAYER_TURN` - degrees per turn (default: 10)
    /// - `RAYCAST_WALL_HEIGHT` - wall base height (default: 400)
    /// - `RAYCAST_TARGET_STEP` - target step length (default: 8)
    /// - `RAYCAST_TARGET_SIZE` - target sprite size (default: 300)
    /// - `RAYCAST_FOV` - field of view half angle in degrees (default: 45)
    /// - `RAYCAST_FRAME_DELAY_MS` - delay between frames (default: 100)
    /// - `RAYCAST_RENDER_MODE` - `faces` or `columns` (default: faces)
    /// - `RAYCAST_MAP` - map file to load instead of the built-in maze
    /// - `RAYCAST_SEED` - spawn RNG seed (default: OS entropy)
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::new();

        if let Some(v) = parse(lookup("RAYCAST_CANVAS_WIDTH")) {
            config.canvas_width = v;
        }
        if let Some(v) = parse(lookup("RAYCAST_CANVAS_HEIGHT")) {
            config.canvas_height = v;
        }
        if let Some(v) = parse(lookup("RAYCAST_TILE_SCALE")) {
            config.tile_scale = v;
        }
        if let Some(v) = parse(lookup("RAYCAST_MINIMAP_SCALE")) {
            config.minimap_scale = v;
        }
        if let Some(v) = parse(lookup("RAYCAST_PLAYER_STEP")) {
            config.player_step = v;
        }
        if let Some(v) = parse(lookup("RAYCAST_PLAYER_TURN")) {
            config.player_turn = v;
        }
        if let Some(v) = parse(lookup("RAYCAST_WALL_HEIGHT")) {
            config.wall_height = v;
        }
        if let Some(v) = parse(lookup("RAYCAST_TARGET_STEP")) {
            config.target_step = v;
        }
        if let Some(v) = parse(lookup("RAYCAST_TARGET_SIZE")) {
            config.target_size = v;
        }
        if let Some(v) = parse(lookup("RAYCAST_FOV")) {
            config.fov_half_angle = v;
        }
        if let Some(ms) = parse::<u64>(lookup("RAYCAST_FRAME_DELAY_MS")) {
            config.frame_delay = Duration::from_millis(ms);
        }
        if let Some(mode) = parse(lookup("RAYCAST_RENDER_MODE")) {
            config.render_mode = mode;
        }
        config.map_path = lookup("RAYCAST_MAP").map(PathBuf::from);
        config.seed = parse(lookup("RAYCAST_SEED"));

        config
    }

    /// Rejects values the projection and motion code cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("canvas_width", self.canvas_width as f32),
            ("canvas_height", self.canvas_height as f32),
            ("tile_scale", self.tile_scale as f32),
            ("minimap_scale", self.minimap_scale as f32),
            ("player_step", self.player_step),
            ("wall_height", self.wall_height),
            ("target_step", self.target_step),
            ("target_size", self.target_size),
        ];
        for (key, value) in positive {
            // NaN fails this comparison too
            if !(value > 0.0) {
                return Err(ConfigError::NotPositive { key, value });
            }
        }
        if !(self.fov_half_angle > 0.0 && self.fov_half_angle < 90.0) {
            return Err(ConfigError::FieldOfView(self.fov_half_angle));
        }
        Ok(())
    }

    /// Checks that a `cols x rows` minimap fits inside the canvas.
    pub fn validate_minimap(&self, cols: usize, rows: usize) -> Result<(), ConfigError> {
        let map_w = self.minimap_scale.saturating_mul(cols as u32);
        let map_h = self.minimap_scale.saturating_mul(rows as u32);
        if map_w > self.canvas_width || map_h > self.canvas_height {
            return Err(ConfigError::MinimapTooLarge {
                map_w,
                map_h,
                canvas_w: self.canvas_width,
                canvas_h: self.canvas_height,
            });
        }
        Ok(())
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_scale as f32
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_validate() {
        let config = GameConfig::default();
        assert_eq!(config.canvas_width, 800);
        assert_eq!(config.canvas_height, 500);
        assert_eq!(config.tile_scale, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = GameConfig::from_lookup(lookup(&[
            ("RAYCAST_CANVAS_WIDTH", "640"),
            ("RAYCAST_PLAYER_STEP", "4.5"),
            ("RAYCAST_RENDER_MODE", "Columns"),
            ("RAYCAST_SEED", "7"),
            ("RAYCAST_FRAME_DELAY_MS", "16"),
        ]));
        assert_eq!(config.canvas_width, 640);
        assert_eq!(config.player_step, 4.5);
        assert_eq!(config.render_mode, RenderMode::Columns);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.frame_delay, Duration::from_millis(16));
    }

    #[test]
    fn unparsable_values_are_ignored() {
        let config = GameConfig::from_lookup(lookup(&[
            ("RAYCAST_TILE_SCALE", "wide"),
            ("RAYCAST_RENDER_MODE", "voxels"),
        ]));
        assert_eq!(config.tile_scale, GameConfig::DEFAULT_TILE_SCALE);
        assert_eq!(config.render_mode, RenderMode::Faces);
    }

    #[test]
    fn rejects_non_positive_step() {
        let config = GameConfig {
            player_step: 0.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive {
                key: "player_step",
                ..
            })
        ));
    }

    #[test]
    fn rejects_out_of_range_fov() {
        let config = GameConfig {
            fov_half_angle: 90.0,
            ..GameConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::FieldOfView(_))));
    }

    #[test]
    fn minimap_must_fit_canvas() {
        let config = GameConfig::default();
        assert!(config.validate_minimap(20, 12).is_ok());
        assert!(config.validate_minimap(81, 12).is_err());
    }
}
