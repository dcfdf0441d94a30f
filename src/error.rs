use std::path::PathBuf;

use thiserror::Error;

/// Map data that cannot host a session.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("map has no rows")]
    Empty,

    #[error("map row {row} has {found} tiles, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown map symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { row: usize, col: usize, symbol: char },

    #[error("map has no free interior tile to spawn on")]
    NoFreeTile,

    #[error("failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} must be positive, got {value}")]
    NotPositive { key: &'static str, value: f32 },

    #[error("field of view half angle must lie in (0, 90) degrees, got {0}")]
    FieldOfView(f32),

    #[error("minimap ({map_w}x{map_h} px) does not fit the {canvas_w}x{canvas_h} canvas")]
    MinimapTooLarge {
        map_w: u32,
        map_h: u32,
        canvas_w: u32,
        canvas_h: u32,
    },
}

/// Failures that stop the session.
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("presentation surface error: {0}")]
    Surface(String),
}

// SoftBufferError may carry a non-Send platform error, keep only its message
impl From<softbuffer::SoftBufferError> for GameError {
    fn from(err: softbuffer::SoftBufferError) -> Self {
        Self::Surface(err.to_string())
    }
}
