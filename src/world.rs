use std::path::Path;

use rand::Rng;

use crate::error::GridError;

pub const SOLID: char = '#';
pub const FREE: char = '.';

/// Built-in maze used when no map file is configured.
pub const DEFAULT_MAP: &[&str] = &[
    "####################",
    "#.....#............#",
    "#.###.#.#####.####.#",
    "#.#...#.....#....#.#",
    "#.#.#######.####.#.#",
    "#...#.....#....#...#",
    "###.#.###.####.###.#",
    "#.....#..........#.#",
    "#.#####.######.#.#.#",
    "#.......#......#...#",
    "#..##...#..###.....#",
    "####################",
];

/// Grid coordinates of one tile: the identity of a wall across rays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub col: usize,
    pub row: usize,
}

/// What a world point falls on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tile {
    Empty,
    Solid(TileCoord),
    /// Outside the field.
    Outfield,
}

pub struct Grid {
    cols: usize,
    rows: usize,
    solid: Vec<bool>, // row-major
    tile_size: f32,
}

impl Grid {
    /// Parses equal-length rows of `#` (solid) and `.` (free).
    ///
    /// The map must have at least one free tile off the outer ring so that
    /// spawning always terminates.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self, GridError> {
        let first = rows.first().ok_or(GridError::Empty)?;
        let cols = first.as_ref().chars().count();
        if cols == 0 {
            return Err(GridError::Empty);
        }

        let mut solid = Vec::with_capacity(cols * rows.len());
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != cols {
                return Err(GridError::Ragged {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, symbol) in line.chars().enumerate() {
                match symbol {
                    SOLID => solid.push(true),
                    FREE => solid.push(false),
                    _ => return Err(GridError::UnknownSymbol { row, col, symbol }),
                }
            }
        }

        let grid = Self {
            cols,
            rows: rows.len(),
            solid,
            tile_size,
        };
        if grid.interior().next().is_none() {
            return Err(GridError::NoFreeTile);
        }
        Ok(grid)
    }

    /// Reads a map file; blank lines around the map are dropped.
    pub fn load(path: &Path, tile_size: f32) -> Result<Self, GridError> {
        let text = std::fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, tile_size)
    }

    pub fn parse(text: &str, tile_size: f32) -> Result<Self, GridError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim_end)
            .skip_while(|l| l.is_empty())
            .collect();
        let end = rows.iter().rposition(|l| !l.is_empty()).map_or(0, |i| i + 1);
        Self::from_rows(&rows[..end], tile_size)
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Tile containing a world point.
    pub fn tile_value(&self, x: f32, y: f32) -> Tile {
        let (Some(col), Some(row)) = (self.axis_index(x, self.cols), self.axis_index(y, self.rows))
        else {
            return Tile::Outfield;
        };
        if self.solid[row * self.cols + col] {
            Tile::Solid(TileCoord { col, row })
        } else {
            Tile::Empty
        }
    }

    /// True iff the point lies on a free tile inside the field.
    #[inline]
    pub fn check(&self, x: f32, y: f32) -> bool {
        self.tile_value(x, y) == Tile::Empty
    }

    #[inline]
    pub fn is_solid(&self, coord: TileCoord) -> bool {
        coord.col < self.cols && coord.row < self.rows && self.solid[coord.row * self.cols + coord.col]
    }

    /// World-space `(min, max)` corners of a tile.
    pub fn tile_bounds(&self, coord: TileCoord) -> ([f32; 2], [f32; 2]) {
        let x0 = coord.col as f32 * self.tile_size;
        let y0 = coord.row as f32 * self.tile_size;
        ([x0, y0], [x0 + self.tile_size, y0 + self.tile_size])
    }

    pub fn tile_center(&self, coord: TileCoord) -> [f32; 2] {
        let half = self.tile_size / 2.0;
        let (min, _) = self.tile_bounds(coord);
        [min[0] + half, min[1] + half]
    }

    /// Center of a uniformly drawn free tile off the outer ring.
    pub fn random_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> [f32; 2] {
        // from_rows guarantees a free interior tile exists
        loop {
            let coord = TileCoord {
                col: rng.random_range(1..self.cols - 1),
                row: rng.random_range(1..self.rows - 1),
            };
            if !self.is_solid(coord) {
                return self.tile_center(coord);
            }
        }
    }

    fn interior(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let rows = 1..self.rows.saturating_sub(1);
        rows.flat_map(move |row| {
            (1..self.cols.saturating_sub(1)).map(move |col| TileCoord { col, row })
        })
        .filter(|&c| !self.is_solid(c))
    }

    fn axis_index(&self, v: f32, len: usize) -> Option<usize> {
        if !v.is_finite() {
            return None;
        }
        let i = (v / self.tile_size).floor();
        (i >= 0.0 && i < len as f32).then_some(i as usize)
    }
}
