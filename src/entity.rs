use crate::geom;
use crate::raycast::{self, SIGHT_STEP};
use crate::world::Grid;

/// How far ahead, in steps, a move must be clear before it is taken.
pub const LOOKAHEAD_STEPS: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
}

impl Direction {
    /// Rotates a heading-aligned step into this direction.
    #[inline]
    fn apply(self, [dx, dy]: [f32; 2]) -> [f32; 2] {
        match self {
            Self::Forward => [dx, dy],
            Self::Backward => [-dx, -dy],
            Self::StrafeLeft => [dy, -dx],
            Self::StrafeRight => [-dy, dx],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundState {
    Continues,
    Ended,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: [f32; 2],
    /// Degrees; never normalised.
    pub heading: f32,
}

impl Player {
    pub fn new(pos: [f32; 2]) -> Self {
        Self { pos, heading: 0.0 }
    }

    /// Moves one `step` in `dir` if both the point `LOOKAHEAD_STEPS` ahead
    /// and the landing point are free.
    ///
    /// Returns whether the move was taken.
    pub fn walk(&mut self, grid: &Grid, dir: Direction, step: f32) -> bool {
        let delta = dir.apply(geom::polar(step, self.heading));
        let ahead = geom::add(self.pos, geom::scale(delta, LOOKAHEAD_STEPS));
        let next = geom::add(self.pos, delta);
        // a diagonal lookahead can clear a corner the landing point cuts
        if !grid.check(ahead[0], ahead[1]) || !grid.check(next[0], next[1]) {
            return false;
        }
        self.pos = next;
        true
    }

    /// Positive turns rotate clockwise on screen.
    #[inline]
    pub fn turn(&mut self, degrees: f32) {
        self.heading += degrees;
    }
}

/// The bouncing ball that chases the player.
#[derive(Clone, Debug, PartialEq)]
pub struct Target {
    pub pos: [f32; 2],
    /// Player position when the target last had a clear sight line.
    pub last_seen: [f32; 2],
    /// Displacement applied on the last sighted move.
    pub last_step: [f32; 2],
}

impl Target {
    pub fn new(pos: [f32; 2]) -> Self {
        Self {
            pos,
            last_seen: pos,
            last_step: [0.0, 0.0],
        }
    }

    /// Whether the player can see the target, marching from the player.
    #[inline]
    pub fn in_sight(&self, grid: &Grid, player: [f32; 2]) -> bool {
        raycast::clear_path(grid, player, self.pos, SIGHT_STEP)
    }

    /// One chase step.
    ///
    /// With a clear sight line the target closes in by `step` and remembers
    /// the move. Without one it keeps coasting on the remembered move until it
    /// is within `step` of where it last saw the player, then holds.
    pub fn act(&mut self, grid: &Grid, player: [f32; 2], step: f32) -> RoundState {
        if self.in_sight(grid, player) {
            // Coincident positions give no direction; the round ends below.
            let delta = geom::toward(self.pos, player, step).unwrap_or([0.0, 0.0]);
            self.pos = geom::add(self.pos, delta);
            self.last_step = delta;
            self.last_seen = player;
        } else if (self.last_seen[0] - self.pos[0]).abs() >= step
            || (self.last_seen[1] - self.pos[1]).abs() >= step
        {
            self.pos = geom::add(self.pos, self.last_step);
        }

        if (player[0] - self.pos[0]).abs() < step && (player[1] - self.pos[1]).abs() < step {
            RoundState::Ended
        } else {
            RoundState::Continues
        }
    }
}
