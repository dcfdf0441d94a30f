use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::entity::{Direction, Player, RoundState, Target};
use crate::world::Grid;

/// Discrete controls polled once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    StrafeLeft,
    StrafeRight,
    TurnLeft,
    TurnRight,
    Restart,
}

/// Key-state source for one frame.
pub trait Input {
    fn pressed(&self, action: Action) -> bool;
}

pub struct Game {
    pub grid: Grid,
    pub player: Player,
    pub target: Target,
    pub round: RoundState,
    config: GameConfig,
    rng: StdRng,
}

impl Game {
    /// Spawns player and target on random free tiles.
    pub fn new(grid: Grid, config: GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let player = Player::new(grid.random_spawn(&mut rng));
        let target = Target::new(grid.random_spawn(&mut rng));
        Self {
            grid,
            player,
            target,
            round: RoundState::Continues,
            config,
            rng,
        }
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn restart(&mut self) {
        self.player = Player::new(self.grid.random_spawn(&mut self.rng));
        self.target = Target::new(self.grid.random_spawn(&mut self.rng));
        self.round = RoundState::Continues;
        tracing::info!(
            player = ?self.player.pos,
            target = ?self.target.pos,
            "round restarted"
        );
    }

    /// Applies one frame of input, then lets the target act.
    ///
    /// Once the round has ended only a restart request has any effect.
    pub fn update(&mut self, input: &impl Input) -> RoundState {
        if input.pressed(Action::Restart) {
            self.restart();
        }
        if self.round == RoundState::Ended {
            return self.round;
        }

        let step = self.config.player_step;
        let moves = [
            (Action::Forward, Direction::Forward),
            (Action::Backward, Direction::Backward),
            (Action::StrafeLeft, Direction::StrafeLeft),
            (Action::StrafeRight, Direction::StrafeRight),
        ];
        for (action, dir) in moves {
            if input.pressed(action) {
                self.player.walk(&self.grid, dir, step);
            }
        }
        if input.pressed(Action::TurnLeft) {
            self.player.turn(-self.config.player_turn);
        }
        if input.pressed(Action::TurnRight) {
            self.player.turn(self.config.player_turn);
        }

        self.round = self
            .target
            .act(&self.grid, self.player.pos, self.config.target_step);
        if self.round == RoundState::Ended {
            tracing::info!(pos = ?self.player.pos, "caught by the ball, round over");
        }
        self.round
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::world::tests::BOX_5;
    use std::collections::HashSet;

    #[derive(Default)]
    pub(crate) struct Held(pub HashSet<Action>);

    impl Held {
        pub(crate) fn of(actions: &[Action]) -> Self {
            Self(actions.iter().copied().collect())
        }
    }

    impl Input for Held {
        fn pressed(&self, action: Action) -> bool {
            self.0.contains(&action)
        }
    }

    pub(crate) fn seeded(rows: &[&str], seed: u64) -> Game {
        let config = GameConfig {
            seed: Some(seed),
            ..GameConfig::default()
        };
        with_config(rows, config)
    }

    pub(crate) fn with_config(rows: &[&str], config: GameConfig) -> Game {
        let grid = Grid::from_rows(rows, config.tile_size()).unwrap();
        Game::new(grid, config)
    }

    /// 5x5 room, player in the middle, ball in the north-west corner.
    fn box_game() -> Game {
        let mut game = seeded(BOX_5, 1);
        game.player = Player::new([125.0, 125.0]);
        game.target = Target::new([75.0, 75.0]);
        game
    }

    #[test]
    fn spawns_on_free_tiles() {
        for seed in 0..20 {
            let game = seeded(crate::world::DEFAULT_MAP, seed);
            assert!(game.grid.check(game.player.pos[0], game.player.pos[1]));
            assert!(game.grid.check(game.target.pos[0], game.target.pos[1]));
            assert_eq!(game.player.heading, 0.0);
        }
    }

    #[test]
    fn same_seed_same_spawns() {
        let a = seeded(crate::world::DEFAULT_MAP, 42);
        let b = seeded(crate::world::DEFAULT_MAP, 42);
        assert_eq!(a.player, b.player);
        assert_eq!(a.target, b.target);
    }

    #[test]
    fn forward_walks_to_the_wall_and_stops() {
        let mut game = box_game();
        // keep the ball out of the way
        game.target = Target::new([75.0, 175.0]);
        game.target.last_seen = game.target.pos;
        let forward = Held::of(&[Action::Forward]);

        let mut last_x = game.player.pos[0];
        let mut steps = 0;
        loop {
            let before = game.player.pos;
            let target_before = game.target.clone();
            game.update(&forward);
            // pin the ball so only the player moves
            game.target = target_before;
            if game.player.pos == before {
                break;
            }
            assert!(game.player.pos[0] > last_x);
            assert_eq!(game.player.pos[1], 125.0);
            last_x = game.player.pos[0];
            steps += 1;
            assert!(steps < 50);
        }
        let [x, y] = game.player.pos;
        assert!(game.grid.check(x, y));
        // adjacent to the east border, never inside it
        assert!(x < 200.0 && x >= 200.0 - 3.0 * game.config().player_step);
        assert_eq!(steps, 5);
    }

    #[test]
    fn turns_apply_configured_increment() {
        let mut game = box_game();
        game.update(&Held::of(&[Action::TurnRight]));
        game.update(&Held::of(&[Action::TurnRight]));
        game.update(&Held::of(&[Action::TurnLeft]));
        assert_eq!(game.player.heading, 10.0);
    }

    #[test]
    fn ended_round_freezes_until_restart() {
        let mut game = box_game();
        game.target = Target::new([130.0, 125.0]);
        assert_eq!(game.update(&Held::default()), RoundState::Ended);

        let pos = game.player.pos;
        let target = game.target.clone();
        assert_eq!(game.update(&Held::of(&[Action::Backward])), RoundState::Ended);
        assert_eq!(game.player.pos, pos);
        assert_eq!(game.target, target);

        game.update(&Held::of(&[Action::Restart]));
        assert_eq!(game.player.heading, 0.0);
        assert!(game.grid.check(game.player.pos[0], game.player.pos[1]));
    }

    #[test]
    fn restart_resets_round() {
        let mut game = box_game();
        game.round = RoundState::Ended;
        game.restart();
        assert_eq!(game.round, RoundState::Continues);
    }
}
