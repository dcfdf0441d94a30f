use std::collections::HashSet;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::canvas::FrameBuffer;
use crate::config::GameConfig;
use crate::entity::RoundState;
use crate::error::GameError;
use crate::game::{Action, Game, Input};
use crate::scaler::Stretch;
use crate::world::{DEFAULT_MAP, Grid};

mod camera;
mod canvas;
mod config;
mod entity;
mod error;
mod game;
mod geom;
mod raycast;
mod renderer;
mod scaler;
mod wall;
mod world;

const TITLE: &str = "Maze Raycaster";
const GAME_OVER_TITLE: &str = "Game Over!";

/// Keys currently held down.
#[derive(Default)]
struct Keyboard(HashSet<KeyCode>);

impl Input for Keyboard {
    fn pressed(&self, action: Action) -> bool {
        let key = match action {
            Action::Forward => KeyCode::KeyW,
            Action::Backward => KeyCode::KeyS,
            Action::StrafeLeft => KeyCode::KeyA,
            Action::StrafeRight => KeyCode::KeyD,
            Action::TurnLeft => KeyCode::ArrowLeft,
            Action::TurnRight => KeyCode::ArrowRight,
            Action::Restart => KeyCode::Space,
        };
        self.0.contains(&key)
    }
}

/// Window title to switch to when a tick moves the round from `before` to
/// `after`.
fn title_change(before: RoundState, after: RoundState) -> Option<&'static str> {
    (before != after).then_some(match after {
        RoundState::Continues => TITLE,
        RoundState::Ended => GAME_OVER_TITLE,
    })
}

struct App {
    window: Option<Rc<Window>>,
    surface: Option<softbuffer::Surface<Rc<Window>, Rc<Window>>>,
    game: Game,

    // Fixed-size canvas, stretched onto the window
    frame: FrameBuffer,
    stretch: Stretch,

    keys_down: Keyboard,
    next_tick: Instant,

    // HUD
    frame_counter: u32,
    last_fps_log: Instant,

    failure: Option<GameError>,
}

impl App {
    fn new(game: Game) -> Self {
        let config = game.config();
        let (w, h) = (config.canvas_width as usize, config.canvas_height as usize);
        Self {
            window: None,
            surface: None,
            game,
            frame: FrameBuffer::new(w, h),
            stretch: Stretch::new(w, h, w, h),
            keys_down: Keyboard::default(),
            next_tick: Instant::now(),
            frame_counter: 0,
            last_fps_log: Instant::now(),
            failure: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<(), GameError> {
        let config = self.game.config();
        let attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(LogicalSize::new(config.canvas_width, config.canvas_height));
        let window = Rc::new(event_loop.create_window(attributes)?);

        let context = softbuffer::Context::new(window.clone())?;
        let surface = softbuffer::Surface::new(&context, window.clone())?;

        let size = window.inner_size();
        self.stretch.resize(size.width as usize, size.height as usize);

        self.surface = Some(surface);
        self.window = Some(window);
        Ok(())
    }

    /// One game step: input, motion, round bookkeeping.
    fn tick(&mut self) {
        let before = self.game.round;
        let after = self.game.update(&self.keys_down);
        if let (Some(title), Some(window)) = (title_change(before, after), &self.window) {
            window.set_title(title);
        }
    }

    fn present(&mut self, id: WindowId) -> Result<(), GameError> {
        let (window, surface) = match (&self.window, &mut self.surface) {
            (Some(w), Some(s)) if w.id() == id => (w, s),
            _ => return Ok(()),
        };

        let size = window.inner_size();
        let (Some(dw), Some(dh)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return Ok(()); // Minimized window, skip drawing
        };
        surface.resize(dw, dh)?;
        self.stretch.resize(dw.get() as usize, dh.get() as usize);

        renderer::render_frame(&mut self.frame, &self.game);

        let mut buf = surface.buffer_mut()?;
        self.stretch.blit(self.frame.pixels(), &mut buf);
        buf.present()?;

        self.frame_counter += 1;
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_fps_log).as_secs_f32();
        if elapsed >= 1.0 {
            tracing::debug!(fps = self.frame_counter as f32 / elapsed, "frame rate");
            self.frame_counter = 0;
            self.last_fps_log = now;
        }
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: GameError) {
        tracing::error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.create_window(event_loop) {
            self.fail(event_loop, err);
            return;
        }
        self.next_tick = Instant::now();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("window closed, stopping");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed if code == KeyCode::Escape => {
                    tracing::info!("escape pressed, stopping");
                    event_loop.exit();
                }
                ElementState::Pressed => {
                    self.keys_down.0.insert(code);
                }
                ElementState::Released => {
                    self.keys_down.0.remove(&code);
                }
            },

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.present(id) {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::Resized(size) => {
                self.stretch.resize(size.width as usize, size.height as usize);
            }

            WindowEvent::Focused(false) => {
                // keys released while unfocused never report back
                self.keys_down.0.clear();
            }
            _ => (),
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_tick {
            self.tick();
            self.next_tick = now + self.game.config().frame_delay;
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_grid(config: &GameConfig) -> Result<Grid, GameError> {
    let grid = match &config.map_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading map");
            Grid::load(path, config.tile_size())?
        }
        None => Grid::from_rows(DEFAULT_MAP, config.tile_size())?,
    };
    config.validate_minimap(grid.cols(), grid.rows())?;
    Ok(grid)
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let config = GameConfig::from_env();
    config.validate()?;
    tracing::debug!(?config, "configuration loaded");

    let grid = load_grid(&config)?;
    tracing::info!(cols = grid.cols(), rows = grid.rows(), "map ready");

    let game = Game::new(grid, config);
    tracing::info!(
        player = ?game.player.pos,
        target = ?game.target.pos,
        "session started"
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now()));

    let mut app = App::new(game);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.failure {
        return Err(err.into());
    }
    tracing::info!("session ended");
    Ok(())
}
