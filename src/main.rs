//! Snowboard entry point
//!
//! Headless demo: builds a small course, feeds the fixed-timestep loop a
//! scripted tilt and restarts each round the way a player tapping their cube
//! would.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;
    use std::time::Instant;

    use glam::Vec3;

    use snowboard::Settings;
    use snowboard::consts::*;
    use snowboard::sim::{GameEvent, GameState, Outcome, Side, TickInput, TileId, tick};
    use snowboard::timer::{RoundTimer, format_clock};

    /// Simulated display refresh
    const FRAME_DT: f32 = 1.0 / 30.0;
    /// Length of the demo in frames
    const FRAMES: u32 = 30 * 120;

    /// Demo driver holding the accumulator between frames
    struct Game {
        state: GameState,
        accumulator: f32,
        input: TickInput,
        wins: u32,
        losses: u32,
        transitions: u32,
        timer: RoundTimer,
        /// Host clock at the current frame, in milliseconds
        now_ms: f64,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            Self {
                state: GameState::new(settings),
                accumulator: 0.0,
                input: TickInput::default(),
                wins: 0,
                losses: 0,
                transitions: 0,
                timer: RoundTimer::default(),
                now_ms: 0.0,
            }
        }

        /// Three cubes: 0 above 1, 2 turned on its side to the right of 1,
        /// and 2 feeding back into 0's left edge
        fn build_course(&mut self) {
            for id in 0..3 {
                if let Err(e) = self.state.setup_tile(TileId(id)) {
                    log::error!("Tile setup failed: {}", e);
                }
            }
            let links = [
                (TileId(0), Side::Bottom, TileId(1), Side::Top),
                (TileId(1), Side::Right, TileId(2), Side::Top),
                (TileId(2), Side::Bottom, TileId(0), Side::Left),
            ];
            let mut wired = 0;
            for (a, side_a, b, side_b) in links {
                if self.state.connect(a, side_a, b, side_b).is_ok() {
                    wired += 1;
                }
            }
            if wired < links.len() {
                log::warn!("Only {} of {} course links wired", wired, links.len());
            }
        }

        /// Scripted rider: lean downhill in the owner's frame with some sway
        fn steer(&mut self, frame: u32) {
            let t = frame as f32 * FRAME_DT;
            let sway = (t * 1.3).sin() * 0.8;
            let lean = match self.state.player.facing {
                Side::Bottom => Vec3::new(sway, 1.6, 0.6),
                Side::Top => Vec3::new(sway, -1.6, 0.6),
                Side::Right => Vec3::new(1.6, sway, 0.6),
                Side::Left => Vec3::new(-1.6, sway, 0.6),
            };
            self.input.tilt = self
                .state
                .course
                .ids()
                .into_iter()
                .map(|id| {
                    if Some(id) == self.state.player.owner {
                        (id, lean)
                    } else {
                        (id, Vec3::new(0.0, 0.0, 1.0))
                    }
                })
                .collect();
        }

        /// Run simulation ticks for one frame
        fn update(&mut self, dt: f32, time: f64) {
            self.now_ms = time;
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // One-shot input
                self.input.touch = None;
                self.handle_events();
            }
        }

        fn handle_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::Transition(_) => self.transitions += 1,
                    GameEvent::Reset => self.timer.restart(self.now_ms),
                    GameEvent::RoundOver(end) => {
                        self.timer.stop(self.now_ms);
                        log::info!(
                            "Run time {} ({})",
                            format_clock(self.timer.elapsed_secs(self.now_ms)),
                            end
                        );
                        match end.outcome() {
                            Outcome::Win => self.wins += 1,
                            Outcome::Lose => self.losses += 1,
                        }
                        // Tap the player's cube to go again
                        self.input.touch = self.state.player.owner;
                    }
                    _ => {}
                }
            }
        }
    }

    pub fn run() {
        env_logger::init();
        log::info!("Snowboard (headless) starting...");

        let settings = match std::env::args().nth(1) {
            Some(path) => Settings::load(&PathBuf::from(path)),
            None => Settings::default(),
        };

        let mut game = Game::new(settings);
        game.build_course();

        let started = Instant::now();
        game.timer.restart(0.0);
        for frame in 0..FRAMES {
            game.steer(frame);
            game.update(FRAME_DT, started.elapsed().as_secs_f64() * 1000.0);
        }

        let snapshot = game.state.snapshot();
        println!(
            "{} rounds won, {} lost, {} tile crossings in {:.1}s of play ({} ms wall)",
            game.wins,
            game.losses,
            game.transitions,
            FRAMES as f32 * FRAME_DT,
            started.elapsed().as_millis()
        );
        match serde_json::to_string_pretty(&snapshot) {
            Ok(json) => log::debug!("Final snapshot:\n{}", json),
            Err(e) => log::warn!("Snapshot not serializable: {}", e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is embedded by the host
}
