//! Flappy headless demo
//!
//! Runs the game against the in-memory arcade world with the autopilot
//! flying. Usage: `flappy [config.json] [seconds]`

use flappy::GameConfig;
use flappy::consts::*;
use flappy::sim::{ArcadeWorld, Game, GameEvent, PcgRandom, TickInput, tick};

/// Host frame rate the demo pretends to render at
const FRAME_DT: f32 = 1.0 / 30.0;
const DEFAULT_SECONDS: f32 = 60.0;

/// Fixed-step driver, the way a windowed host would feed frames in
struct Demo {
    game: Game<ArcadeWorld, PcgRandom>,
    input: TickInput,
    accumulator: f32,
    sessions: u32,
    best_score: u32,
}

impl Demo {
    fn new(game: Game<ArcadeWorld, PcgRandom>) -> Self {
        Self {
            game,
            input: TickInput {
                autopilot: true,
                ..Default::default()
            },
            accumulator: 0.0,
            sessions: 0,
            best_score: 0,
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.game, &self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs
            self.input.jump = false;
            self.input.restart = false;
        }

        for event in self.game.drain_events() {
            match event {
                GameEvent::ModeChosen { name } => log::info!("Flying in {} mode", name),
                GameEvent::GameOver { cause, score } => {
                    self.sessions += 1;
                    self.best_score = self.best_score.max(score);
                    log::info!("Session {} over: {:?}, score {}", self.sessions, cause, score);
                }
                GameEvent::BonusCollected { kind } => log::debug!("Picked up {:?}", kind),
                _ => {}
            }
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f32>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let seed = config.seed;
    let game = match Game::new(config, ArcadeWorld::new(), PcgRandom::new(seed)) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("Flappy starting with seed {} for {}s", seed, seconds);

    let mut demo = Demo::new(game);
    let frames = (seconds / FRAME_DT).ceil() as u32;
    for _ in 0..frames {
        demo.update(FRAME_DT);
    }
    demo.game.quit();

    println!(
        "{} sessions ended, best score {}, last score {}",
        demo.sessions,
        demo.best_score,
        demo.game.score()
    );
}
