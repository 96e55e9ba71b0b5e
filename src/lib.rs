//! Flappy - A side-scrolling pipe dodging game engine
//!
//! Core modules:
//! - `sim`: Game session, spawning, bonus effects and collision rules
//! - `config`: Data-driven game variants and difficulty tuning
//! - `error`: Configuration and lookup errors
//!
//! Rendering, physics and audio are provided by the host through the traits in
//! [`sim::surface`]. [`sim::ArcadeWorld`] is a headless stand-in used by the
//! native binary and the tests.

pub mod config;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use error::{GameError, GameResult};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default screen dimensions
    pub const SCREEN_WIDTH: f32 = 700.0;
    pub const SCREEN_HEIGHT: f32 = 400.0;

    /// Player spawn point
    pub const PLAYER_START_X: f32 = 80.0;
    pub const PLAYER_START_Y: f32 = 200.0;
    /// Upward velocity applied by a jump (px/s)
    pub const JUMP_POWER: f32 = 200.0;

    /// Pipe geometry
    pub const PIPE_BLOCK_HEIGHT: f32 = 50.0;
    pub const PIPE_BLOCK_WIDTH: f32 = 50.0;
    pub const PIPE_END_HEIGHT: f32 = 25.0;
    pub const PIPE_END_WIDTH: f32 = 60.0;
    /// End caps overhang the filler blocks by this much on the left
    pub const PIPE_END_OVERHANG: f32 = 5.0;
    /// Minimum distance between the gap and either screen edge
    pub const GAP_MARGIN: f32 = 50.0;

    /// Seconds a timed bonus stays active
    pub const BONUS_DURATION: f32 = 10.0;
    /// Gravity change applied by a bonus (px/s²)
    pub const BONUS_GRAVITY_DELTA: f32 = 50.0;

    /// Entities this far past the screen edge are destroyed
    pub const CULL_MARGIN: f32 = 100.0;

    /// Sky color before any bonus is applied
    pub const BASE_BACKGROUND: (u8, u8, u8) = (110, 179, 229);

    /// Text placement
    pub const WELCOME_TEXT: &str = "Welcome to my game";
    pub const WELCOME_POS: (f32, f32) = (20.0, 20.0);
    pub const SCORE_POS: (f32, f32) = (20.0, 60.0);
    pub const LABEL_FONT: &str = "30px Arial";
    pub const LABEL_FILL: &str = "#FFFFFF";
}

/// Sprite and sound aliases used by the engine
pub mod assets {
    pub const PLAYER: &str = "playerImg";
    pub const PIPE: &str = "pipe";
    pub const PIPE_END: &str = "pipeEnd";
    pub const BALLOONS: &str = "balloons";
    pub const WEIGHT: &str = "weight";
    pub const EASY_MARKER: &str = "Easy";
    pub const NORMAL_MARKER: &str = "Normal";
    pub const SCORE_SOUND: &str = "score";

    /// Images loaded at boot (alias, path)
    pub const IMAGES: &[(&str, &str)] = &[
        (PLAYER, "assets/flappy-cropped.png"),
        (PIPE, "assets/pipe.png"),
        (PIPE_END, "assets/pipe-end.png"),
        (BALLOONS, "assets/balloons.png"),
        (WEIGHT, "assets/weight.png"),
        (EASY_MARKER, "assets/easy.png"),
        (NORMAL_MARKER, "assets/normal.png"),
    ];

    /// Sounds loaded at boot (alias, path)
    pub const SOUNDS: &[(&str, &str)] = &[(SCORE_SOUND, "assets/point.ogg")];
}
