//! Session state and entity records
//!
//! Everything a restart has to reset lives in [`Session`]. Entity records only
//! keep the handles the host gave us plus what the rules need to know.

use serde::{Deserialize, Serialize};

use super::effects::EffectLedger;
use super::modes::DifficultyProfile;
use super::surface::{EntityHandle, PaletteDelta};

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Created, assets not yet loaded
    Booting,
    /// Markers on screen, waiting for the player to fly into one
    SelectingDifficulty,
    /// Pipes and bonuses are spawning
    Running,
    /// Player crashed; the next tick starts a fresh session
    GameOver,
    /// Shut down, ticks do nothing
    Terminal,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    HitPipe,
    OutOfBounds,
}

/// Bonus kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    /// Balloons: lower gravity, drifts upward
    Lighten,
    /// Weight: higher gravity, drifts downward
    Heavy,
}

impl BonusKind {
    pub fn opposite(self) -> Self {
        match self {
            BonusKind::Lighten => BonusKind::Heavy,
            BonusKind::Heavy => BonusKind::Lighten,
        }
    }

    pub fn sprite(self) -> &'static str {
        match self {
            BonusKind::Lighten => crate::assets::BALLOONS,
            BonusKind::Heavy => crate::assets::WEIGHT,
        }
    }
}

/// What picking up a bonus does
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusPayload {
    /// Added to player gravity (px/s²)
    pub gravity_delta: f32,
    /// Added to the background color
    pub palette_delta: PaletteDelta,
    /// Seconds until the effect is reverted; `None` lasts until an opposite
    /// bonus cancels it
    pub duration: Option<f32>,
}

/// Pipe block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    /// 25px cap bordering the gap
    End,
    /// 50px filler tile
    Filler,
}

impl BlockKind {
    pub fn sprite(self) -> &'static str {
        match self {
            BlockKind::End => crate::assets::PIPE_END,
            BlockKind::Filler => crate::assets::PIPE,
        }
    }
}

/// One spawned pipe block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub handle: EntityHandle,
    pub kind: BlockKind,
}

/// A spawned pipe column
#[derive(Debug, Clone)]
pub struct Obstacle {
    pub id: u32,
    /// Top edge of the opening
    pub gap_start: f32,
    pub blocks: Vec<Block>,
}

/// A spawned, not yet collected bonus
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bonus {
    pub id: u32,
    pub handle: EntityHandle,
    pub kind: BonusKind,
}

/// Things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    ModeChosen { name: String },
    ObstacleSpawned { score: u32, gap_start: f32 },
    BonusSpawned { kind: BonusKind },
    BonusCollected { kind: BonusKind },
    BonusExpired { kind: BonusKind },
    GameOver { cause: GameOverCause, score: u32 },
    Restarted { generation: u32 },
}

/// Mutable state of one game instance
#[derive(Debug, Clone)]
pub struct Session {
    pub score: u32,
    pub profile: DifficultyProfile,
    /// Gravity currently applied to the player
    pub current_gravity: f32,
    /// Sum of active palette deltas
    pub palette_offset: PaletteDelta,
    pub phase: GamePhase,
    /// Bumped on every restart; timers from older generations are ignored
    pub generation: u32,
    pub effects: EffectLedger,
}

impl Session {
    pub fn new(profile: DifficultyProfile) -> Self {
        Self {
            score: 0,
            current_gravity: profile.game_gravity,
            profile,
            palette_offset: PaletteDelta::ZERO,
            phase: GamePhase::Booting,
            generation: 0,
            effects: EffectLedger::default(),
        }
    }

    /// Gravity of the active profile, before bonuses
    pub fn baseline_gravity(&self) -> f32 {
        self.profile.game_gravity
    }

    /// Switch profile, keeping any active bonus deltas on top of the new baseline
    pub fn set_profile(&mut self, profile: DifficultyProfile) {
        self.current_gravity = profile.game_gravity + self.effects.gravity_sum();
        self.profile = profile;
    }

    /// Back to a clean slate under `profile`, in a new generation
    pub fn reset(&mut self, profile: DifficultyProfile) {
        self.score = 0;
        self.effects.clear();
        self.palette_offset = PaletteDelta::ZERO;
        self.current_gravity = profile.game_gravity;
        self.profile = profile;
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn is_live(&self) -> bool {
        matches!(self.phase, GamePhase::SelectingDifficulty | GamePhase::Running)
    }
}
