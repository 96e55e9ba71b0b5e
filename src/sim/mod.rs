//! Deterministic simulation module
//!
//! All gameplay rules live here. Drawing and motion are delegated to the host
//! through [`Scene`], so the rules stay deterministic:
//! - Game clock advanced in fixed steps only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod arcade;
pub mod collision;
pub mod effects;
pub mod modes;
pub mod rng;
pub mod score;
pub mod selector;
pub mod session;
pub mod spawn;
pub mod state;
pub mod surface;
pub mod tick;
pub mod timer;

pub use arcade::ArcadeWorld;
pub use effects::{ActiveEffect, EffectLedger, PickupOutcome, apply_bonus, revert_bonus};
pub use modes::{DEFAULT_MODE, DifficultyProfile, ModeTable};
pub use rng::{PcgRandom, RandomSource};
pub use selector::{DifficultySelector, SelectorState};
pub use session::Game;
pub use spawn::{SpawnDecision, SpawnScheduler};
pub use state::{
    Block, BlockKind, Bonus, BonusKind, BonusPayload, GameEvent, GameOverCause, GamePhase, Obstacle, Session,
};
pub use surface::{EntityHandle, PaletteDelta, PhysicsSurface, RenderSurface, Rgb, Scene, TextHandle, TextStyle};
pub use tick::{TickInput, tick};
pub use timer::{TimerEvent, TimerHandle, TimerQueue};
