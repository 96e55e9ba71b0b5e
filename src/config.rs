//! Game configuration
//!
//! Every knob that differs between game variants lives here, serialized as
//! JSON. Missing keys fall back to the defaults, so a config file can override
//! just the values it cares about:
//!
//! ```json
//! { "default_mode": "normal", "selector": false, "bonus_selection": "fixed_slots" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};
use crate::sim::modes::{DEFAULT_MODE, DifficultyProfile, ModeTable};
use crate::sim::state::{BonusKind, BonusPayload};
use crate::sim::surface::PaletteDelta;

/// How the spawner picks a bonus kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BonusSelection {
    /// Roll `bonus_rate` for a bonus, then flip a coin for its kind
    #[default]
    CoinFlip,
    /// Top roll gives balloons, the one below it a weight
    FixedSlots,
}

/// Which profile a restarted session starts with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RestartProfile {
    /// Always `default_mode`
    #[default]
    GlobalDefault,
    /// Whatever was active when the player crashed
    LastChosen,
}

/// Player tilt from vertical velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// `atan(vy / speed)` radians
    #[default]
    Atan,
    /// `vy / speed` used directly as radians
    Ratio,
}

impl RotationMode {
    pub fn rotation(self, vertical_velocity: f32, game_speed: f32) -> f32 {
        let ratio = vertical_velocity / game_speed;
        match self {
            RotationMode::Atan => ratio.atan(),
            RotationMode::Ratio => ratio,
        }
    }
}

/// Screen dimension the player's y position is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundsAxis {
    #[default]
    Height,
    /// Compares y against the screen width
    Width,
}

/// Payload for each bonus kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusTable {
    pub lighten: BonusPayload,
    pub heavy: BonusPayload,
}

impl Default for BonusTable {
    fn default() -> Self {
        Self {
            lighten: BonusPayload {
                gravity_delta: -BONUS_GRAVITY_DELTA,
                palette_delta: PaletteDelta::new(-40, -50, -50),
                duration: Some(BONUS_DURATION),
            },
            heavy: BonusPayload {
                gravity_delta: BONUS_GRAVITY_DELTA,
                palette_delta: PaletteDelta::new(40, 50, 50),
                duration: Some(BONUS_DURATION),
            },
        }
    }
}

impl BonusTable {
    /// Gravity-only bonuses that last until an opposite bonus is collected
    pub fn unbounded() -> Self {
        Self {
            lighten: BonusPayload {
                gravity_delta: -BONUS_GRAVITY_DELTA,
                palette_delta: PaletteDelta::ZERO,
                duration: None,
            },
            heavy: BonusPayload {
                gravity_delta: BONUS_GRAVITY_DELTA,
                palette_delta: PaletteDelta::ZERO,
                duration: None,
            },
        }
    }

    pub fn payload(&self, kind: BonusKind) -> BonusPayload {
        match kind {
            BonusKind::Lighten => self.lighten,
            BonusKind::Heavy => self.heavy,
        }
    }
}

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub screen_width: f32,
    pub screen_height: f32,

    // === Difficulty ===
    /// Show the easy/normal markers before the first pipe
    pub selector: bool,
    /// Profile used before a choice and for variants without a selector
    pub default_mode: String,
    /// Extra profiles on top of the built-in table
    pub modes: Vec<DifficultyProfile>,
    pub restart_profile: RestartProfile,

    // === Bonuses ===
    pub bonus_selection: BonusSelection,
    pub bonuses: BonusTable,

    // === Player ===
    pub jump_power: f32,
    pub rotation: RotationMode,
    pub bounds_axis: BoundsAxis,

    // === Session ===
    /// Start a new session on the tick after a crash
    pub auto_restart: bool,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            selector: true,
            default_mode: DEFAULT_MODE.to_string(),
            modes: Vec::new(),
            restart_profile: RestartProfile::GlobalDefault,

            bonus_selection: BonusSelection::CoinFlip,
            bonuses: BonusTable::default(),

            jump_power: JUMP_POWER,
            rotation: RotationMode::Atan,
            bounds_axis: BoundsAxis::Height,

            auto_restart: true,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Single-mode variant: no selector, balloons and weights in fixed roll
    /// slots, gravity changes until cancelled by the opposite bonus
    pub fn classic() -> Self {
        Self {
            selector: false,
            default_mode: "normal".to_string(),
            restart_profile: RestartProfile::GlobalDefault,
            bonus_selection: BonusSelection::FixedSlots,
            bonuses: BonusTable::unbounded(),
            bounds_axis: BoundsAxis::Width,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> GameResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> GameResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON config file
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Lower edge the player may not pass
    pub fn bounds_limit(&self) -> f32 {
        match self.bounds_axis {
            BoundsAxis::Height => self.screen_height,
            BoundsAxis::Width => self.screen_width,
        }
    }

    /// Check every value and build the mode table
    pub fn validate(&self) -> GameResult<ModeTable> {
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(GameError::InvalidConfig {
                reason: format!(
                    "screen size {}x{} must be positive",
                    self.screen_width, self.screen_height
                ),
            });
        }
        if !(self.jump_power.is_finite() && self.jump_power > 0.0) {
            return Err(GameError::InvalidConfig {
                reason: format!("jump_power {} must be positive", self.jump_power),
            });
        }
        for (kind, payload) in [
            (BonusKind::Lighten, self.bonuses.lighten),
            (BonusKind::Heavy, self.bonuses.heavy),
        ] {
            if let Some(duration) = payload.duration {
                if !(duration.is_finite() && duration > 0.0) {
                    return Err(GameError::InvalidConfig {
                        reason: format!("{:?} bonus duration {} must be positive", kind, duration),
                    });
                }
            }
        }

        let mut table = ModeTable::builtin();
        for profile in &self.modes {
            table.extend(profile.clone())?;
        }
        table.lookup(&self.default_mode)?;

        let max_gap = self.screen_height - 2.0 * GAP_MARGIN;
        for profile in table.profiles() {
            if profile.pipe_gap > max_gap {
                return Err(GameError::InvalidConfig {
                    reason: format!(
                        "mode '{}' pipe_gap {} does not fit a {}px screen (max {})",
                        profile.name, profile.pipe_gap, self.screen_height, max_gap
                    ),
                });
            }
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_validates() {
        let table = GameConfig::default().validate().unwrap();
        assert!(table.contains("easy"));
        assert!(table.contains("normal"));
    }

    #[test]
    fn test_classic_validates() {
        let config = GameConfig::classic();
        config.validate().unwrap();
        assert!(!config.selector);
        assert_eq!(config.bounds_limit(), SCREEN_WIDTH);
        assert!(config.bonuses.heavy.duration.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "default_mode": "normal", "selector": false }"#).unwrap();
        assert_eq!(config.default_mode, "normal");
        assert!(!config.selector);
        assert_eq!(config.screen_height, SCREEN_HEIGHT);
        assert_eq!(config.bonus_selection, BonusSelection::CoinFlip);
    }

    #[test]
    fn test_enums_are_snake_case() {
        let config = GameConfig::from_json(
            r#"{ "bonus_selection": "fixed_slots", "restart_profile": "last_chosen",
                 "rotation": "ratio", "bounds_axis": "width" }"#,
        )
        .unwrap();
        assert_eq!(config.bonus_selection, BonusSelection::FixedSlots);
        assert_eq!(config.restart_profile, RestartProfile::LastChosen);
        assert_eq!(config.rotation, RotationMode::Ratio);
        assert_eq!(config.bounds_axis, BoundsAxis::Width);
    }

    #[test]
    fn test_json_roundtrip_keeps_unbounded_duration() {
        let json = GameConfig::classic().to_json().unwrap();
        let back = GameConfig::from_json(&json).unwrap();
        assert_eq!(back.bonuses, BonusTable::unbounded());
    }

    #[test]
    fn test_unknown_default_mode_is_fatal() {
        let config = GameConfig {
            default_mode: "nightmare".to_string(),
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::UnknownMode { name }) if name == "nightmare"
        ));
    }

    #[test]
    fn test_extra_mode_is_registered() {
        let config = GameConfig::from_json(
            r#"{ "default_mode": "hard", "modes": [
                { "name": "hard", "pipe_interval": 1.2, "game_speed": 260.0,
                  "game_gravity": 240.0, "bonus_rate": 15, "pipe_gap": 90.0 } ] }"#,
        )
        .unwrap();
        let table = config.validate().unwrap();
        assert_eq!(table.lookup("hard").unwrap().bonus_rate, 15);
    }

    #[test]
    fn test_gap_must_fit_screen() {
        let config = GameConfig {
            screen_height: 200.0,
            ..GameConfig::default()
        };
        // easy has a 150px gap, only 100px fit between the margins
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_rotation_modes() {
        assert!((RotationMode::Atan.rotation(200.0, 200.0) - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        assert_eq!(RotationMode::Ratio.rotation(200.0, 200.0), 1.0);
        // The two only agree near level flight
        assert!((RotationMode::Atan.rotation(1.0, 200.0) - RotationMode::Ratio.rotation(1.0, 200.0)).abs() < 1e-6);
        assert!(RotationMode::Ratio.rotation(-600.0, 200.0) < -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = GameConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, GameError::Io { .. }));
    }
}
