//! Difficulty profiles
//!
//! The built-in table holds `easy` and `normal`. Configuration may register
//! further profiles but never changes an existing one.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};

/// Name of the profile used before a choice is made and after a restart
pub const DEFAULT_MODE: &str = "easy";

/// A named set of tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub name: String,
    /// Seconds between spawner fires
    pub pipe_interval: f32,
    /// Horizontal scroll speed (px/s)
    pub game_speed: f32,
    /// Player gravity before any bonus (px/s²)
    pub game_gravity: f32,
    /// One spawner fire in `bonus_rate` (on average) yields a bonus
    pub bonus_rate: u32,
    /// Vertical size of the opening in each pipe column (px)
    pub pipe_gap: f32,
}

impl DifficultyProfile {
    pub fn easy() -> Self {
        Self {
            name: "easy".to_string(),
            pipe_interval: 3.0,
            game_speed: 180.0,
            game_gravity: 220.0,
            bonus_rate: 4,
            pipe_gap: 150.0,
        }
    }

    pub fn normal() -> Self {
        Self {
            name: "normal".to_string(),
            pipe_interval: 1.75,
            game_speed: 200.0,
            game_gravity: 200.0,
            bonus_rate: 10,
            pipe_gap: 100.0,
        }
    }

    /// Reject non-positive timing, speed, gravity and gap values
    pub fn validate(&self) -> GameResult<()> {
        let checks: [(&'static str, f32); 4] = [
            ("pipe_interval", self.pipe_interval),
            ("game_speed", self.game_speed),
            ("game_gravity", self.game_gravity),
            ("pipe_gap", self.pipe_gap),
        ];
        for (field, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(self.invalid(field, value as f64));
            }
        }
        if self.bonus_rate == 0 || i32::try_from(self.bonus_rate).is_err() {
            return Err(self.invalid("bonus_rate", self.bonus_rate as f64));
        }
        Ok(())
    }

    fn invalid(&self, field: &'static str, value: f64) -> GameError {
        GameError::InvalidProfile {
            name: self.name.clone(),
            field,
            value,
        }
    }
}

/// Registry of difficulty profiles, looked up by name
#[derive(Debug, Clone)]
pub struct ModeTable {
    profiles: Vec<DifficultyProfile>,
}

impl Default for ModeTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ModeTable {
    /// The two reference profiles
    pub fn builtin() -> Self {
        Self {
            profiles: vec![DifficultyProfile::easy(), DifficultyProfile::normal()],
        }
    }

    /// Find a profile by exact name
    pub fn lookup(&self, name: &str) -> GameResult<&DifficultyProfile> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| GameError::UnknownMode {
                name: name.to_string(),
            })
    }

    /// Register an additional profile
    pub fn extend(&mut self, profile: DifficultyProfile) -> GameResult<()> {
        profile.validate()?;
        if self.contains(&profile.name) {
            return Err(GameError::DuplicateMode { name: profile.name });
        }
        log::debug!("Registered difficulty mode '{}'", profile.name);
        self.profiles.push(profile);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.iter().any(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    pub fn profiles(&self) -> &[DifficultyProfile] {
        &self.profiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_values() {
        let table = ModeTable::builtin();

        let easy = table.lookup("easy").unwrap();
        assert_eq!(easy.pipe_interval, 3.0);
        assert_eq!(easy.game_speed, 180.0);
        assert_eq!(easy.game_gravity, 220.0);
        assert_eq!(easy.bonus_rate, 4);
        assert_eq!(easy.pipe_gap, 150.0);

        let normal = table.lookup("normal").unwrap();
        assert_eq!(normal.pipe_interval, 1.75);
        assert_eq!(normal.game_speed, 200.0);
        assert_eq!(normal.game_gravity, 200.0);
        assert_eq!(normal.bonus_rate, 10);
        assert_eq!(normal.pipe_gap, 100.0);
    }

    #[test]
    fn test_lookup_compares_names() {
        let table = ModeTable::builtin();
        // Asking for "normal" must never hand back "easy"
        assert_eq!(table.lookup("normal").unwrap().name, "normal");
        assert!(matches!(
            table.lookup("Normal"),
            Err(GameError::UnknownMode { .. })
        ));
        assert!(matches!(table.lookup(""), Err(GameError::UnknownMode { .. })));
    }

    #[test]
    fn test_extend() {
        let mut table = ModeTable::builtin();
        let hard = DifficultyProfile {
            name: "hard".to_string(),
            pipe_interval: 1.2,
            game_speed: 260.0,
            game_gravity: 240.0,
            bonus_rate: 15,
            pipe_gap: 90.0,
        };
        table.extend(hard.clone()).unwrap();
        assert_eq!(table.lookup("hard").unwrap(), &hard);
        assert_eq!(table.names().collect::<Vec<_>>(), ["easy", "normal", "hard"]);
    }

    #[test]
    fn test_extend_never_overwrites() {
        let mut table = ModeTable::builtin();
        let mut easy = DifficultyProfile::easy();
        easy.game_speed = 999.0;
        assert!(matches!(
            table.extend(easy),
            Err(GameError::DuplicateMode { .. })
        ));
        assert_eq!(table.lookup("easy").unwrap().game_speed, 180.0);
    }

    #[test]
    fn test_extend_rejects_invalid_values() {
        let mut table = ModeTable::builtin();
        let mut broken = DifficultyProfile::normal();
        broken.name = "broken".to_string();
        broken.bonus_rate = 0;
        assert!(matches!(
            table.extend(broken.clone()),
            Err(GameError::InvalidProfile {
                field: "bonus_rate",
                ..
            })
        ));

        broken.bonus_rate = 3;
        broken.pipe_interval = 0.0;
        assert!(matches!(
            table.extend(broken),
            Err(GameError::InvalidProfile {
                field: "pipe_interval",
                ..
            })
        ));
        assert!(!table.contains("broken"));
    }

    #[test]
    fn test_bonus_rate_must_fit_a_roll() {
        let mut huge = DifficultyProfile::normal();
        huge.bonus_rate = i32::MAX as u32 + 1;
        assert!(matches!(
            huge.validate(),
            Err(GameError::InvalidProfile {
                field: "bonus_rate",
                ..
            })
        ));

        huge.bonus_rate = i32::MAX as u32;
        assert!(huge.validate().is_ok());
    }
}
