//! Difficulty selection by flying into a marker
//!
//! Two markers drift across the screen before the first pipe. Whichever one
//! the player touches first decides the mode; easy is tested before normal so
//! a tick touching both still yields a single choice.

use glam::Vec2;

use super::surface::{EntityHandle, PhysicsSurface, Scene, spawn_moving};
use crate::assets;
use crate::consts::CULL_MARGIN;

/// Marker order is also the tie-break order
const MARKERS: [(&str, &str); 2] = [("easy", assets::EASY_MARKER), ("normal", assets::NORMAL_MARKER)];

/// Selector state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectorState {
    #[default]
    Idle,
    WaitingForChoice { markers: [EntityHandle; 2] },
    Chosen { mode: String },
}

#[derive(Debug, Clone, Default)]
pub struct DifficultySelector {
    state: SelectorState,
    /// Leftward speed the markers were given
    speed: f32,
}

impl DifficultySelector {
    pub fn state(&self) -> &SelectorState {
        &self.state
    }

    pub fn markers(&self) -> Option<[EntityHandle; 2]> {
        match self.state {
            SelectorState::WaitingForChoice { markers } => Some(markers),
            _ => None,
        }
    }

    /// Start positions: easy a quarter down the screen, normal three quarters
    pub fn marker_positions(screen: Vec2) -> [Vec2; 2] {
        [
            Vec2::new(screen.x / 2.0, screen.y / 4.0),
            Vec2::new(screen.x / 2.0, 3.0 * screen.y / 4.0),
        ]
    }

    /// Spawn both markers moving left at `speed`
    pub fn arm<S: Scene + ?Sized>(&mut self, scene: &mut S, speed: f32, screen: Vec2) {
        self.clear(scene);
        self.speed = speed;
        let positions = Self::marker_positions(screen);
        let vel = Vec2::new(-speed, 0.0);
        let markers = [
            spawn_moving(scene, positions[0], MARKERS[0].1, vel),
            spawn_moving(scene, positions[1], MARKERS[1].1, vel),
        ];
        self.state = SelectorState::WaitingForChoice { markers };
    }

    /// Test the player against the markers
    ///
    /// On the first overlap both markers are destroyed and the chosen mode
    /// name is returned. Markers that scrolled off screen are put back at
    /// their start positions.
    pub fn resolve<S: Scene + ?Sized>(&mut self, scene: &mut S, player: EntityHandle, screen: Vec2) -> Option<String> {
        let markers = self.markers()?;

        let hit = markers
            .iter()
            .zip(MARKERS)
            .find(|(handle, _)| scene.overlap(player, **handle))
            .map(|(_, (mode, _))| mode.to_string());

        if let Some(mode) = hit {
            for handle in markers {
                scene.destroy(handle);
            }
            log::info!("Difficulty chosen: {}", mode);
            self.state = SelectorState::Chosen { mode: mode.clone() };
            return Some(mode);
        }

        let missed = markers
            .iter()
            .all(|h| scene.position(*h).is_none_or(|p| p.x < -CULL_MARGIN));
        if missed {
            log::debug!("Difficulty markers missed, sending them round again");
            let speed = self.speed;
            self.arm(scene, speed, screen);
        }
        None
    }

    /// Destroy any markers still on screen and go back to idle
    pub fn clear<P: PhysicsSurface + ?Sized>(&mut self, physics: &mut P) {
        if let Some(markers) = self.markers() {
            for handle in markers {
                physics.destroy(handle);
            }
        }
        self.state = SelectorState::Idle;
    }
}
