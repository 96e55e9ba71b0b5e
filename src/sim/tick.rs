//! Fixed timestep simulation tick
//!
//! One tick: apply input, fire due timers, let the host integrate motion,
//! then run the per-frame rules (selection, collisions, culling, tilt).

use super::collision;
use super::rng::RandomSource;
use super::session::Game;
use super::spawn;
use super::state::{BlockKind, GamePhase};
use super::surface::Scene;
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (click/tap/space)
    pub jump: bool,
    /// Start over now, abandoning the current session
    pub restart: bool,
    /// Shut the game down
    pub quit: bool,
    /// Demo mode - the game flies itself
    pub autopilot: bool,
}

/// Advance the game by one fixed timestep
pub fn tick<S: Scene, R: RandomSource>(game: &mut Game<S, R>, input: &TickInput, dt: f32) {
    if input.quit {
        game.quit();
    }

    match game.phase() {
        GamePhase::Terminal => return,
        GamePhase::Booting => game.start(),
        GamePhase::GameOver => {
            if game.config.auto_restart || input.restart {
                game.restart();
            } else {
                return;
            }
        }
        GamePhase::SelectingDifficulty | GamePhase::Running => {
            if input.restart {
                game.restart();
            }
        }
    }

    let jump = if input.autopilot {
        game.autopilot_wants_jump()
    } else {
        input.jump
    };
    if jump {
        game.jump();
    }

    game.advance_timers(dt);
    game.scene.step(dt);
    game.update();
}

impl<S: Scene, R: RandomSource> Game<S, R> {
    /// Move the game clock forward, dispatching every timer that comes due
    pub fn advance_timers(&mut self, dt: f32) {
        let until = self.timers.now() + dt as f64;
        while let Some(fired) = self.timers.pop_due(until) {
            self.dispatch_timer(fired);
        }
        self.timers.settle(until);
    }

    /// Per-frame rules, run after the host has moved every body
    pub fn update(&mut self) {
        if !self.session.is_live() {
            return;
        }
        let Some(player) = self.player else {
            return;
        };
        let screen = self.screen();

        if self.session.phase == GamePhase::SelectingDifficulty {
            if let Some(mode) = self.selector.resolve(&mut self.scene, player, screen) {
                if let Err(err) = self.set_mode(&mode) {
                    log::error!("Could not switch to '{}': {}", mode, err);
                }
            }
        }

        let resolution = collision::resolve(
            &mut self.scene,
            player,
            &self.obstacles,
            &mut self.bonuses,
            self.config.bounds_limit(),
        );
        for bonus in resolution.collected {
            self.collect(bonus);
        }
        if let Some(cause) = resolution.game_over {
            self.game_over(cause);
            return;
        }

        let culled = spawn::cull_offscreen(&mut self.scene, &mut self.obstacles, &mut self.bonuses, screen.y);
        if culled > 0 {
            log::trace!("Culled {} off-screen entities", culled);
        }

        if let Some(vel) = self.scene.velocity(player) {
            let radians = self
                .config
                .rotation
                .rotation(vel.y, self.session.profile.game_speed);
            self.scene.set_rotation(player, radians);
        }
    }

    /// Height the autopilot tries to hold the player's top edge at
    fn autopilot_target(&self) -> f32 {
        // Aim for the easy marker while choosing
        if let Some(pos) = self
            .selector
            .markers()
            .and_then(|[easy, _]| self.scene.position(easy))
        {
            return pos.y + 10.0;
        }

        let player_x = PLAYER_START_X;
        let half_gap = self.session.profile.pipe_gap / 2.0;
        self.obstacles
            .iter()
            .filter_map(|o| {
                let cap = o.blocks.iter().find(|b| b.kind == BlockKind::End)?;
                let x = self.scene.position(cap.handle)?.x;
                (x + PIPE_END_WIDTH > player_x).then_some((x, o.gap_start + half_gap - 20.0))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or(self.config.screen_height / 2.0, |(_, y)| y)
    }

    /// Jump whenever the player is falling below its target height
    pub(crate) fn autopilot_wants_jump(&self) -> bool {
        let Some(player) = self.player else {
            return false;
        };
        match (self.scene.position(player), self.scene.velocity(player)) {
            (Some(pos), Some(vel)) => pos.y > self.autopilot_target() && vel.y > 0.0,
            _ => false,
        }
    }
}
