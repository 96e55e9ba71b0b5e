//! Session controller
//!
//! [`Game`] owns the session, the host scene, the RNG and every spawned
//! entity. It boots the scene, reacts to timers and collisions, and tears
//! everything down on game over so the next session starts clean.

use glam::Vec2;

use super::effects::{self, PickupOutcome};
use super::modes::{DifficultyProfile, ModeTable};
use super::rng::RandomSource;
use super::score::ScoreTracker;
use super::selector::DifficultySelector;
use super::spawn::{self, SpawnDecision, SpawnScheduler};
use super::state::{Bonus, GameEvent, GameOverCause, GamePhase, Obstacle, Session};
use super::surface::{EntityHandle, Rgb, Scene, TextHandle, TextStyle};
use super::timer::{FiredTimer, TimerEvent, TimerQueue};
use crate::assets;
use crate::config::{GameConfig, RestartProfile};
use crate::consts::*;
use crate::error::GameResult;

/// A running game instance
pub struct Game<S: Scene, R: RandomSource> {
    pub(crate) config: GameConfig,
    pub(crate) modes: ModeTable,
    pub(crate) session: Session,
    pub(crate) scene: S,
    pub(crate) rng: R,
    pub(crate) timers: TimerQueue,
    pub(crate) selector: DifficultySelector,
    pub(crate) spawner: SpawnScheduler,
    pub(crate) score: ScoreTracker,
    pub(crate) player: Option<EntityHandle>,
    welcome: Option<TextHandle>,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) bonuses: Vec<Bonus>,
    events: Vec<GameEvent>,
}

impl<S: Scene, R: RandomSource> Game<S, R> {
    /// Validate the configuration and prepare a session in `Booting`
    ///
    /// Fails with `UnknownMode` if the default mode is not in the table.
    pub fn new(config: GameConfig, scene: S, rng: R) -> GameResult<Self> {
        let modes = config.validate()?;
        let profile = modes.lookup(&config.default_mode)?.clone();
        Ok(Self {
            config,
            modes,
            session: Session::new(profile),
            scene,
            rng,
            timers: TimerQueue::new(),
            selector: DifficultySelector::default(),
            spawner: SpawnScheduler::default(),
            score: ScoreTracker::default(),
            player: None,
            welcome: None,
            obstacles: Vec::new(),
            bonuses: Vec::new(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn modes(&self) -> &ModeTable {
        &self.modes
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn player(&self) -> Option<EntityHandle> {
        self.player
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    pub fn selector(&self) -> &DifficultySelector {
        &self.selector
    }

    /// Game-clock time in seconds
    pub fn clock(&self) -> f64 {
        self.timers.now()
    }

    /// Take the events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn screen(&self) -> Vec2 {
        Vec2::new(self.config.screen_width, self.config.screen_height)
    }

    /// Load assets and build the first scene
    pub fn start(&mut self) {
        if self.session.phase != GamePhase::Booting {
            return;
        }
        for (alias, path) in assets::IMAGES {
            self.scene.load_image(alias, path);
        }
        for (alias, path) in assets::SOUNDS {
            self.scene.load_audio(alias, path);
        }
        log::info!(
            "Booting ({} modes, default '{}')",
            self.modes.profiles().len(),
            self.config.default_mode
        );
        self.build_scene();
    }

    /// Create background, labels and player, then either show the
    /// difficulty markers or start spawning
    fn build_scene(&mut self) {
        self.sync_background();
        if self.config.selector {
            self.welcome = Some(self.scene.create_text(
                Vec2::new(WELCOME_POS.0, WELCOME_POS.1),
                WELCOME_TEXT,
                &TextStyle::default(),
            ));
        }
        self.score.attach(&mut self.scene, &self.session);

        let player = self
            .scene
            .create_sprite(Vec2::new(PLAYER_START_X, PLAYER_START_Y), assets::PLAYER);
        self.scene.enable_physics(player);
        self.player = Some(player);
        self.sync_gravity();

        let screen = self.screen();
        if self.config.selector {
            let speed = self.default_profile().game_speed;
            self.selector.arm(&mut self.scene, speed, screen);
            self.session.phase = GamePhase::SelectingDifficulty;
        } else {
            self.spawner
                .arm(&mut self.timers, &self.session.profile, self.session.generation);
            self.session.phase = GamePhase::Running;
        }
        log::info!(
            "Session {} started in {:?} ({} mode)",
            self.session.generation,
            self.session.phase,
            self.session.profile.name
        );
    }

    /// Switch to a named profile
    ///
    /// In a live session this also re-arms the spawner with the new interval
    /// and ends difficulty selection.
    pub fn set_mode(&mut self, name: &str) -> GameResult<()> {
        let profile = self.modes.lookup(name)?.clone();
        self.session.set_profile(profile);
        self.sync_gravity();

        if self.session.is_live() {
            if self.selector.markers().is_some() {
                self.selector.clear(&mut self.scene);
            }
            self.spawner
                .arm(&mut self.timers, &self.session.profile, self.session.generation);
            self.session.phase = GamePhase::Running;
        }
        self.events.push(GameEvent::ModeChosen {
            name: name.to_string(),
        });
        log::info!("Mode set to '{}'", name);
        Ok(())
    }

    /// Jump input: set the player's vertical velocity upward
    pub fn jump(&mut self) {
        if !self.session.is_live() {
            return;
        }
        if let Some(player) = self.player {
            let vx = self.scene.velocity(player).map_or(0.0, |v| v.x);
            self.scene
                .set_velocity(player, Vec2::new(vx, -self.config.jump_power));
        }
    }

    /// End the session: destroy everything and reset the counters
    pub(crate) fn game_over(&mut self, cause: GameOverCause) {
        let final_score = self.session.score;
        log::info!("Game over ({:?}) with score {}", cause, final_score);
        self.teardown();
        self.reset_session();
        self.session.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver {
            cause,
            score: final_score,
        });
    }

    /// Start a fresh session
    ///
    /// Called automatically on the tick after a game over when `auto_restart`
    /// is set; calling it mid-session abandons the current one.
    pub fn restart(&mut self) {
        match self.session.phase {
            GamePhase::Terminal => return,
            GamePhase::Booting => {
                self.start();
                return;
            }
            GamePhase::GameOver => {}
            GamePhase::SelectingDifficulty | GamePhase::Running => {
                self.teardown();
                self.reset_session();
            }
        }
        self.events.push(GameEvent::Restarted {
            generation: self.session.generation,
        });
        self.build_scene();
    }

    /// Shut down for good
    pub fn quit(&mut self) {
        self.teardown();
        self.session.phase = GamePhase::Terminal;
        log::info!("Game terminated");
    }

    /// The configured default mode, or the current profile if it went missing
    fn default_profile(&self) -> DifficultyProfile {
        self.modes
            .lookup(&self.config.default_mode)
            .map_or_else(|_| self.session.profile.clone(), Clone::clone)
    }

    /// Pick the next session's profile and reset to it
    ///
    /// With the selector on, every session starts on the default mode until a
    /// marker is chosen; `LastChosen` only applies without a selector.
    fn reset_session(&mut self) {
        let profile = match self.config.restart_profile {
            RestartProfile::LastChosen if !self.config.selector => self.session.profile.clone(),
            _ => self.default_profile(),
        };
        self.session.reset(profile);
    }

    /// Destroy every entity and label, cancel every timer
    fn teardown(&mut self) {
        self.timers.cancel_all();
        self.spawner.disarm(&mut self.timers);
        self.selector.clear(&mut self.scene);
        for obstacle in self.obstacles.drain(..) {
            for block in obstacle.blocks {
                self.scene.destroy(block.handle);
            }
        }
        for bonus in self.bonuses.drain(..) {
            self.scene.destroy(bonus.handle);
        }
        if let Some(player) = self.player.take() {
            self.scene.destroy(player);
        }
        self.score.detach(&mut self.scene);
        if let Some(welcome) = self.welcome.take() {
            self.scene.destroy_text(welcome);
        }
    }

    fn sync_gravity(&mut self) {
        if let Some(player) = self.player {
            self.scene.set_gravity(player, self.session.current_gravity);
        }
    }

    fn sync_background(&mut self) {
        let (r, g, b) = BASE_BACKGROUND;
        let color = Rgb::new(r, g, b).offset(self.session.palette_offset);
        self.scene.set_background_color(&color.to_hex());
    }

    /// Handle a timer that came due
    ///
    /// Timers scheduled under an earlier session generation are dropped.
    pub(crate) fn dispatch_timer(&mut self, fired: FiredTimer) {
        if fired.generation != self.session.generation || !self.session.is_live() {
            log::trace!(
                "Ignoring stale {:?} from generation {} (now {})",
                fired.event,
                fired.generation,
                self.session.generation
            );
            return;
        }
        match fired.event {
            TimerEvent::Spawn => {
                if self.spawner.owns(fired.handle) {
                    self.on_spawn();
                } else {
                    log::trace!("Ignoring fire from a replaced spawn timer");
                }
            }
            TimerEvent::RevertBonus { effect_id } => {
                if let Some(kind) = effects::revert_bonus(&mut self.session, effect_id) {
                    self.sync_gravity();
                    self.sync_background();
                    self.events.push(GameEvent::BonusExpired { kind });
                }
            }
        }
    }

    /// One spawner fire: a bonus or a scored pipe column
    fn on_spawn(&mut self) {
        let screen = self.screen();
        let decision = spawn::decide(
            &mut self.rng,
            self.session.profile.bonus_rate,
            self.config.bonus_selection,
        );
        match decision {
            SpawnDecision::Obstacle => {
                let obstacle = self
                    .spawner
                    .spawn_obstacle(&mut self.scene, &mut self.rng, &self.session.profile, screen);
                let gap_start = obstacle.gap_start;
                self.obstacles.push(obstacle);
                let score = self.score.increment(&mut self.scene, &mut self.session);
                log::debug!("Pipe spawned with gap at {}, score {}", gap_start, score);
                self.events.push(GameEvent::ObstacleSpawned { score, gap_start });
            }
            SpawnDecision::Bonus(kind) => {
                let bonus = self
                    .spawner
                    .spawn_bonus(&mut self.scene, &mut self.rng, kind, &self.session.profile, screen);
                self.bonuses.push(bonus);
                log::debug!("{:?} bonus spawned", kind);
                self.events.push(GameEvent::BonusSpawned { kind });
            }
        }
    }

    /// Apply a bonus the player just touched
    pub(crate) fn collect(&mut self, bonus: Bonus) {
        let payload = self.config.bonuses.payload(bonus.kind);
        let outcome = effects::apply_bonus(&mut self.session, &mut self.timers, bonus.kind, payload);
        if let PickupOutcome::Cancelled { cancelled } = outcome {
            log::debug!("{:?} cancelled an active {:?}", bonus.kind, cancelled);
        }
        self.sync_gravity();
        self.sync_background();
        self.events.push(GameEvent::BonusCollected { kind: bonus.kind });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::sim::arcade::ArcadeWorld;
    use crate::sim::rng::{PcgRandom, ScriptedRandom};
    use crate::sim::state::BonusKind;
    use crate::sim::surface::PhysicsSurface;

    fn selector_game() -> Game<ArcadeWorld, PcgRandom> {
        let mut game = Game::new(GameConfig::default(), ArcadeWorld::new(), PcgRandom::new(1)).unwrap();
        game.start();
        game
    }

    fn direct_game(mode: &str, rng: ScriptedRandom) -> Game<ArcadeWorld, ScriptedRandom> {
        let config = GameConfig {
            selector: false,
            default_mode: mode.to_string(),
            ..GameConfig::default()
        };
        let mut game = Game::new(config, ArcadeWorld::new(), rng).unwrap();
        game.start();
        game
    }

    #[test]
    fn test_unknown_default_mode_aborts() {
        let config = GameConfig {
            default_mode: "insane".to_string(),
            ..GameConfig::default()
        };
        let result = Game::new(config, ArcadeWorld::new(), PcgRandom::new(0));
        assert!(matches!(result, Err(GameError::UnknownMode { .. })));
    }

    #[test]
    fn test_boot_with_selector() {
        let game = selector_game();
        let world = game.scene();

        assert_eq!(game.phase(), GamePhase::SelectingDifficulty);
        assert!(world.is_image_loaded(assets::PIPE_END));
        assert!(world.is_audio_loaded(assets::SCORE_SOUND));
        assert_eq!(world.background(), "#6eb3e5");
        assert_eq!(world.count_alias(assets::EASY_MARKER), 1);
        assert_eq!(world.count_alias(assets::NORMAL_MARKER), 1);
        assert!(world.labels().any(|l| l.text == WELCOME_TEXT));
        assert!(world.labels().any(|l| l.text == "0"));
        assert!(!game.spawner.is_armed());

        let player = game.player().unwrap();
        assert_eq!(world.sprite(player).unwrap().gravity, 220.0);
    }

    #[test]
    fn test_boot_without_selector() {
        let game = direct_game("normal", ScriptedRandom::default());
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.spawner.is_armed());
        assert_eq!(game.scene().count_alias(assets::EASY_MARKER), 0);
        assert!(!game.scene().labels().any(|l| l.text == WELCOME_TEXT));
    }

    #[test]
    fn test_set_mode_rearms_spawner() {
        let mut game = selector_game();
        game.set_mode("normal").unwrap();

        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.scene().count_alias(assets::EASY_MARKER), 0);
        let player = game.player().unwrap();
        assert_eq!(game.scene().sprite(player).unwrap().gravity, 200.0);
        assert_eq!(game.timers.len(), 1);
        assert!(game.timers.pop_due(1.74).is_none());
        assert!(game.timers.pop_due(1.75).is_some());
    }

    #[test]
    fn test_set_unknown_mode_fails_without_change() {
        let mut game = selector_game();
        assert!(matches!(
            game.set_mode("hard"),
            Err(GameError::UnknownMode { .. })
        ));
        assert_eq!(game.phase(), GamePhase::SelectingDifficulty);
        assert_eq!(game.session().profile.name, "easy");
    }

    #[test]
    fn test_ten_fires_one_bonus() {
        // Rolls 1..=9 give pipes (each followed by a gap draw), roll 10 a bonus
        let mut script = Vec::new();
        for roll in 1..=10 {
            script.push(roll);
            if roll < 10 {
                script.push(120);
            } else {
                script.push(0);
            }
        }
        let mut game = direct_game("normal", ScriptedRandom::new(script));

        for _ in 0..10 {
            game.advance_timers(1.75);
        }
        assert_eq!(game.bonuses().len(), 1);
        assert_eq!(game.bonuses()[0].kind, BonusKind::Lighten);
        assert_eq!(game.obstacles().len(), 9);
        assert_eq!(game.score(), 9);

        let label = game.score.label().unwrap();
        assert_eq!(game.scene().label(label).unwrap().text, "9");
    }

    #[test]
    fn test_bonus_spawn_does_not_score() {
        let mut game = direct_game("easy", ScriptedRandom::new([4, 1, 4, 0]));
        game.advance_timers(6.0);
        assert_eq!(game.bonuses().len(), 2);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_jump() {
        let mut game = direct_game("normal", ScriptedRandom::default());
        game.jump();
        let player = game.player().unwrap();
        assert_eq!(game.scene().velocity(player), Some(Vec2::new(0.0, -200.0)));
    }

    #[test]
    fn test_game_over_clears_everything() {
        let mut game = direct_game("normal", ScriptedRandom::new([1, 100, 10, 1]));
        game.advance_timers(3.5);
        assert_eq!(game.score(), 1);
        assert_eq!(game.bonuses().len(), 1);

        game.game_over(GameOverCause::HitPipe);
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.score(), 0);
        assert_eq!(game.scene().sprite_count(), 0);
        assert_eq!(game.scene().labels().count(), 0);
        assert!(game.timers.is_empty());
        assert!(game.obstacles().is_empty());
        assert!(game.bonuses().is_empty());
        assert_eq!(game.session().generation, 1);
    }

    #[test]
    fn test_restart_profile_global_default() {
        let mut game = selector_game();
        game.set_mode("normal").unwrap();
        game.game_over(GameOverCause::OutOfBounds);
        assert_eq!(game.session().profile.name, "easy");
        assert_eq!(game.session().current_gravity, 220.0);

        game.restart();
        assert_eq!(game.phase(), GamePhase::SelectingDifficulty);
        assert_eq!(game.scene().count_alias(assets::NORMAL_MARKER), 1);
    }

    #[test]
    fn test_restart_profile_last_chosen() {
        let config = GameConfig {
            selector: false,
            restart_profile: RestartProfile::LastChosen,
            ..GameConfig::default()
        };
        let mut game = Game::new(config, ArcadeWorld::new(), PcgRandom::new(5)).unwrap();
        game.start();
        game.set_mode("normal").unwrap();
        game.game_over(GameOverCause::OutOfBounds);
        assert_eq!(game.session().profile.name, "normal");
        assert_eq!(game.session().current_gravity, 200.0);

        game.restart();
        let player = game.player().unwrap();
        assert_eq!(game.scene().sprite(player).unwrap().gravity, 200.0);
    }

    #[test]
    fn test_markers_after_restart_use_default_mode() {
        let config = GameConfig {
            restart_profile: RestartProfile::LastChosen,
            ..GameConfig::default()
        };
        let mut game = Game::new(config, ArcadeWorld::new(), PcgRandom::new(5)).unwrap();
        game.start();
        let [easy, _] = game.selector().markers().unwrap();
        assert_eq!(game.scene().velocity(easy), Some(Vec2::new(-180.0, 0.0)));

        game.set_mode("normal").unwrap();
        game.game_over(GameOverCause::OutOfBounds);
        game.restart();

        assert_eq!(game.phase(), GamePhase::SelectingDifficulty);
        let [easy, normal] = game.selector().markers().unwrap();
        assert_eq!(game.scene().velocity(easy), Some(Vec2::new(-180.0, 0.0)));
        assert_eq!(game.scene().velocity(normal), Some(Vec2::new(-180.0, 0.0)));
        assert_eq!(game.session().profile.name, "easy");
        let player = game.player().unwrap();
        assert_eq!(game.scene().sprite(player).unwrap().gravity, 220.0);
    }

    #[test]
    fn test_manual_restart_mid_session() {
        let mut game = direct_game("normal", ScriptedRandom::new([1, 100]));
        game.advance_timers(1.75);
        assert_eq!(game.score(), 1);

        game.restart();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 0);
        assert!(game.obstacles().is_empty());
        assert_eq!(game.scene().count_alias(assets::PLAYER), 1);
        assert_eq!(game.scene().count_alias(assets::PIPE), 0);
        assert!(
            game.drain_events()
                .contains(&GameEvent::Restarted { generation: 1 })
        );
    }

    #[test]
    fn test_stale_revert_is_ignored() {
        let mut game = direct_game("normal", ScriptedRandom::default());
        game.collect(Bonus {
            id: 0,
            handle: EntityHandle(9999),
            kind: BonusKind::Lighten,
        });
        assert_eq!(game.session().current_gravity, 150.0);

        game.game_over(GameOverCause::HitPipe);
        game.restart();
        assert_eq!(game.session().current_gravity, 200.0);

        game.collect(Bonus {
            id: 1,
            handle: EntityHandle(9998),
            kind: BonusKind::Lighten,
        });
        let effect_id = game.session().effects.active()[0].id;

        // A reversal left over from generation 0 must not touch the new session
        let mut scratch = TimerQueue::new();
        let handle = scratch.schedule_once(0.0, TimerEvent::RevertBonus { effect_id }, 0);
        game.dispatch_timer(FiredTimer {
            handle,
            event: TimerEvent::RevertBonus { effect_id },
            generation: 0,
            at: 0.0,
        });
        assert_eq!(game.session().current_gravity, 150.0);
        assert_eq!(game.session().effects.active().len(), 1);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut game = selector_game();
        game.quit();
        assert_eq!(game.phase(), GamePhase::Terminal);
        game.restart();
        assert_eq!(game.phase(), GamePhase::Terminal);
        assert_eq!(game.scene().sprite_count(), 0);
    }
}
