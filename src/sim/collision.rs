//! Per-tick collision rules
//!
//! Checks run in a fixed order: pipes, then bonuses, then the screen bounds.
//! Collected bonuses are swept out of the live list in the same pass that
//! finds them, so a bonus can never be picked up twice.

use super::state::{Bonus, GameOverCause, Obstacle};
use super::surface::{EntityHandle, PhysicsSurface};

/// Outcome of one tick's collision pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    pub game_over: Option<GameOverCause>,
    /// Bonuses touched this tick, already destroyed
    pub collected: Vec<Bonus>,
}

/// Whether the player touches any block of any pipe column
pub fn hits_obstacle<P: PhysicsSurface + ?Sized>(physics: &P, player: EntityHandle, obstacles: &[Obstacle]) -> bool {
    obstacles
        .iter()
        .flat_map(|o| o.blocks.iter())
        .any(|b| physics.overlap(player, b.handle))
}

/// Whether the player's top edge is above 0 or below `limit`
pub fn out_of_bounds<P: PhysicsSurface + ?Sized>(physics: &P, player: EntityHandle, limit: f32) -> bool {
    physics
        .position(player)
        .is_some_and(|pos| pos.y < 0.0 || pos.y > limit)
}

/// Remove and destroy every bonus the player touches
pub fn collect_bonuses<P: PhysicsSurface + ?Sized>(
    physics: &mut P,
    player: EntityHandle,
    bonuses: &mut Vec<Bonus>,
) -> Vec<Bonus> {
    let mut collected = Vec::new();
    bonuses.retain(|bonus| {
        if physics.overlap(player, bonus.handle) {
            physics.destroy(bonus.handle);
            collected.push(*bonus);
            false
        } else {
            true
        }
    });
    collected
}

/// Run the full collision pass
///
/// A pipe hit ends the pass immediately; bonuses touched on a crashing tick
/// are left alone since the session is about to be torn down.
pub fn resolve<P: PhysicsSurface + ?Sized>(
    physics: &mut P,
    player: EntityHandle,
    obstacles: &[Obstacle],
    bonuses: &mut Vec<Bonus>,
    bounds_limit: f32,
) -> Resolution {
    if hits_obstacle(physics, player, obstacles) {
        return Resolution {
            game_over: Some(GameOverCause::HitPipe),
            collected: Vec::new(),
        };
    }

    let collected = collect_bonuses(physics, player, bonuses);

    let game_over = out_of_bounds(physics, player, bounds_limit).then_some(GameOverCause::OutOfBounds);
    Resolution { game_over, collected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets;
    use crate::consts::*;
    use crate::sim::arcade::ArcadeWorld;
    use crate::sim::modes::DifficultyProfile;
    use crate::sim::rng::ScriptedRandom;
    use crate::sim::spawn::SpawnScheduler;
    use crate::sim::state::BonusKind;
    use crate::sim::surface::{RenderSurface, spawn_moving};
    use glam::Vec2;

    const SCREEN: Vec2 = Vec2::new(SCREEN_WIDTH, SCREEN_HEIGHT);

    fn world_with_player() -> (ArcadeWorld, EntityHandle) {
        let mut world = ArcadeWorld::new();
        let player = world.create_sprite(Vec2::new(PLAYER_START_X, PLAYER_START_Y), assets::PLAYER);
        world.enable_physics(player);
        (world, player)
    }

    fn bonus_at(world: &mut ArcadeWorld, id: u32, pos: Vec2) -> Bonus {
        Bonus {
            id,
            handle: spawn_moving(world, pos, assets::BALLOONS, Vec2::ZERO),
            kind: BonusKind::Lighten,
        }
    }

    #[test]
    fn test_pipe_hit_is_game_over() {
        let (mut world, player) = world_with_player();
        let mut spawner = SpawnScheduler::default();
        let mut rng = ScriptedRandom::new([50]);
        let obstacle = spawner.spawn_obstacle(&mut world, &mut rng, &DifficultyProfile::normal(), SCREEN);

        let mut bonuses = Vec::new();
        let clear = resolve(&mut world, player, std::slice::from_ref(&obstacle), &mut bonuses, SCREEN_HEIGHT);
        assert_eq!(clear.game_over, None);

        // Slide the bottom cap onto the player
        let cap = obstacle.blocks.iter().rev().find(|b| b.kind == crate::sim::state::BlockKind::End).unwrap();
        world.teleport(cap.handle, Vec2::new(70.0, 210.0));
        let hit = resolve(&mut world, player, &[obstacle], &mut bonuses, SCREEN_HEIGHT);
        assert_eq!(hit.game_over, Some(GameOverCause::HitPipe));
    }

    #[test]
    fn test_below_screen_is_game_over() {
        let (mut world, player) = world_with_player();
        world.teleport(player, Vec2::new(PLAYER_START_X, 401.0));
        let res = resolve(&mut world, player, &[], &mut Vec::new(), SCREEN_HEIGHT);
        assert_eq!(res.game_over, Some(GameOverCause::OutOfBounds));

        world.teleport(player, Vec2::new(PLAYER_START_X, 400.0));
        let res = resolve(&mut world, player, &[], &mut Vec::new(), SCREEN_HEIGHT);
        assert_eq!(res.game_over, None);

        world.teleport(player, Vec2::new(PLAYER_START_X, -0.5));
        let res = resolve(&mut world, player, &[], &mut Vec::new(), SCREEN_HEIGHT);
        assert_eq!(res.game_over, Some(GameOverCause::OutOfBounds));
    }

    #[test]
    fn test_width_bounds_variant() {
        let (mut world, player) = world_with_player();
        world.teleport(player, Vec2::new(PLAYER_START_X, 650.0));
        assert!(!out_of_bounds(&world, player, SCREEN_WIDTH));
        assert!(out_of_bounds(&world, player, SCREEN_HEIGHT));
    }

    #[test]
    fn test_bonus_collected_once() {
        let (mut world, player) = world_with_player();
        let bonus = bonus_at(&mut world, 1, Vec2::new(90.0, 190.0));
        let mut bonuses = vec![bonus];

        let first = resolve(&mut world, player, &[], &mut bonuses, SCREEN_HEIGHT);
        assert_eq!(first.collected, vec![bonus]);
        assert!(bonuses.is_empty());
        assert_eq!(world.position(bonus.handle), None);

        let second = resolve(&mut world, player, &[], &mut bonuses, SCREEN_HEIGHT);
        assert!(second.collected.is_empty());
    }

    #[test]
    fn test_adjacent_bonuses_all_swept() {
        let (mut world, player) = world_with_player();
        let a = bonus_at(&mut world, 1, Vec2::new(70.0, 180.0));
        let b = bonus_at(&mut world, 2, Vec2::new(500.0, 100.0));
        let c = bonus_at(&mut world, 3, Vec2::new(100.0, 200.0));
        let d = bonus_at(&mut world, 4, Vec2::new(90.0, 210.0));
        let mut bonuses = vec![a, b, c, d];

        let res = resolve(&mut world, player, &[], &mut bonuses, SCREEN_HEIGHT);
        assert_eq!(res.collected, vec![a, c, d]);
        assert_eq!(bonuses, vec![b]);
    }

    #[test]
    fn test_pipe_hit_skips_bonuses() {
        let (mut world, player) = world_with_player();
        let pipe = spawn_moving(&mut world, Vec2::new(80.0, 180.0), assets::PIPE, Vec2::ZERO);
        let obstacle = Obstacle {
            id: 0,
            gap_start: 0.0,
            blocks: vec![crate::sim::state::Block {
                handle: pipe,
                kind: crate::sim::state::BlockKind::Filler,
            }],
        };
        let bonus = bonus_at(&mut world, 1, Vec2::new(90.0, 190.0));
        let mut bonuses = vec![bonus];

        let res = resolve(&mut world, player, &[obstacle], &mut bonuses, SCREEN_HEIGHT);
        assert_eq!(res.game_over, Some(GameOverCause::HitPipe));
        assert!(res.collected.is_empty());
        assert_eq!(bonuses.len(), 1);
    }
}
