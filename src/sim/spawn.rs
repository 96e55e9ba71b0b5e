//! Pipe and bonus spawning
//!
//! A repeating timer fires every `pipe_interval` seconds. Each fire rolls
//! `1..=bonus_rate`: the top roll yields a bonus, anything else a pipe column.

use glam::Vec2;

use super::modes::DifficultyProfile;
use super::rng::RandomSource;
use super::state::{Block, BlockKind, Bonus, BonusKind, Obstacle};
use super::surface::{PhysicsSurface, Scene, spawn_moving};
use super::timer::{TimerEvent, TimerHandle, TimerQueue};
use crate::config::BonusSelection;
use crate::consts::*;

/// What a spawner fire produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnDecision {
    Obstacle,
    Bonus(BonusKind),
}

/// Roll for obstacle vs bonus
pub fn decide<R: RandomSource + ?Sized>(rng: &mut R, bonus_rate: u32, selection: BonusSelection) -> SpawnDecision {
    let rate = i32::try_from(bonus_rate.max(1)).unwrap_or(i32::MAX);
    let roll = rng.uniform_int(1, rate);
    match selection {
        BonusSelection::CoinFlip => {
            if roll != rate {
                return SpawnDecision::Obstacle;
            }
            if rng.uniform_int(0, 1) == 0 {
                SpawnDecision::Bonus(BonusKind::Lighten)
            } else {
                SpawnDecision::Bonus(BonusKind::Heavy)
            }
        }
        BonusSelection::FixedSlots => {
            if roll == rate {
                SpawnDecision::Bonus(BonusKind::Lighten)
            } else if rate >= 2 && roll == rate - 1 {
                SpawnDecision::Bonus(BonusKind::Heavy)
            } else {
                SpawnDecision::Obstacle
            }
        }
    }
}

/// Where one block of a pipe column goes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockPlacement {
    pub kind: BlockKind,
    /// Top-left corner
    pub pos: Vec2,
}

impl BlockPlacement {
    pub fn height(&self) -> f32 {
        match self.kind {
            BlockKind::End => PIPE_END_HEIGHT,
            BlockKind::Filler => PIPE_BLOCK_HEIGHT,
        }
    }
}

/// Block positions for a pipe column
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleLayout {
    pub gap_start: f32,
    pub blocks: Vec<BlockPlacement>,
}

impl ObstacleLayout {
    /// Cap whose bottom edge is the top of the gap
    pub fn top_cap(&self) -> Option<&BlockPlacement> {
        self.blocks.iter().find(|b| b.kind == BlockKind::End)
    }

    /// Cap whose top edge is the bottom of the gap
    pub fn bottom_cap(&self) -> Option<&BlockPlacement> {
        self.blocks.iter().rev().find(|b| b.kind == BlockKind::End)
    }
}

/// Draw the top edge of the gap, keeping 50px clear of both screen edges
pub fn roll_gap_start<R: RandomSource + ?Sized>(rng: &mut R, pipe_gap: f32, screen_height: f32) -> f32 {
    let min = GAP_MARGIN as i32;
    let max = (screen_height - GAP_MARGIN - pipe_gap).floor() as i32;
    rng.uniform_int(min, max.max(min)) as f32
}

/// Lay out a pipe column entering from the right edge
///
/// The caps sit directly against the gap; filler blocks stack outward from
/// each cap until they pass the screen edge.
pub fn layout_obstacle(gap_start: f32, pipe_gap: f32, screen: Vec2) -> ObstacleLayout {
    let mut blocks = Vec::new();
    let cap_x = screen.x - PIPE_END_OVERHANG;

    blocks.push(BlockPlacement {
        kind: BlockKind::End,
        pos: Vec2::new(cap_x, gap_start - PIPE_END_HEIGHT),
    });
    let mut y = gap_start - PIPE_END_HEIGHT - PIPE_BLOCK_HEIGHT;
    while y > -PIPE_BLOCK_HEIGHT {
        blocks.push(BlockPlacement {
            kind: BlockKind::Filler,
            pos: Vec2::new(screen.x, y),
        });
        y -= PIPE_BLOCK_HEIGHT;
    }

    let gap_end = gap_start + pipe_gap;
    blocks.push(BlockPlacement {
        kind: BlockKind::End,
        pos: Vec2::new(cap_x, gap_end),
    });
    let mut y = gap_end + PIPE_END_HEIGHT;
    while y < screen.y {
        blocks.push(BlockPlacement {
            kind: BlockKind::Filler,
            pos: Vec2::new(screen.x, y),
        });
        y += PIPE_BLOCK_HEIGHT;
    }

    ObstacleLayout { gap_start, blocks }
}

/// Vertical drift speed of a bonus
pub fn bonus_drift<R: RandomSource + ?Sized>(rng: &mut R, game_speed: f32) -> f32 {
    game_speed / (2.0 + rng.uniform_real())
}

/// Spawn point and velocity of a bonus
///
/// Balloons start at the bottom edge and rise, weights start at the top and sink.
pub fn bonus_motion(kind: BonusKind, drift: f32, game_speed: f32, screen: Vec2) -> (Vec2, Vec2) {
    match kind {
        BonusKind::Lighten => (Vec2::new(screen.x, screen.y), Vec2::new(-game_speed, -drift)),
        BonusKind::Heavy => (Vec2::new(screen.x, 0.0), Vec2::new(-game_speed, drift)),
    }
}

/// Owns the repeating spawn timer and hands out entity ids
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    timer: Option<TimerHandle>,
    next_id: u32,
}

impl SpawnScheduler {
    /// (Re)start the repeating timer for `profile`, cancelling any previous one
    pub fn arm(&mut self, timers: &mut TimerQueue, profile: &DifficultyProfile, generation: u32) {
        self.disarm(timers);
        self.timer = Some(timers.schedule_repeating(profile.pipe_interval, TimerEvent::Spawn, generation));
        log::debug!(
            "Spawner armed: every {}s ({} mode)",
            profile.pipe_interval,
            profile.name
        );
    }

    pub fn disarm(&mut self, timers: &mut TimerQueue) {
        if let Some(timer) = self.timer.take() {
            timers.cancel(timer);
        }
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Whether a fired timer belongs to this spawner
    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.timer == Some(handle)
    }

    fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Create the blocks of a new pipe column, all moving left at `game_speed`
    pub fn spawn_obstacle<S: Scene + ?Sized, R: RandomSource + ?Sized>(
        &mut self,
        scene: &mut S,
        rng: &mut R,
        profile: &DifficultyProfile,
        screen: Vec2,
    ) -> Obstacle {
        let gap_start = roll_gap_start(rng, profile.pipe_gap, screen.y);
        let layout = layout_obstacle(gap_start, profile.pipe_gap, screen);
        let vel = Vec2::new(-profile.game_speed, 0.0);
        let blocks = layout
            .blocks
            .iter()
            .map(|b| Block {
                handle: spawn_moving(scene, b.pos, b.kind.sprite(), vel),
                kind: b.kind,
            })
            .collect();

        Obstacle {
            id: self.next_id(),
            gap_start,
            blocks,
        }
    }

    pub fn spawn_bonus<S: Scene + ?Sized, R: RandomSource + ?Sized>(
        &mut self,
        scene: &mut S,
        rng: &mut R,
        kind: BonusKind,
        profile: &DifficultyProfile,
        screen: Vec2,
    ) -> Bonus {
        let drift = bonus_drift(rng, profile.game_speed);
        let (pos, vel) = bonus_motion(kind, drift, profile.game_speed, screen);
        Bonus {
            id: self.next_id(),
            handle: spawn_moving(scene, pos, kind.sprite(), vel),
            kind,
        }
    }
}

/// Destroy pipe columns and bonuses that have left the screen
///
/// Returns how many entities were removed.
pub fn cull_offscreen<P: PhysicsSurface + ?Sized>(
    physics: &mut P,
    obstacles: &mut Vec<Obstacle>,
    bonuses: &mut Vec<Bonus>,
    screen_height: f32,
) -> usize {
    let mut culled = 0;

    obstacles.retain(|obstacle| {
        let gone = obstacle
            .blocks
            .iter()
            .all(|b| physics.position(b.handle).is_none_or(|p| p.x < -CULL_MARGIN));
        if gone {
            for block in &obstacle.blocks {
                physics.destroy(block.handle);
            }
            culled += 1;
        }
        !gone
    });

    bonuses.retain(|bonus| {
        let gone = physics.position(bonus.handle).is_none_or(|p| {
            p.x < -CULL_MARGIN || p.y < -CULL_MARGIN || p.y > screen_height + CULL_MARGIN
        });
        if gone {
            physics.destroy(bonus.handle);
            culled += 1;
        }
        !gone
    });

    culled
}
