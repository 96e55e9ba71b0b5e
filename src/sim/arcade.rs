//! Headless arcade world
//!
//! A minimal stand-in for the host engine: axis-aligned boxes, per-body
//! gravity, explicit Euler integration. Used by the native binary and tests.

use std::collections::{BTreeMap, HashMap};

use glam::Vec2;

use super::surface::{EntityHandle, PhysicsSurface, RenderSurface, TextHandle, TextStyle};
use crate::assets;
use crate::consts::*;

/// A sprite and its (optional) physics body
#[derive(Debug, Clone)]
pub struct Sprite {
    pub alias: String,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub gravity: f32,
    pub rotation: f32,
    pub body: bool,
}

impl Sprite {
    fn overlaps(&self, other: &Sprite) -> bool {
        let a_max = self.pos + self.size;
        let b_max = other.pos + other.size;
        self.pos.x < b_max.x && other.pos.x < a_max.x && self.pos.y < b_max.y && other.pos.y < a_max.y
    }
}

/// A text label
#[derive(Debug, Clone)]
pub struct Label {
    pub pos: Vec2,
    pub text: String,
    pub style: TextStyle,
}

/// In-memory render + physics surface
#[derive(Debug, Clone)]
pub struct ArcadeWorld {
    sizes: HashMap<String, Vec2>,
    images: HashMap<String, String>,
    sounds: HashMap<String, String>,
    sprites: BTreeMap<EntityHandle, Sprite>,
    labels: BTreeMap<TextHandle, Label>,
    background: String,
    next_id: u32,
}

impl Default for ArcadeWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcadeWorld {
    /// World with the stock sprite sizes
    pub fn new() -> Self {
        let sizes = [
            (assets::PLAYER, Vec2::new(43.0, 33.0)),
            (assets::PIPE, Vec2::new(PIPE_BLOCK_WIDTH, PIPE_BLOCK_HEIGHT)),
            (assets::PIPE_END, Vec2::new(PIPE_END_WIDTH, PIPE_END_HEIGHT)),
            (assets::BALLOONS, Vec2::new(40.0, 60.0)),
            (assets::WEIGHT, Vec2::new(40.0, 40.0)),
            (assets::EASY_MARKER, Vec2::new(100.0, 50.0)),
            (assets::NORMAL_MARKER, Vec2::new(100.0, 50.0)),
        ]
        .into_iter()
        .map(|(alias, size)| (alias.to_string(), size))
        .collect();

        Self {
            sizes,
            images: HashMap::new(),
            sounds: HashMap::new(),
            sprites: BTreeMap::new(),
            labels: BTreeMap::new(),
            background: String::new(),
            next_id: 1,
        }
    }

    pub fn sprite(&self, handle: EntityHandle) -> Option<&Sprite> {
        self.sprites.get(&handle)
    }

    /// Live sprites drawn with `alias`
    pub fn count_alias(&self, alias: &str) -> usize {
        self.sprites.values().filter(|s| s.alias == alias).count()
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn label(&self, handle: TextHandle) -> Option<&Label> {
        self.labels.get(&handle)
    }

    pub fn labels(&self) -> impl Iterator<Item = &Label> {
        self.labels.values()
    }

    pub fn background(&self) -> &str {
        &self.background
    }

    pub fn is_image_loaded(&self, alias: &str) -> bool {
        self.images.contains_key(alias)
    }

    pub fn is_audio_loaded(&self, alias: &str) -> bool {
        self.sounds.contains_key(alias)
    }

    /// Move a sprite directly, bypassing integration
    pub fn teleport(&mut self, handle: EntityHandle, pos: Vec2) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.pos = pos;
        }
    }

    fn allocate(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl RenderSurface for ArcadeWorld {
    fn load_image(&mut self, alias: &str, path: &str) {
        self.images.insert(alias.to_string(), path.to_string());
    }

    fn load_audio(&mut self, alias: &str, path: &str) {
        self.sounds.insert(alias.to_string(), path.to_string());
    }

    fn create_sprite(&mut self, pos: Vec2, alias: &str) -> EntityHandle {
        let size = match self.sizes.get(alias) {
            Some(size) => *size,
            None => {
                log::warn!("No size known for sprite '{}', it will never overlap", alias);
                Vec2::ZERO
            }
        };
        let handle = EntityHandle(self.allocate());
        self.sprites.insert(
            handle,
            Sprite {
                alias: alias.to_string(),
                pos,
                size,
                vel: Vec2::ZERO,
                gravity: 0.0,
                rotation: 0.0,
                body: false,
            },
        );
        handle
    }

    fn create_text(&mut self, pos: Vec2, initial: &str, style: &TextStyle) -> TextHandle {
        let handle = TextHandle(self.allocate());
        self.labels.insert(
            handle,
            Label {
                pos,
                text: initial.to_string(),
                style: style.clone(),
            },
        );
        handle
    }

    fn set_text(&mut self, handle: TextHandle, value: &str) {
        if let Some(label) = self.labels.get_mut(&handle) {
            label.text = value.to_string();
        }
    }

    fn destroy_text(&mut self, handle: TextHandle) {
        self.labels.remove(&handle);
    }

    fn set_rotation(&mut self, handle: EntityHandle, radians: f32) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.rotation = radians;
        }
    }

    fn set_background_color(&mut self, hex: &str) {
        self.background = hex.to_string();
    }
}

impl PhysicsSurface for ArcadeWorld {
    fn enable_physics(&mut self, handle: EntityHandle) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.body = true;
        }
    }

    fn set_velocity(&mut self, handle: EntityHandle, vel: Vec2) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.vel = vel;
        }
    }

    fn set_gravity(&mut self, handle: EntityHandle, gravity_y: f32) {
        if let Some(sprite) = self.sprites.get_mut(&handle) {
            sprite.gravity = gravity_y;
        }
    }

    fn position(&self, handle: EntityHandle) -> Option<Vec2> {
        self.sprites.get(&handle).map(|s| s.pos)
    }

    fn velocity(&self, handle: EntityHandle) -> Option<Vec2> {
        self.sprites.get(&handle).map(|s| s.vel)
    }

    fn overlap(&self, a: EntityHandle, b: EntityHandle) -> bool {
        match (self.sprites.get(&a), self.sprites.get(&b)) {
            (Some(a), Some(b)) => a.body && b.body && a.overlaps(b),
            _ => false,
        }
    }

    fn destroy(&mut self, handle: EntityHandle) {
        self.sprites.remove(&handle);
    }

    fn step(&mut self, dt: f32) {
        for sprite in self.sprites.values_mut().filter(|s| s.body) {
            sprite.vel.y += sprite.gravity * dt;
            sprite.pos += sprite.vel * dt;
        }
    }
}
