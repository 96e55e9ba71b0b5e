//! Host-provided rendering and physics
//!
//! The engine never draws or integrates motion itself. It creates sprites by
//! alias, hands them to the physics surface, and asks once per tick which
//! pairs overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque handle to a sprite with an optional physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

/// Opaque handle to a text label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextHandle(pub u32);

/// Font and fill for a text label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub font: String,
    pub fill: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: crate::consts::LABEL_FONT.to_string(),
            fill: crate::consts::LABEL_FILL.to_string(),
        }
    }
}

/// Rendering and asset side of the host
pub trait RenderSurface {
    fn load_image(&mut self, alias: &str, path: &str);
    fn load_audio(&mut self, alias: &str, path: &str);
    /// Place a sprite with its top-left corner at `pos`
    fn create_sprite(&mut self, pos: Vec2, alias: &str) -> EntityHandle;
    fn create_text(&mut self, pos: Vec2, initial: &str, style: &TextStyle) -> TextHandle;
    fn set_text(&mut self, handle: TextHandle, value: &str);
    fn destroy_text(&mut self, handle: TextHandle);
    fn set_rotation(&mut self, handle: EntityHandle, radians: f32);
    /// `hex` is `#rrggbb`
    fn set_background_color(&mut self, hex: &str);
}

/// Physics and overlap side of the host
pub trait PhysicsSurface {
    fn enable_physics(&mut self, handle: EntityHandle);
    fn set_velocity(&mut self, handle: EntityHandle, vel: Vec2);
    fn set_gravity(&mut self, handle: EntityHandle, gravity_y: f32);
    /// Top-left corner of the body, `None` once destroyed
    fn position(&self, handle: EntityHandle) -> Option<Vec2>;
    fn velocity(&self, handle: EntityHandle) -> Option<Vec2>;
    /// Whether both bodies exist and intersect this tick
    fn overlap(&self, a: EntityHandle, b: EntityHandle) -> bool;
    fn destroy(&mut self, handle: EntityHandle);
    /// Integrate gravity and velocity for every body
    fn step(&mut self, dt: f32);
}

/// Everything the session controller needs from the host
pub trait Scene: RenderSurface + PhysicsSurface {}

impl<T: RenderSurface + PhysicsSurface> Scene for T {}

/// Create a sprite that moves with `vel` from the moment it appears
pub fn spawn_moving<S: Scene + ?Sized>(scene: &mut S, pos: Vec2, alias: &str, vel: Vec2) -> EntityHandle {
    let handle = scene.create_sprite(pos, alias);
    scene.enable_physics(handle);
    scene.set_velocity(handle, vel);
    handle
}

/// An 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Shift by a signed offset, saturating each channel at 0 and 255
    pub fn offset(self, delta: PaletteDelta) -> Self {
        let shift = |c: u8, d: i16| (c as i16 + d).clamp(0, 255) as u8;
        Self {
            r: shift(self.r, delta.r),
            g: shift(self.g, delta.g),
            b: shift(self.b, delta.b),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Signed per-channel color change applied by a bonus
///
/// Offsets are summed unclamped so that reverting a bonus always restores the
/// exact previous value; clamping happens only in [`Rgb::offset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaletteDelta {
    pub r: i16,
    pub g: i16,
    pub b: i16,
}

impl PaletteDelta {
    pub const ZERO: Self = Self { r: 0, g: 0, b: 0 };

    pub const fn new(r: i16, g: i16, b: i16) -> Self {
        Self { r, g, b }
    }
}

impl std::ops::Add for PaletteDelta {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl std::ops::Sub for PaletteDelta {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl std::ops::AddAssign for PaletteDelta {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for PaletteDelta {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
