//! Bonus effects
//!
//! A pickup adds its gravity and palette deltas to the session right away and
//! records them in the [`EffectLedger`]. Timed effects schedule their own
//! reversal; overlapping windows simply sum, so the session gravity is always
//! the profile baseline plus whatever is still in the ledger.

use super::state::{BonusKind, BonusPayload, Session};
use super::surface::PaletteDelta;
use super::timer::{TimerEvent, TimerQueue};

/// An applied bonus that has not been reverted yet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEffect {
    pub id: u32,
    pub kind: BonusKind,
    pub payload: BonusPayload,
    /// Game-clock time the effect was applied
    pub applied_at: f64,
}

/// Bonuses currently affecting the session
#[derive(Debug, Clone, Default)]
pub struct EffectLedger {
    active: Vec<ActiveEffect>,
    next_id: u32,
}

impl EffectLedger {
    pub fn active(&self) -> &[ActiveEffect] {
        &self.active
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn gravity_sum(&self) -> f32 {
        self.active.iter().map(|e| e.payload.gravity_delta).sum()
    }

    pub fn palette_sum(&self) -> PaletteDelta {
        self.active
            .iter()
            .fold(PaletteDelta::ZERO, |acc, e| acc + e.payload.palette_delta)
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    fn record(&mut self, kind: BonusKind, payload: BonusPayload, applied_at: f64) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.active.push(ActiveEffect {
            id,
            kind,
            payload,
            applied_at,
        });
        id
    }

    fn take(&mut self, id: u32) -> Option<ActiveEffect> {
        let index = self.active.iter().position(|e| e.id == id)?;
        Some(self.active.remove(index))
    }

    /// Oldest effect of `kind` that has no timer of its own
    fn oldest_unbounded(&self, kind: BonusKind) -> Option<u32> {
        self.active
            .iter()
            .find(|e| e.kind == kind && e.payload.duration.is_none())
            .map(|e| e.id)
    }
}

/// Result of a pickup
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PickupOutcome {
    /// Deltas applied and recorded under `effect_id`
    Applied { effect_id: u32, expires: bool },
    /// An unbounded effect of the opposite kind was undone instead
    Cancelled { cancelled: BonusKind },
}

/// Apply a collected bonus to the session
///
/// Gravity and palette change immediately; callers push the new values to the
/// player body and the background.
pub fn apply_bonus(
    session: &mut Session,
    timers: &mut TimerQueue,
    kind: BonusKind,
    payload: BonusPayload,
) -> PickupOutcome {
    if payload.duration.is_none() {
        if let Some(id) = session.effects.oldest_unbounded(kind.opposite()) {
            if let Some(cancelled) = revert_bonus(session, id) {
                return PickupOutcome::Cancelled { cancelled };
            }
        }
    }

    session.current_gravity += payload.gravity_delta;
    session.palette_offset += payload.palette_delta;
    let effect_id = session.effects.record(kind, payload, timers.now());

    if let Some(duration) = payload.duration {
        timers.schedule_once(duration, TimerEvent::RevertBonus { effect_id }, session.generation);
    }

    log::debug!(
        "{:?} applied: gravity {} palette {:?}",
        kind,
        session.current_gravity,
        session.palette_offset
    );
    PickupOutcome::Applied {
        effect_id,
        expires: payload.duration.is_some(),
    }
}

/// Undo a previously applied effect
///
/// Returns `None` if the effect is no longer active (already reverted or
/// cleared by a restart).
pub fn revert_bonus(session: &mut Session, effect_id: u32) -> Option<BonusKind> {
    let effect = session.effects.take(effect_id)?;
    session.current_gravity -= effect.payload.gravity_delta;
    session.palette_offset -= effect.payload.palette_delta;
    log::debug!(
        "{:?} reverted: gravity {} palette {:?}",
        effect.kind,
        session.current_gravity,
        session.palette_offset
    );
    Some(effect.kind)
}
