//! Score counter and its on-screen label

use glam::Vec2;

use super::state::Session;
use super::surface::{RenderSurface, TextHandle, TextStyle};
use crate::consts::SCORE_POS;

/// Owns the score label; the count itself lives in [`Session::score`]
#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    label: Option<TextHandle>,
}

impl ScoreTracker {
    /// Create the label showing the current score
    pub fn attach<R: RenderSurface + ?Sized>(&mut self, render: &mut R, session: &Session) {
        self.detach(render);
        let pos = Vec2::new(SCORE_POS.0, SCORE_POS.1);
        self.label = Some(render.create_text(pos, &session.score.to_string(), &TextStyle::default()));
    }

    pub fn detach<R: RenderSurface + ?Sized>(&mut self, render: &mut R) {
        if let Some(label) = self.label.take() {
            render.destroy_text(label);
        }
    }

    pub fn label(&self) -> Option<TextHandle> {
        self.label
    }

    pub fn increment<R: RenderSurface + ?Sized>(&self, render: &mut R, session: &mut Session) -> u32 {
        session.score += 1;
        if let Some(label) = self.label {
            render.set_text(label, &session.score.to_string());
        }
        session.score
    }
}
