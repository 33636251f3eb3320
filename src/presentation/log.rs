use super::{Cue, Presenter, Screen, StatusMessage};
use crate::game::Color;
use anyhow::Result;
use std::time::Duration;
use tracing::info;

/// Headless presenter that records every call as a tracing event.
#[derive(Debug, Clone, Default)]
pub struct LogPresenter {
    label: String,
}

impl LogPresenter {
    pub fn new(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl Presenter for LogPresenter {
    fn play_sequence(&mut self, sequence: &[Color], per_color: Duration, gap: Duration) -> Result<()> {
        info!(
            presenter = %self.label,
            length = sequence.len(),
            flash_ms = per_color.as_millis() as u64,
            gap_ms = gap.as_millis() as u64,
            "Playing sequence"
        );
        Ok(())
    }

    fn flash(&mut self, color: Color, system_playback: bool) -> Result<()> {
        info!(presenter = %self.label, color = %color, system_playback, "Flash");
        Ok(())
    }

    fn update_scoreboard(&mut self, score: u32, level: u32) -> Result<()> {
        info!(presenter = %self.label, score, level, "Scoreboard");
        Ok(())
    }

    fn show_game_over(&mut self, final_score: u32, final_level: u32, message: &str) -> Result<()> {
        info!(
            presenter = %self.label,
            final_score,
            final_level,
            message = %message,
            "Game over"
        );
        Ok(())
    }

    fn show_pause_stats(&mut self, score: u32, level: u32) -> Result<()> {
        info!(presenter = %self.label, score, level, "Paused");
        Ok(())
    }

    fn navigate(&mut self, screen: Screen) -> Result<()> {
        info!(presenter = %self.label, screen = ?screen, "Navigate");
        Ok(())
    }

    fn set_status(&mut self, status: StatusMessage) -> Result<()> {
        info!(presenter = %self.label, "{}", status.text());
        Ok(())
    }

    fn play_cue(&mut self, cue: Cue) -> Result<()> {
        info!(presenter = %self.label, cue = ?cue, sound = ?cue.sound(), "Cue");
        Ok(())
    }
}
