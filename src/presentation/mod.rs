// Presentation boundary: everything the engine asks the outside world to show

mod channel;
mod log;

pub use channel::{ChannelPresenter, PresentationEvent};
pub use log::LogPresenter;

use crate::game::Color;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Vibration for each color revealed during sequence playback (milliseconds)
pub const PLAYBACK_VIBRATION_MS: u64 = 100;

/// Screens a front end switches between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    Start,
    Game,
    GameOver,
    Pause,
}

/// Status line shown on the game screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusMessage {
    Memorize,
    YourTurn,
    ContinueSequence,
    Perfect,
}

impl StatusMessage {
    pub fn text(&self) -> &'static str {
        match self {
            StatusMessage::Memorize => "Memorize the sequence!",
            StatusMessage::YourTurn => "Your turn! Tap the colors in the right order.",
            StatusMessage::ContinueSequence => "Your turn! Continue the sequence.",
            StatusMessage::Perfect => "Perfect! Preparing the next level...",
        }
    }
}

/// Sound and haptic feedback at round boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// A new round past the first begins
    NextLevel,
    /// The player reproduced the whole sequence
    RoundWon,
    /// Wrong color
    GameOver,
}

impl Cue {
    pub fn sound(&self) -> Option<&'static str> {
        match self {
            Cue::NextLevel => Some("victory"),
            Cue::RoundWon => None,
            Cue::GameOver => Some("gameover"),
        }
    }

    /// Vibrate/pause alternation in milliseconds
    pub fn vibration(&self) -> &'static [u64] {
        match self {
            Cue::NextLevel => &[],
            Cue::RoundWon => &[100, 50, 100],
            Cue::GameOver => &[200, 100, 200, 100, 200],
        }
    }
}

/// Capabilities the game engine calls into.
///
/// Every call is a notification: the engine keeps all timing itself and never
/// waits on a presenter. Errors are logged by the engine and otherwise ignored,
/// so an unavailable audio or haptic device cannot change the game's outcome.
pub trait Presenter {
    /// Playback of the full `sequence` begins.
    ///
    /// The engine follows up with one `flash(color, true)` per entry, each
    /// `per_color + gap` after the previous one, and opens the input window
    /// once the last gap has elapsed.
    fn play_sequence(&mut self, sequence: &[Color], per_color: Duration, gap: Duration)
        -> Result<()>;

    /// Light one pad. `system_playback` is true for sequence playback (which
    /// also vibrates) and false when echoing a player's click.
    fn flash(&mut self, color: Color, system_playback: bool) -> Result<()>;

    fn update_scoreboard(&mut self, score: u32, level: u32) -> Result<()>;

    fn show_game_over(&mut self, final_score: u32, final_level: u32, message: &str) -> Result<()>;

    fn show_pause_stats(&mut self, score: u32, level: u32) -> Result<()>;

    fn navigate(&mut self, screen: Screen) -> Result<()>;

    fn set_status(&mut self, _status: StatusMessage) -> Result<()> {
        Ok(())
    }

    fn play_cue(&mut self, _cue: Cue) -> Result<()> {
        Ok(())
    }
}
