use super::color::Color;
use crate::config::GameConfig;
use crate::presentation::Screen;
use serde::Serialize;
use std::time::Duration;

/// Where a session is in its round cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    ShowingSequence,
    AwaitingInput,
    Paused,
    GameOver,
}

/// Mutable record of one game
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Colors shown so far, append-only within a game
    pub sequence: Vec<Color>,
    /// The player's attempt at the current round
    pub player_input: Vec<Color>,
    pub level: u32,
    pub score: u32,
    pub is_playing: bool,
    pub is_player_turn: bool,
    pub is_paused: bool,
    /// Playback pacing for the current round
    pub speed: Duration,
    pub phase: Phase,
    pub screen: Screen,
}

impl GameState {
    /// Initial values of a new game
    pub fn new(config: &GameConfig) -> Self {
        Self {
            sequence: Vec::new(),
            player_input: Vec::new(),
            level: 1,
            score: 0,
            is_playing: false,
            is_player_turn: false,
            is_paused: false,
            speed: config.base_speed(),
            phase: Phase::Idle,
            screen: Screen::Start,
        }
    }

    /// Color the next submission must match, if the round still expects one
    pub fn expected(&self) -> Option<Color> {
        self.sequence.get(self.player_input.len()).copied()
    }

    /// True while the player has started but not finished reproducing the sequence
    pub fn round_in_progress(&self) -> bool {
        self.player_input.len() < self.sequence.len()
            && self.sequence.starts_with(&self.player_input)
    }

    /// Input is accepted only on the player's turn of a live, unpaused game
    pub fn accepts_input(&self) -> bool {
        self.is_playing && self.is_player_turn && !self.is_paused
    }
}

/// Playback speed for `level`: `max(min, base - (level - 1) * step)`
pub fn speed_for_level(level: u32, base: Duration, step: Duration, min: Duration) -> Duration {
    let completed = level.saturating_sub(1);
    let reduction = step.checked_mul(completed).unwrap_or(Duration::MAX);
    base.saturating_sub(reduction).max(min)
}

/// Rating of a finished game, by final level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Performance {
    KeepTrying,
    GoodJob,
    Impressive,
    Master,
}

impl Performance {
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=3 => Performance::KeepTrying,
            4..=7 => Performance::GoodJob,
            8..=12 => Performance::Impressive,
            _ => Performance::Master,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Performance::KeepTrying => "Keep trying! You can do better.",
            Performance::GoodJob => "Good job! Your memory is improving.",
            Performance::Impressive => "Impressive! You have a great memory.",
            Performance::Master => "Incredible! You are a master of colors!",
        }
    }
}
