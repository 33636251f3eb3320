use super::color::Color;
use super::state::{speed_for_level, GameState, Performance, Phase};
use crate::config::{GameConfig, TimingConfig, TrailConfig};
use crate::presentation::{Cue, Presenter, Screen, StatusMessage};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Timed steps of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedAction {
    /// Append a color and announce playback
    AdvanceRound,
    /// Light `sequence[index]`
    Reveal(usize),
    /// Playback finished, hand the turn to the player
    OpenInput,
    /// Switch to the game over screen
    ShowGameOverScreen,
}

/// The session's single timer slot.
///
/// Scheduling replaces whatever was armed, so no two delays of one game can
/// ever overlap. Pausing freezes the slot with its remaining delay.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Schedule {
    Empty,
    Armed { due: Instant, action: TimedAction },
    Frozen { remaining: Duration, action: TimedAction },
}

/// What a `submit_color` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Outside the input window; nothing changed
    Ignored,
    /// Correct color, round continues
    Accepted,
    /// Correct color that finished the sequence
    RoundComplete,
    /// Wrong color
    GameOver,
}

/// The game state machine.
///
/// Owns the [`GameState`] of one session plus its presenter. The engine never
/// sleeps: operations take the current time, and a driver calls
/// [`GameEngine::fire_due`] once [`GameEngine::next_deadline`] has passed.
pub struct GameEngine<P, R = StdRng> {
    game: GameConfig,
    timing: TimingConfig,
    state: GameState,
    schedule: Schedule,
    /// Phase to restore on resume
    resume_phase: Phase,
    rng: R,
    presenter: P,
}

impl<P: Presenter> GameEngine<P> {
    /// Create an idle engine with an entropy-seeded RNG
    pub fn new(config: &TrailConfig, presenter: P) -> Self {
        Self::with_rng(config, presenter, StdRng::from_entropy())
    }
}

impl<P: Presenter, R: Rng> GameEngine<P, R> {
    pub fn with_rng(config: &TrailConfig, presenter: P, rng: R) -> Self {
        Self {
            game: config.game.clone(),
            timing: config.timing.clone(),
            state: GameState::new(&config.game),
            schedule: Schedule::Empty,
            resume_phase: Phase::Idle,
            rng,
            presenter,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// When the armed timed transition is due, if any
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.schedule {
            Schedule::Armed { due, .. } => Some(due),
            _ => None,
        }
    }

    /// The transition waiting in the timer slot, armed or frozen
    pub fn pending_action(&self) -> Option<TimedAction> {
        match self.schedule {
            Schedule::Empty => None,
            Schedule::Armed { action, .. } | Schedule::Frozen { action, .. } => Some(action),
        }
    }

    /// Begin a new game, discarding any previous one
    pub fn start(&mut self, now: Instant) {
        self.state = GameState::new(&self.game);
        self.state.is_playing = true;
        self.state.phase = Phase::ShowingSequence;
        self.resume_phase = Phase::ShowingSequence;

        info!("Starting new game");

        self.update_scoreboard();
        self.navigate(Screen::Game);
        self.arm(now + self.timing.start_delay(), TimedAction::AdvanceRound);
    }

    /// Handle a player's color.
    ///
    /// Outside the input window (not playing, not the player's turn, or
    /// paused) the call is ignored without touching any state.
    pub fn submit_color(&mut self, color: Color, now: Instant) -> SubmitOutcome {
        if !self.state.accepts_input() {
            debug!(color = %color, phase = ?self.state.phase, "Ignoring input outside the player's turn");
            return SubmitOutcome::Ignored;
        }

        present(&mut self.presenter, "flash", |p| p.flash(color, false));

        let Some(expected) = self.state.expected() else {
            // An open input window always has a color left to match
            return SubmitOutcome::Ignored;
        };

        if color != expected {
            info!(
                color = %color,
                expected = %expected,
                position = self.state.player_input.len(),
                "Wrong color"
            );
            self.game_over(now);
            return SubmitOutcome::GameOver;
        }

        self.state.player_input.push(color);
        debug!(color = %color, position = self.state.player_input.len(), "Correct color");

        if self.state.player_input.len() == self.state.sequence.len() {
            self.complete_round(now);
            return SubmitOutcome::RoundComplete;
        }
        SubmitOutcome::Accepted
    }

    /// Suspend the game. No-op unless playing and not already paused.
    pub fn pause(&mut self, now: Instant) -> bool {
        if !self.state.is_playing || self.state.is_paused {
            return false;
        }

        self.resume_phase = self.state.phase;
        self.state.is_paused = true;
        self.state.is_player_turn = false;
        self.state.phase = Phase::Paused;

        if let Schedule::Armed { due, action } = self.schedule {
            self.schedule = Schedule::Frozen {
                remaining: due.saturating_duration_since(now),
                action,
            };
        }

        info!(level = self.state.level, score = self.state.score, "Game paused");

        let (score, level) = (self.state.score, self.state.level);
        present(&mut self.presenter, "show_pause_stats", |p| {
            p.show_pause_stats(score, level)
        });
        self.navigate(Screen::Pause);
        true
    }

    /// Continue a paused game. No-op unless paused.
    ///
    /// A frozen transition is re-armed with the delay it had left. The input
    /// window reopens only if the player was mid-round when pausing.
    pub fn resume(&mut self, now: Instant) -> bool {
        if !self.state.is_paused {
            return false;
        }

        self.state.is_paused = false;
        self.navigate(Screen::Game);

        if let Schedule::Frozen { remaining, action } = self.schedule {
            self.schedule = Schedule::Armed { due: now + remaining, action };
        }

        if self.resume_phase == Phase::AwaitingInput && self.state.round_in_progress() {
            self.state.is_player_turn = true;
            self.state.phase = Phase::AwaitingInput;
            self.set_status(StatusMessage::ContinueSequence);
        } else {
            self.state.phase = self.resume_phase;
        }

        info!(phase = ?self.state.phase, "Game resumed");
        true
    }

    /// Abandon the game and return to the start screen
    pub fn quit(&mut self) {
        self.return_to_start("quit");
    }

    /// Same as [`quit`](Self::quit), from the game over screen's menu button
    pub fn menu(&mut self) {
        self.return_to_start("menu");
    }

    /// Run the armed transition if it is due at `now`.
    ///
    /// Returns true when a transition ran; callers loop until false.
    pub fn fire_due(&mut self, now: Instant) -> bool {
        let action = match self.schedule {
            Schedule::Armed { due, action } if due <= now => action,
            _ => return false,
        };
        self.schedule = Schedule::Empty;

        match action {
            TimedAction::AdvanceRound => self.advance_round(now),
            TimedAction::Reveal(index) => self.reveal(index, now),
            TimedAction::OpenInput => self.open_input(),
            TimedAction::ShowGameOverScreen => self.navigate(Screen::GameOver),
        }
        true
    }

    fn advance_round(&mut self, now: Instant) {
        let color = Color::random(&mut self.rng);
        self.state.sequence.push(color);
        self.state.player_input.clear();
        self.state.is_player_turn = false;
        self.state.phase = Phase::ShowingSequence;
        self.state.speed = speed_for_level(
            self.state.level,
            self.game.base_speed(),
            self.game.speed_step(),
            self.game.min_speed(),
        );

        info!(
            level = self.state.level,
            length = self.state.sequence.len(),
            speed_ms = self.state.speed.as_millis() as u64,
            "Starting round"
        );

        self.update_scoreboard();
        if self.state.level > 1 {
            present(&mut self.presenter, "play_cue", |p| p.play_cue(Cue::NextLevel));
        }
        self.set_status(StatusMessage::Memorize);

        let per_color = self.timing.flash_for(self.state.speed);
        let gap = self.timing.gap_for(self.state.speed);
        let sequence = &self.state.sequence;
        present(&mut self.presenter, "play_sequence", |p| {
            p.play_sequence(sequence, per_color, gap)
        });

        self.arm(now + self.timing.pre_playback_delay(), TimedAction::Reveal(0));
    }

    fn reveal(&mut self, index: usize, now: Instant) {
        let Some(&color) = self.state.sequence.get(index) else {
            warn!(index, length = self.state.sequence.len(), "Reveal step past end of sequence");
            self.open_input();
            return;
        };

        present(&mut self.presenter, "flash", |p| p.flash(color, true));

        let step = self.timing.flash_for(self.state.speed) + self.timing.gap_for(self.state.speed);
        if index + 1 < self.state.sequence.len() {
            self.arm(now + step, TimedAction::Reveal(index + 1));
        } else {
            self.arm(
                now + step + self.timing.post_playback_delay(),
                TimedAction::OpenInput,
            );
        }
    }

    fn open_input(&mut self) {
        self.state.is_player_turn = true;
        self.state.phase = Phase::AwaitingInput;
        self.set_status(StatusMessage::YourTurn);
        debug!(length = self.state.sequence.len(), "Awaiting player input");
    }

    fn complete_round(&mut self, now: Instant) {
        self.state.is_player_turn = false;
        self.state.level += 1;
        self.state.score += self.game.points_per_level;
        self.state.phase = Phase::ShowingSequence;

        info!(level = self.state.level, score = self.state.score, "Round complete");

        self.update_scoreboard();
        self.set_status(StatusMessage::Perfect);
        present(&mut self.presenter, "play_cue", |p| p.play_cue(Cue::RoundWon));
        self.arm(now + self.timing.next_round_delay(), TimedAction::AdvanceRound);
    }

    fn game_over(&mut self, now: Instant) {
        self.state.is_playing = false;
        self.state.is_player_turn = false;
        self.state.phase = Phase::GameOver;

        let (score, level) = (self.state.score, self.state.level);
        let performance = Performance::for_level(level);

        info!(final_score = score, final_level = level, performance = ?performance, "Game over");

        present(&mut self.presenter, "play_cue", |p| p.play_cue(Cue::GameOver));
        present(&mut self.presenter, "show_game_over", |p| {
            p.show_game_over(score, level, performance.message())
        });
        self.arm(now + self.timing.game_over_delay(), TimedAction::ShowGameOverScreen);
    }

    fn return_to_start(&mut self, reason: &'static str) {
        if self.pending_action().is_some() {
            debug!(reason, "Cancelling pending transition");
        }
        self.schedule = Schedule::Empty;
        self.state = GameState::new(&self.game);
        self.resume_phase = Phase::Idle;

        info!(reason, "Returning to start screen");
        self.navigate(Screen::Start);
    }

    fn arm(&mut self, due: Instant, action: TimedAction) {
        self.schedule = Schedule::Armed { due, action };
    }

    fn update_scoreboard(&mut self) {
        let (score, level) = (self.state.score, self.state.level);
        present(&mut self.presenter, "update_scoreboard", |p| {
            p.update_scoreboard(score, level)
        });
    }

    fn set_status(&mut self, status: StatusMessage) {
        present(&mut self.presenter, "set_status", |p| p.set_status(status));
    }

    fn navigate(&mut self, screen: Screen) {
        self.state.screen = screen;
        present(&mut self.presenter, "navigate", |p| p.navigate(screen));
    }
}

/// Call into the presenter, logging and dropping any failure
fn present<P, F>(presenter: &mut P, call: &'static str, f: F)
where
    F: FnOnce(&mut P) -> Result<()>,
{
    if let Err(e) = f(presenter) {
        warn!(call, error = %e, "Presenter call failed, continuing");
    }
}
