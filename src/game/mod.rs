// Game engine: sequence generation, turn state machine, pacing and scoring

mod color;
mod engine;
mod state;

pub use color::{Color, UnknownColor, PALETTE};
pub use engine::{GameEngine, SubmitOutcome, TimedAction};
pub use state::{speed_for_level, GameState, Performance, Phase};
