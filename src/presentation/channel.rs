use super::{Cue, Presenter, Screen, StatusMessage, PLAYBACK_VIBRATION_MS};
use crate::game::Color;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::mpsc;

/// One presenter call, in the shape sent to WebSocket clients
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresentationEvent {
    PlaySequence {
        sequence: Vec<Color>,
        flash_ms: u64,
        gap_ms: u64,
    },
    Flash {
        color: Color,
        system_playback: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        vibrate_ms: Option<u64>,
    },
    Scoreboard {
        score: u32,
        level: u32,
    },
    GameOver {
        final_score: u32,
        final_level: u32,
        message: String,
    },
    PauseStats {
        score: u32,
        level: u32,
    },
    Navigate {
        screen: Screen,
    },
    Status {
        status: StatusMessage,
        text: &'static str,
    },
    Cue {
        cue: Cue,
        #[serde(skip_serializing_if = "Option::is_none")]
        sound: Option<&'static str>,
        vibration: &'static [u64],
    },
}

/// Presenter that turns each call into a [`PresentationEvent`] on a channel.
///
/// Calls fail once the receiving side is gone.
#[derive(Debug, Clone)]
pub struct ChannelPresenter {
    tx: mpsc::UnboundedSender<PresentationEvent>,
}

impl ChannelPresenter {
    pub fn new(tx: mpsc::UnboundedSender<PresentationEvent>) -> Self {
        Self { tx }
    }

    /// Presenter plus the receiver its events arrive on
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PresentationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: PresentationEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| anyhow!("presentation channel closed"))
    }
}

impl Presenter for ChannelPresenter {
    fn play_sequence(&mut self, sequence: &[Color], per_color: Duration, gap: Duration) -> Result<()> {
        self.send(PresentationEvent::PlaySequence {
            sequence: sequence.to_vec(),
            flash_ms: per_color.as_millis() as u64,
            gap_ms: gap.as_millis() as u64,
        })
    }

    fn flash(&mut self, color: Color, system_playback: bool) -> Result<()> {
        self.send(PresentationEvent::Flash {
            color,
            system_playback,
            vibrate_ms: system_playback.then_some(PLAYBACK_VIBRATION_MS),
        })
    }

    fn update_scoreboard(&mut self, score: u32, level: u32) -> Result<()> {
        self.send(PresentationEvent::Scoreboard { score, level })
    }

    fn show_game_over(&mut self, final_score: u32, final_level: u32, message: &str) -> Result<()> {
        self.send(PresentationEvent::GameOver {
            final_score,
            final_level,
            message: message.to_string(),
        })
    }

    fn show_pause_stats(&mut self, score: u32, level: u32) -> Result<()> {
        self.send(PresentationEvent::PauseStats { score, level })
    }

    fn navigate(&mut self, screen: Screen) -> Result<()> {
        self.send(PresentationEvent::Navigate { screen })
    }

    fn set_status(&mut self, status: StatusMessage) -> Result<()> {
        self.send(PresentationEvent::Status {
            status,
            text: status.text(),
        })
    }

    fn play_cue(&mut self, cue: Cue) -> Result<()> {
        self.send(PresentationEvent::Cue {
            cue,
            sound: cue.sound(),
            vibration: cue.vibration(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_events_arrive_in_call_order() {
        let (mut presenter, mut rx) = ChannelPresenter::channel();

        presenter.update_scoreboard(10, 2).unwrap();
        presenter.navigate(Screen::Game).unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            PresentationEvent::Scoreboard { score: 10, level: 2 }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            PresentationEvent::Navigate { screen: Screen::Game }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_playback_flash_carries_vibration() {
        let (mut presenter, mut rx) = ChannelPresenter::channel();

        presenter.flash(Color::Green, true).unwrap();
        presenter.flash(Color::Green, false).unwrap();

        let playback = serde_json::to_value(rx.try_recv().unwrap()).unwrap();
        assert_eq!(
            playback,
            json!({"type": "flash", "color": "green", "system_playback": true, "vibrate_ms": 100})
        );

        let click = serde_json::to_value(rx.try_recv().unwrap()).unwrap();
        assert_eq!(
            click,
            json!({"type": "flash", "color": "green", "system_playback": false})
        );
    }

    #[test]
    fn test_play_sequence_serializes_pacing_in_millis() {
        let (mut presenter, mut rx) = ChannelPresenter::channel();

        presenter
            .play_sequence(
                &[Color::Red, Color::Yellow],
                Duration::from_millis(400),
                Duration::from_millis(300),
            )
            .unwrap();

        let event = serde_json::to_value(rx.try_recv().unwrap()).unwrap();
        assert_eq!(event["type"], "play_sequence");
        assert_eq!(event["sequence"], json!(["red", "yellow"]));
        assert_eq!(event["flash_ms"], 400);
        assert_eq!(event["gap_ms"], 300);
    }

    #[test]
    fn test_cue_includes_sound_and_pattern() {
        let (mut presenter, mut rx) = ChannelPresenter::channel();
        presenter.play_cue(Cue::GameOver).unwrap();

        let event = serde_json::to_value(rx.try_recv().unwrap()).unwrap();
        assert_eq!(event["cue"], "game_over");
        assert_eq!(event["sound"], "gameover");
        assert_eq!(event["vibration"], json!([200, 100, 200, 100, 200]));
    }

    #[test]
    fn test_send_fails_after_receiver_dropped() {
        let (mut presenter, rx) = ChannelPresenter::channel();
        drop(rx);
        assert!(presenter.navigate(Screen::Start).is_err());
    }
}
