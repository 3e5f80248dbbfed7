//! What a viewer shows: the active panel, the clock and the status line

use super::evaluator::CardColor;
use crate::state::Phase;

pub const STATUS_READY: &str = "Ready...";
pub const STATUS_TIMING: &str = "⏱️ Timing";
pub const STATUS_STOPPED: &str = "⏸️ Stopped";
pub const STATUS_BELL: &str = "🔔 Bell Ringing!";

/// The three viewer panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Preset picker
    Template,
    /// Custom threshold entry
    Setup,
    /// Clock display for running and stopped timers
    Timer,
}

impl From<Phase> for Panel {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Template => Panel::Template,
            Phase::CustomSetup => Panel::Setup,
            Phase::Running | Phase::Stopped => Panel::Timer,
        }
    }
}

/// Format whole seconds as `MM:SS`; minutes keep growing past 99
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Display {
    pub panel: Panel,
    pub card: Option<CardColor>,
    pub status: String,
    pub clock: String,
}

impl Display {
    pub fn new() -> Self {
        Self {
            panel: Panel::Template,
            card: None,
            status: STATUS_READY.to_string(),
            clock: format_clock(0),
        }
    }

    /// One-line rendering for terminal output
    pub fn render(&self) -> String {
        match self.panel {
            Panel::Template => format!(
                "[templates] {} (preset prepared|table-topic|evaluation|keynote, custom)",
                self.status
            ),
            Panel::Setup => format!(
                "[custom] {} (start <green> <yellow> <red> <bell>, back)",
                self.status
            ),
            Panel::Timer => {
                let card = self.card.map(|c| c.as_str().to_uppercase()).unwrap_or_else(|| "-".to_string());
                format!("[{}] {}  {}", card, self.clock, self.status)
            }
        }
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(61), "01:01");
        assert_eq!(format_clock(450), "07:30");
        assert_eq!(format_clock(6_000), "100:00");
    }

    #[test]
    fn panels_follow_phase() {
        assert_eq!(Panel::from(Phase::Template), Panel::Template);
        assert_eq!(Panel::from(Phase::CustomSetup), Panel::Setup);
        assert_eq!(Panel::from(Phase::Running), Panel::Timer);
        assert_eq!(Panel::from(Phase::Stopped), Panel::Timer);
    }

    #[test]
    fn timer_panel_shows_card_and_clock() {
        let display = Display {
            panel: Panel::Timer,
            card: Some(CardColor::Yellow),
            status: STATUS_TIMING.to_string(),
            clock: format_clock(365),
        };
        let line = display.render();
        assert!(line.starts_with("[YELLOW] 06:05"));
    }
}
