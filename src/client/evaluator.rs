//! Threshold evaluation: which cards and bells newly fire on a tick

use crate::state::{Phase, TimerSettings};

/// Color cards shown as time passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardColor {
    Green,
    Yellow,
    Red,
}

impl CardColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardColor::Green => "green",
            CardColor::Yellow => "yellow",
            CardColor::Red => "red",
        }
    }

    /// Status line shown once the card is reached
    pub fn status_text(&self) -> &'static str {
        match self {
            CardColor::Green => "🟢 Green Card",
            CardColor::Yellow => "🟡 Yellow Card",
            CardColor::Red => "🔴 Red Card",
        }
    }
}

/// Per-run record of which thresholds have already fired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertFlags {
    pub green: bool,
    pub yellow: bool,
    pub red: bool,
    pub bell: bool,
}

impl AlertFlags {
    pub fn card(&self, color: CardColor) -> bool {
        match color {
            CardColor::Green => self.green,
            CardColor::Yellow => self.yellow,
            CardColor::Red => self.red,
        }
    }

    fn set_card(&mut self, color: CardColor) {
        match color {
            CardColor::Green => self.green = true,
            CardColor::Yellow => self.yellow = true,
            CardColor::Red => self.red = true,
        }
    }
}

/// Something that newly happened on this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdEvent {
    CardReached(CardColor),
    Bell,
}

/// Output of one evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub flags: AlertFlags,
    pub events: Vec<ThresholdEvent>,
}

/// Decide which thresholds fire at `elapsed_seconds`.
///
/// Cards are checked in green, yellow, red order and may all fire on the
/// same tick; the last one in the list is the color to display. The bell is
/// only considered while running. A flag already set never fires again.
pub fn evaluate(
    elapsed_seconds: u64,
    settings: &TimerSettings,
    flags: AlertFlags,
    phase: Phase,
) -> Evaluation {
    let mut flags = flags;
    let mut events = Vec::new();

    let cards = [
        (CardColor::Green, settings.green),
        (CardColor::Yellow, settings.yellow),
        (CardColor::Red, settings.red),
    ];
    for (color, threshold) in cards {
        if threshold > 0 && !flags.card(color) && elapsed_seconds >= threshold {
            flags.set_card(color);
            events.push(ThresholdEvent::CardReached(color));
        }
    }

    if phase == Phase::Running
        && settings.bell > 0
        && !flags.bell
        && elapsed_seconds >= settings.bell
    {
        flags.bell = true;
        events.push(ThresholdEvent::Bell);
    }

    Evaluation { flags, events }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(sequence: &[u64], settings: TimerSettings) -> Vec<(u64, Vec<ThresholdEvent>)> {
        let mut flags = AlertFlags::default();
        let mut fired = Vec::new();
        for &elapsed in sequence {
            let evaluation = evaluate(elapsed, &settings, flags, Phase::Running);
            flags = evaluation.flags;
            if !evaluation.events.is_empty() {
                fired.push((elapsed, evaluation.events));
            }
        }
        fired
    }

    #[test]
    fn cards_fire_in_order_and_zero_bell_never_rings() {
        let fired = run(&[0, 4, 5, 6, 7], TimerSettings::new(5, 6, 7, 0));
        assert_eq!(
            fired,
            vec![
                (5, vec![ThresholdEvent::CardReached(CardColor::Green)]),
                (6, vec![ThresholdEvent::CardReached(CardColor::Yellow)]),
                (7, vec![ThresholdEvent::CardReached(CardColor::Red)]),
            ]
        );
    }

    #[test]
    fn bell_fires_exactly_once() {
        let fired = run(&[0, 1, 2, 3, 4, 10], TimerSettings::new(0, 0, 0, 2));
        assert_eq!(fired, vec![(2, vec![ThresholdEvent::Bell])]);
    }

    #[test]
    fn skipped_ticks_fire_every_passed_threshold_at_once() {
        let fired = run(&[0, 30], TimerSettings::new(5, 6, 7, 8));
        assert_eq!(
            fired,
            vec![(
                30,
                vec![
                    ThresholdEvent::CardReached(CardColor::Green),
                    ThresholdEvent::CardReached(CardColor::Yellow),
                    ThresholdEvent::CardReached(CardColor::Red),
                    ThresholdEvent::Bell,
                ]
            )]
        );
    }

    #[test]
    fn flags_only_move_from_false_to_true() {
        let settings = TimerSettings::new(3, 6, 9, 12);
        let mut flags = AlertFlags::default();
        let mut previous = flags;
        for elapsed in 0..20 {
            flags = evaluate(elapsed, &settings, flags, Phase::Running).flags;
            for (before, after) in [
                (previous.green, flags.green),
                (previous.yellow, flags.yellow),
                (previous.red, flags.red),
                (previous.bell, flags.bell),
            ] {
                assert!(!(before && !after), "flag cleared at {elapsed}");
            }
            previous = flags;
        }
        assert_eq!(flags, AlertFlags { green: true, yellow: true, red: true, bell: true });
    }

    #[test]
    fn re_evaluation_is_idempotent() {
        let settings = TimerSettings::new(5, 0, 0, 5);
        let first = evaluate(5, &settings, AlertFlags::default(), Phase::Running);
        assert_eq!(first.events.len(), 2);

        let second = evaluate(5, &settings, first.flags, Phase::Running);
        assert!(second.events.is_empty());
        assert_eq!(second.flags, first.flags);
    }

    #[test]
    fn stopped_timer_shows_cards_but_never_rings() {
        let evaluation = evaluate(100, &TimerSettings::new(5, 0, 0, 10), AlertFlags::default(), Phase::Stopped);
        assert_eq!(evaluation.events, vec![ThresholdEvent::CardReached(CardColor::Green)]);
        assert!(!evaluation.flags.bell);
    }
}
