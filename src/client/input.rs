//! Viewer command line: presets, custom thresholds and navigation

use thiserror::Error;

use crate::{
    protocol::ClientAction,
    state::{Phase, TimerSettings},
};

/// Built-in speech templates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    PreparedSpeech,
    TableTopic,
    Evaluation,
    Keynote,
}

impl Preset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "prepared" | "prepared-speech" | "speech" => Some(Preset::PreparedSpeech),
            "table-topic" | "tabletopic" | "topic" => Some(Preset::TableTopic),
            "evaluation" | "eval" => Some(Preset::Evaluation),
            "keynote" => Some(Preset::Keynote),
            _ => None,
        }
    }

    pub fn settings(&self) -> TimerSettings {
        match self {
            Preset::PreparedSpeech => TimerSettings::new(5 * 60, 6 * 60, 7 * 60, 7 * 60 + 30),
            Preset::TableTopic => TimerSettings::new(60, 90, 2 * 60, 2 * 60 + 30),
            Preset::Evaluation => TimerSettings::new(2 * 60, 2 * 60 + 30, 3 * 60, 3 * 60 + 30),
            // No bell for keynotes
            Preset::Keynote => TimerSettings::new(10 * 60, 15 * 60, 20 * 60, 0),
        }
    }
}

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    Send(ClientAction),
    Help,
    Quit,
}

/// Problems reported back to the user; nothing is sent when one occurs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Please fill in at least one time field!")]
    NoThresholds,
    #[error("Time cannot be negative!")]
    NegativeTime,
    #[error("start needs four times: <green> <yellow> <red> <bell>")]
    MissingFields,
    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),
    #[error("Unknown command '{0}', type 'help' for the list")]
    UnknownCommand(String),
}

pub const HELP: &str = "\
commands:
  preset <prepared|table-topic|evaluation|keynote>   start a template
  start <green> <yellow> <red> <bell>                 start with MM:SS or seconds, 0 disables
  stop | reset | custom | back | help | quit";

/// Parse one line typed by the user
pub fn parse_command(line: &str) -> Result<Option<UserCommand>, InputError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let parsed = match command.to_ascii_lowercase().as_str() {
        "start" => {
            let fields: Vec<&str> = words.collect();
            UserCommand::Send(ClientAction::start(validate_custom(&fields)?))
        }
        "preset" | "template" => {
            let name = words.next().unwrap_or_default();
            let preset = Preset::from_name(name)
                .ok_or_else(|| InputError::UnknownPreset(name.to_string()))?;
            UserCommand::Send(ClientAction::start(preset.settings()))
        }
        "stop" => UserCommand::Send(ClientAction::Stop),
        "reset" => UserCommand::Send(ClientAction::Reset),
        "custom" => UserCommand::Send(ClientAction::set_screen(Phase::CustomSetup)),
        "back" => UserCommand::Send(ClientAction::set_screen(Phase::Template)),
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" => UserCommand::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };

    Ok(Some(parsed))
}

/// Turn the four custom fields into settings, rejecting unusable input
pub fn validate_custom(fields: &[&str]) -> Result<TimerSettings, InputError> {
    if fields.len() != 4 {
        return Err(InputError::MissingFields);
    }

    let seconds: Vec<i64> = fields.iter().map(|field| parse_duration(field)).collect();
    if seconds.iter().all(|&s| s == 0) {
        return Err(InputError::NoThresholds);
    }
    if seconds.iter().any(|&s| s < 0) {
        return Err(InputError::NegativeTime);
    }

    let [green, yellow, red, bell] = [seconds[0], seconds[1], seconds[2], seconds[3]].map(|s| s as u64);
    Ok(TimerSettings::new(green, yellow, red, bell))
}

/// `MM:SS` or plain seconds; an unreadable part counts as zero
fn parse_duration(field: &str) -> i64 {
    let part = |s: &str| s.trim().parse::<i64>().unwrap_or(0);
    match field.split_once(':') {
        Some((minutes, seconds)) => part(minutes).saturating_mul(60).saturating_add(part(seconds)),
        None => part(field),
    }
}
