use std::str::FromStr;

use crate::{error::StoreError, focus::Direction};

/// Logical input vocabulary, already mapped from physical buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    PreviousGroup,
    NextGroup,
}

impl Input {
    pub fn direction(self) -> Option<Direction> {
        match self {
            Input::Up => Some(Direction::Up),
            Input::Down => Some(Direction::Down),
            Input::Left => Some(Direction::Left),
            Input::Right => Some(Direction::Right),
            Input::Confirm | Input::Cancel | Input::PreviousGroup | Input::NextGroup => None,
        }
    }
}

impl FromStr for Input {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "up" => Ok(Input::Up),
            "down" => Ok(Input::Down),
            "left" => Ok(Input::Left),
            "right" => Ok(Input::Right),
            "confirm" | "a" | "ok" => Ok(Input::Confirm),
            "cancel" | "b" | "back" => Ok(Input::Cancel),
            "previous" | "prev" | "lb" => Ok(Input::PreviousGroup),
            "next" | "rb" => Ok(Input::NextGroup),
            other => Err(StoreError::UnknownInput(other.to_string())),
        }
    }
}

/// Whether the current navigation scope handled an input or it should
/// propagate to the enclosing scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Consumed,
    NotConsumed,
}

impl InputOutcome {
    pub fn is_consumed(self) -> bool {
        self == InputOutcome::Consumed
    }
}
