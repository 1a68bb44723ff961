use std::fmt;

use crate::commands::CommandKind;

/// Why a single token failed to convert into a typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    Empty,
    Integer(String),
    Fraction(String),
    Color(String),
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty token"),
            Self::Integer(token) => write!(f, "'{token}' is not a base-10 integer"),
            Self::Fraction(token) => {
                write!(f, "'{token}' is not a number followed by 'w' or 'h'")
            }
            Self::Color(token) => write!(f, "'{token}' is not a hex or named color"),
        }
    }
}

impl std::error::Error for ValueError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectKind {
    Empty,
    UnknownCommand,
    WrongArity,
    BadArgument,
    CanvasSize,
}

/// A line the interpreter refuses to execute. Every rejection is reported to
/// the user the same way; the detail only reaches the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: RejectKind,
    pub message: String,
}

impl Rejection {
    pub fn empty() -> Self {
        Self {
            kind: RejectKind::Empty,
            message: String::from("no tokens on the line"),
        }
    }

    pub fn unknown(token: &str) -> Self {
        Self {
            kind: RejectKind::UnknownCommand,
            message: format!("no command is called '{token}'"),
        }
    }

    pub fn arity(command: CommandKind, got: usize) -> Self {
        Self {
            kind: RejectKind::WrongArity,
            message: format!(
                "{} does not accept {got} argument(s)",
                command.descriptor().name
            ),
        }
    }

    pub fn argument(command: CommandKind, index: usize, error: ValueError) -> Self {
        Self {
            kind: RejectKind::BadArgument,
            message: format!(
                "{} argument {}: {error}",
                command.descriptor().name,
                index + 1
            ),
        }
    }

    pub fn canvas_size(width: i32, height: i32, max: u32) -> Self {
        Self {
            kind: RejectKind::CanvasSize,
            message: format!("canvas {width}x{height} must be between 1x1 and {max}x{max}"),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Rejection {}
