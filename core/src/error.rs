//! Error types for declaration and parsing.
//!
//! Runtime failures share a single [`ParseError`] type so callers need one
//! catch site. Defects in the declaration itself are [`DeclarationError`]s
//! and surface when a tree is compiled, never while parsing user input.

use thiserror::Error;

/// What went wrong while parsing a token list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No token prefix names a declared command. The message is the usage
    /// listing of every command path.
    NoMatchingCommand,
    /// A required option or positional was not supplied.
    MissingRequiredValue,
    /// The grammar rejected a token (unknown flag, unexpected argument,
    /// missing flag value) or a value failed coercion.
    UnknownFlagOrMalformedValue,
    /// The value type cannot be bound in this position (maps anywhere,
    /// booleans as positionals).
    UnsupportedType,
    /// `--help` was requested. The message is the rendered help.
    HelpRequested,
}

/// Command-line arguments are invalid.
///
/// The `Display` impl is the human-readable, usage-oriented message.
///
/// # Examples
///
/// ```
/// use caparg_core::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::MissingRequiredValue, "eat: missing --where");
/// assert_eq!(err.kind(), ParseErrorKind::MissingRequiredValue);
/// assert_eq!(err.to_string(), "eat: missing --where");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    kind: ParseErrorKind,
    message: String,
}

impl ParseError {
    /// Creates an error of `kind` with its display message.
    pub fn new(kind: ParseErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// What went wrong, for programmatic handling.
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// The human-readable message (same as `Display`).
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Structural defects in a command tree declaration.
///
/// These are programming errors; they are reported when a tree is compiled
/// into a [`Parser`](crate::Parser).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// Two nodes flatten to the same full command path.
    #[error("duplicate command path: {0}")]
    DuplicatePath(String),
    /// Two values share a command-line name in one command's effective set.
    #[error("duplicate value `{name}` for command: {path}")]
    DuplicateName { path: String, name: String },
    /// A value uses a name reserved by the parser.
    #[error("value name `{name}` is reserved (command: {path})")]
    ReservedName { path: String, name: String },
    /// A value name is empty or whitespace-only.
    #[error("value name cannot be empty (command: {0})")]
    EmptyName(String),
    /// A positional was declared with a default.
    #[error("positional `{0}` cannot have a default")]
    PositionalDefault(String),
    /// A required positional comes after an optional one.
    #[error("required positional `{name}` follows an optional positional (command: {path})")]
    RequiredAfterOptional { path: String, name: String },
    /// A positional comes after a list positional, which takes every
    /// remaining value.
    #[error("positional `{name}` follows list positional `{list}` (command: {path})")]
    PositionalAfterList {
        path: String,
        list: String,
        name: String,
    },
}
