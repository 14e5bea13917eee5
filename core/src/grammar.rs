//! Token-level argument grammar.
//!
//! Once a subcommand is resolved, the remaining tokens are handed to an
//! [`ArgumentGrammar`]: every binding of the effective set is registered with
//! [`add_argument`](ArgumentGrammar::add_argument), then
//! [`parse`](ArgumentGrammar::parse) extracts a [`RawValues`] record that the
//! value binders coerce. [`ClapGrammar`] is the default implementation.

use std::collections::BTreeMap;

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};

use crate::declare::{Binding, BindingKind};
use crate::error::{ParseError, ParseErrorKind};
use crate::types::{CommandPath, ValueType};

/// Raw, uncoerced value extracted for one binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A boolean flag; `true` when present.
    Flag(bool),
    /// The last value given for a single-valued binding.
    Single(String),
    /// Every value given, in encounter order.
    Many(Vec<String>),
}

/// Raw values keyed by declared name. Absent bindings have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawValues {
    values: BTreeMap<String, RawValue>,
}

impl RawValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&RawValue> {
        self.values.get(name)
    }
}

/// The flag/positional grammar applied to the tokens after the subcommand.
///
/// Implementations report failures as [`ParseError`]s scoped to the command
/// they were created for; they must not print or exit.
pub trait ArgumentGrammar {
    /// Registers one binding of the resolved command.
    fn add_argument(&mut self, binding: &Binding) -> Result<(), ParseError>;

    /// Extracts raw values from `tokens`.
    fn parse(self, tokens: &[String]) -> Result<RawValues, ParseError>;
}

#[derive(Debug, Clone, Copy)]
enum Shape {
    Flag,
    Single,
    Many,
}

/// [`ArgumentGrammar`] backed by `clap`'s builder API.
///
/// Flags are `--name value` (`--name` for booleans), repeated scalar flags
/// keep the last value, positionals bind in registration order. `-h` and
/// `--help` produce a [`ParseErrorKind::HelpRequested`] error.
#[derive(Debug)]
pub struct ClapGrammar {
    program: String,
    args: Vec<Arg>,
    shapes: Vec<(String, Shape)>,
}

impl ClapGrammar {
    /// Creates an empty grammar for the command at `path`.
    pub fn new(path: &CommandPath) -> Self {
        Self {
            program: path.to_string(),
            args: Vec::new(),
            shapes: Vec::new(),
        }
    }
}

impl ArgumentGrammar for ClapGrammar {
    fn add_argument(&mut self, binding: &Binding) -> Result<(), ParseError> {
        let spec = &binding.spec;
        let required = spec.required && !spec.have_default;
        let arg = Arg::new(binding.name().to_string())
            .allow_negative_numbers(spec.value_type == ValueType::Int);

        let (arg, shape) = match (binding.kind, spec.value_type) {
            (BindingKind::Flag, ValueType::Bool) => (
                arg.long(binding.cli_name()).action(ArgAction::SetTrue),
                Shape::Flag,
            ),
            (BindingKind::Flag, ValueType::String | ValueType::Int) => (
                arg.long(binding.cli_name())
                    .action(ArgAction::Set)
                    .required(required),
                Shape::Single,
            ),
            (BindingKind::Flag, ValueType::List) => (
                arg.long(binding.cli_name())
                    .action(ArgAction::Append)
                    .required(required),
                Shape::Many,
            ),
            (BindingKind::Positional, ValueType::String | ValueType::Int) => (
                arg.action(ArgAction::Set).required(required),
                Shape::Single,
            ),
            (BindingKind::Positional, ValueType::List) => (
                arg.action(ArgAction::Append)
                    .num_args(1..)
                    .required(required),
                Shape::Many,
            ),
            (_, ValueType::Map) | (BindingKind::Positional, ValueType::Bool) => {
                return Err(unsupported_type(&self.program, binding));
            }
        };

        self.args.push(arg);
        self.shapes.push((binding.name().to_string(), shape));
        Ok(())
    }

    fn parse(self, tokens: &[String]) -> Result<RawValues, ParseError> {
        let matches = Command::new(self.program)
            .no_binary_name(true)
            .args_override_self(true)
            .color(ColorChoice::Never)
            .args(self.args)
            .try_get_matches_from(tokens)
            .map_err(grammar_error)?;

        let mut raw = RawValues::new();
        for (name, shape) in self.shapes {
            if let Some(value) = extract(&matches, &name, shape) {
                raw.insert(name, value);
            }
        }
        Ok(raw)
    }
}

fn extract(matches: &ArgMatches, name: &str, shape: Shape) -> Option<RawValue> {
    match shape {
        Shape::Flag => Some(RawValue::Flag(matches.get_flag(name))),
        Shape::Single => matches
            .get_one::<String>(name)
            .map(|value| RawValue::Single(value.clone())),
        Shape::Many => matches
            .get_many::<String>(name)
            .map(|values| RawValue::Many(values.cloned().collect())),
    }
}

pub(crate) fn unsupported_type(command: &str, binding: &Binding) -> ParseError {
    let position = match binding.kind {
        BindingKind::Flag => "option",
        BindingKind::Positional => "positional",
    };
    ParseError::new(
        ParseErrorKind::UnsupportedType,
        format!(
            "{command}: {position} {} has unsupported type `{}`",
            binding.display_name(),
            binding.spec.value_type
        ),
    )
}

fn grammar_error(err: clap::Error) -> ParseError {
    let kind = match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            ParseErrorKind::HelpRequested
        }
        ErrorKind::MissingRequiredArgument => ParseErrorKind::MissingRequiredValue,
        _ => ParseErrorKind::UnknownFlagOrMalformedValue,
    };
    ParseError::new(kind, err.to_string().trim_end())
}
