//! Value binding: coercion plus required/default policy for one value.

use crate::declare::{Binding, BindingKind};
use crate::error::{ParseError, ParseErrorKind};
use crate::grammar::{RawValue, unsupported_type};
use crate::types::{CommandPath, Value, ValueType};

/// Coerces the raw record of one binding into its result value.
///
/// `Ok(None)` means the value was absent and produces no result entry.
/// Booleans are never absent.
pub fn bind(
    command: &CommandPath,
    binding: &Binding,
    raw: Option<&RawValue>,
) -> Result<Option<Value>, ParseError> {
    match (binding.kind, binding.spec.value_type) {
        (_, ValueType::Map) | (BindingKind::Positional, ValueType::Bool) => {
            Err(unsupported_type(&command.to_string(), binding))
        }
        (BindingKind::Flag, ValueType::Bool) => {
            Ok(Some(Value::Bool(matches!(raw, Some(RawValue::Flag(true))))))
        }
        (_, ValueType::String) => match last(raw) {
            Some(value) => Ok(Some(Value::String(value.to_string()))),
            None => absent(command, binding, || Value::String(String::new())),
        },
        (_, ValueType::Int) => match last(raw) {
            Some(value) => match value.trim().parse::<i64>() {
                Ok(n) => Ok(Some(Value::Int(n))),
                Err(_) => Err(ParseError::new(
                    ParseErrorKind::UnknownFlagOrMalformedValue,
                    format!(
                        "{command}: invalid value '{value}' for {}: expected an integer",
                        binding.display_name()
                    ),
                )),
            },
            None => absent(command, binding, || Value::Int(0)),
        },
        (_, ValueType::List) => match raw {
            Some(RawValue::Many(items)) if !items.is_empty() => {
                Ok(Some(Value::List(items.clone())))
            }
            Some(RawValue::Single(item)) => Ok(Some(Value::List(vec![item.clone()]))),
            _ => absent(command, binding, || Value::List(Vec::new())),
        },
    }
}

fn last(raw: Option<&RawValue>) -> Option<&str> {
    match raw? {
        RawValue::Single(value) => Some(value.as_str()),
        RawValue::Many(values) => values.last().map(String::as_str),
        RawValue::Flag(_) => None,
    }
}

fn absent(
    command: &CommandPath,
    binding: &Binding,
    empty: impl FnOnce() -> Value,
) -> Result<Option<Value>, ParseError> {
    let spec = &binding.spec;
    if spec.have_default && binding.kind == BindingKind::Flag {
        return Ok(Some(empty()));
    }
    if spec.required {
        return Err(ParseError::new(
            ParseErrorKind::MissingRequiredValue,
            format!(
                "{command}: missing required value for {}",
                binding.display_name()
            ),
        ));
    }
    Ok(None)
}
