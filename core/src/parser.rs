//! Parse entry points and the parse result.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::trace;

use crate::bind::bind;
use crate::declare::CommandNode;
use crate::dispatch::DispatchTable;
use crate::error::{DeclarationError, ParseError};
use crate::grammar::{ArgumentGrammar, ClapGrammar};
use crate::types::{CommandPath, SUBCOMMAND_KEY, Value};

/// Immutable outcome of a successful parse.
///
/// Serializes as a flat map: every bound value under its declared name plus
/// the matched path under [`SUBCOMMAND_KEY`].
///
/// # Examples
///
/// ```
/// use caparg_core::*;
///
/// let tree = command("").with_subcommand(
///     command("eat").with_option("what", option(ValueType::List)),
/// );
/// let parsed = tree.parse(["eat", "--what", "rice", "--what", "beans"]).unwrap();
///
/// assert_eq!(parsed.subcommand().segments(), ["eat"]);
/// assert_eq!(parsed.get_list("what"), Some(&["rice".to_string(), "beans".to_string()][..]));
/// assert_eq!(
///     serde_json::to_string(&parsed).unwrap(),
///     r#"{"__caparg_subcommand__":["eat"],"what":["rice","beans"]}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult {
    #[serde(rename = "__caparg_subcommand__")]
    subcommand: CommandPath,
    #[serde(flatten)]
    values: BTreeMap<String, Value>,
}

impl ParseResult {
    /// The matched command path, as typed on the command line.
    pub fn subcommand(&self) -> &CommandPath {
        &self.subcommand
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }

    /// `true` for [`SUBCOMMAND_KEY`] and every bound value.
    pub fn contains_key(&self, name: &str) -> bool {
        name == SUBCOMMAND_KEY || self.values.contains_key(name)
    }

    /// Bound values in name order, without the subcommand path.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of bound values, without the subcommand path.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A compiled command tree.
///
/// Compiling flattens and validates the tree once; the parser is immutable
/// and may be shared between threads.
///
/// # Examples
///
/// ```
/// use caparg_core::*;
///
/// let tree = command("")
///     .with_options(options().with("where", option(ValueType::String)))
///     .with_subcommand(command("eat").with_subcommand(command("lunch")));
/// let parser = Parser::new(&tree).unwrap();
///
/// let parsed = parser.parse(["eat", "lunch", "--where", "cafe"]).unwrap();
/// assert_eq!(parsed.subcommand().segments(), ["eat", "lunch"]);
/// assert_eq!(parsed.get_str("where"), Some("cafe"));
///
/// let err = parser.parse(["drink"]).unwrap_err();
/// assert_eq!(err.kind(), ParseErrorKind::NoMatchingCommand);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parser {
    table: DispatchTable,
}

impl Parser {
    /// Compiles `root` into a dispatch table.
    ///
    /// # Errors
    ///
    /// Returns a [`DeclarationError`] for structural defects in the tree.
    pub fn new(root: &CommandNode) -> Result<Self, DeclarationError> {
        Ok(Self {
            table: DispatchTable::build(root)?,
        })
    }

    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    /// Every dispatchable command path, in usage order.
    pub fn paths(&self) -> impl Iterator<Item = &CommandPath> {
        self.table.paths()
    }

    /// Usage text listing every command path.
    pub fn usage(&self) -> String {
        self.table.usage()
    }

    /// Parses `tokens` (without the program name) using [`ClapGrammar`].
    pub fn parse<I, S>(&self, tokens: I) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse_with(tokens, ClapGrammar::new)
    }

    /// Parses `tokens` with a grammar created for the resolved command path.
    pub fn parse_with<I, S, G, F>(&self, tokens: I, grammar: F) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        G: ArgumentGrammar,
        F: FnOnce(&CommandPath) -> G,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        let resolved = self.table.resolve(&tokens)?;

        let mut grammar = grammar(resolved.path);
        for binding in resolved.options.iter() {
            grammar.add_argument(binding)?;
        }
        let raw = grammar.parse(resolved.rest)?;

        let mut values = BTreeMap::new();
        for binding in resolved.options.iter() {
            if let Some(value) = bind(resolved.path, binding, raw.get(binding.name()))? {
                trace!(name = binding.name(), ?value, "bound value");
                values.insert(binding.name().to_string(), value);
            }
        }

        Ok(ParseResult {
            subcommand: resolved.path.clone(),
            values,
        })
    }
}

impl CommandNode {
    /// Compiles this tree and parses `tokens` with it.
    ///
    /// Use [`Parser`] to compile once and parse many times.
    ///
    /// # Panics
    ///
    /// Panics if the declaration is invalid (see [`validate_tree`](crate::validate_tree)).
    /// That is a defect in the program, not in its input.
    pub fn parse<I, S>(&self, tokens: I) -> Result<ParseResult, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match Parser::new(self) {
            Ok(parser) => parser.parse(tokens),
            Err(err) => panic!("invalid command declaration: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    /// Grammar that binds `name=value` tokens and `name` flags.
    struct KeyValueGrammar {
        names: Vec<String>,
    }

    impl ArgumentGrammar for KeyValueGrammar {
        fn add_argument(&mut self, binding: &Binding) -> Result<(), ParseError> {
            self.names.push(binding.name().to_string());
            Ok(())
        }

        fn parse(self, tokens: &[String]) -> Result<RawValues, ParseError> {
            let mut raw = RawValues::new();
            for token in tokens {
                let (name, value) = match token.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (token.as_str(), None),
                };
                if !self.names.iter().any(|n| n == name) {
                    return Err(ParseError::new(
                        ParseErrorKind::UnknownFlagOrMalformedValue,
                        format!("unknown key {name}"),
                    ));
                }
                let value = match value {
                    Some(value) => RawValue::Single(value.to_string()),
                    None => RawValue::Flag(true),
                };
                raw.insert(name, value);
            }
            Ok(raw)
        }
    }

    fn key_value(_: &CommandPath) -> KeyValueGrammar {
        KeyValueGrammar { names: Vec::new() }
    }

    fn tree() -> CommandNode {
        command("")
            .with_options(options().with("where", option(ValueType::String)))
            .with_subcommand(
                command("eat")
                    .with_option("alot", option(ValueType::Bool))
                    .with_option("uid", option(ValueType::Int)),
            )
    }

    #[test]
    fn test_parse_with_custom_grammar() {
        let parser = Parser::new(&tree()).unwrap();
        let parsed = parser
            .parse_with(["eat", "where=cafe", "alot", "uid=7"], key_value)
            .unwrap();
        assert_eq!(parsed.get_str("where"), Some("cafe"));
        assert_eq!(parsed.get_bool("alot"), Some(true));
        assert_eq!(parsed.get_int("uid"), Some(7));
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn test_custom_grammar_errors_pass_through() {
        let parser = Parser::new(&tree()).unwrap();
        let err = parser.parse_with(["eat", "nope=1"], key_value).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnknownFlagOrMalformedValue);
        assert_eq!(err.message(), "unknown key nope");
    }

    #[test]
    fn test_int_coercion_failure_through_parse() {
        let parser = Parser::new(&tree()).unwrap();
        let err = parser.parse(["eat", "--uid", "lots"]).unwrap_err();
        assert_eq!(err.kind(), ParseErrorKind::UnknownFlagOrMalformedValue);
        assert!(err.message().starts_with("eat: invalid value 'lots' for --uid"));
    }

    #[test]
    fn test_contains_reserved_key() {
        let parsed = tree().parse(["eat"]).unwrap();
        assert!(parsed.contains_key(SUBCOMMAND_KEY));
        assert!(parsed.contains_key("alot"));
        assert!(!parsed.contains_key("where"));
    }

    #[test]
    fn test_parser_usage() {
        let parser = Parser::new(&tree()).unwrap();
        assert_eq!(parser.usage(), "Usage:\n    eat\n");
        assert_eq!(parser.table().len(), 1);
        let paths: Vec<String> = parser.paths().map(ToString::to_string).collect();
        assert_eq!(paths, ["eat"]);
    }

    #[test]
    #[should_panic(expected = "invalid command declaration: duplicate command path: eat")]
    fn test_parse_panics_on_invalid_declaration() {
        let tree = command("")
            .with_subcommand(command("eat"))
            .with_subcommand(command("eat"));
        let _ = tree.parse(["eat"]);
    }

    #[test]
    fn test_parser_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Parser>();
        assert_send_sync::<CommandNode>();
    }
}
