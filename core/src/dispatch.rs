//! Dispatch table and longest-prefix subcommand resolution.

use std::collections::BTreeMap;

use tracing::debug;

use crate::declare::{Binding, CommandNode};
use crate::error::{DeclarationError, ParseError, ParseErrorKind};
use crate::types::CommandPath;
use crate::validate::validate_flattened;

/// Every binding valid at one command path: inherited ones first, in
/// declaration order, then the command's own options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveOptions(Vec<Binding>);

impl EffectiveOptions {
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.0.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.0.iter().find(|b| b.name() == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Immutable mapping from full command path to effective options.
///
/// # Examples
///
/// ```
/// use caparg_core::*;
///
/// let tree = command("")
///     .with_subcommand(command("remote").with_subcommand(command("remove")))
///     .with_subcommand(command("remote add"));
/// let table = DispatchTable::build(&tree).unwrap();
///
/// let tokens: Vec<String> = ["remote", "add", "origin"].map(String::from).to_vec();
/// let resolved = table.resolve(&tokens).unwrap();
/// assert_eq!(resolved.path.to_string(), "remote add");
/// assert_eq!(resolved.rest, ["origin"]);
///
/// assert_eq!(table.usage(), "Usage:\n    remote\n    remote add\n    remote remove\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchTable {
    entries: BTreeMap<CommandPath, EffectiveOptions>,
}

/// Outcome of [`DispatchTable::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution<'a, 't> {
    /// The longest declared path prefixing the tokens.
    pub path: &'a CommandPath,
    pub options: &'a EffectiveOptions,
    /// Tokens after the matched path.
    pub rest: &'t [String],
}

impl DispatchTable {
    /// Flattens and validates `root`.
    ///
    /// # Errors
    ///
    /// Returns the first [`DeclarationError`] found by validation.
    pub fn build(root: &CommandNode) -> Result<Self, DeclarationError> {
        let pairs = root.flatten();
        if let Some(err) = validate_flattened(&pairs).into_iter().next() {
            return Err(err);
        }

        let entries: BTreeMap<_, _> = pairs
            .into_iter()
            .map(|(path, bindings)| (path, EffectiveOptions(bindings)))
            .collect();
        debug!(commands = entries.len(), "built dispatch table");
        Ok(Self { entries })
    }

    pub fn get(&self, path: &[String]) -> Option<&EffectiveOptions> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Command paths in lexicographic order.
    pub fn paths(&self) -> impl Iterator<Item = &CommandPath> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CommandPath, &EffectiveOptions)> {
        self.entries.iter()
    }

    /// Picks the most specific command named by a prefix of `tokens`.
    ///
    /// # Errors
    ///
    /// [`ParseErrorKind::NoMatchingCommand`] with the [`usage`](Self::usage)
    /// text when no prefix (of at least one token) is a declared path.
    pub fn resolve<'a, 't>(&'a self, tokens: &'t [String]) -> Result<Resolution<'a, 't>, ParseError> {
        let matched = (1..=tokens.len()).rev().find_map(|len| {
            self.entries
                .get_key_value(&tokens[..len])
                .map(|(path, options)| (len, path, options))
        });

        match matched {
            Some((len, path, options)) => {
                debug!(path = %path, remaining = tokens.len() - len, "resolved subcommand");
                Ok(Resolution {
                    path,
                    options,
                    rest: &tokens[len..],
                })
            }
            None => {
                debug!(tokens = tokens.len(), "no subcommand matched");
                Err(ParseError::new(ParseErrorKind::NoMatchingCommand, self.usage()))
            }
        }
    }

    /// Lists every command path, one per indented line.
    pub fn usage(&self) -> String {
        let mut usage = String::from("Usage:\n");
        for path in self.paths() {
            usage.push_str("    ");
            usage.push_str(&path.to_string());
            usage.push('\n');
        }
        usage
    }
}
