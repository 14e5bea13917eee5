//! Declaration tree: commands, option sets and positionals.
//!
//! A tree is built once with the builder methods (or deserialized) and is an
//! immutable value afterwards. Option sets and positionals placed among a
//! command's children are inherited by every descendant command; options
//! added with [`CommandNode::with_option`] belong to that command only.
//!
//! # Example
//!
//! ```
//! use caparg_core::*;
//!
//! let tree = command("")
//!     .with_options(options().with("config", option(ValueType::String).required()))
//!     .with_subcommand(command("remote").with_subcommand(
//!         command("add")
//!             .with_positional(positional("name", ValueType::String).required())
//!             .with_positional(positional("url", ValueType::String).required()),
//!     ));
//!
//! let parsed = tree
//!     .parse(["remote", "add", "origin", "https://example.com", "--config", "c.yml"])
//!     .unwrap();
//! assert_eq!(parsed.subcommand().segments(), ["remote", "add"]);
//! assert_eq!(parsed.get_str("url"), Some("https://example.com"));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::DeclarationError;
use crate::types::{CommandPath, ValueSpec, ValueType, cli_spelling};

/// An ordered collection of named options.
///
/// Order is kept only so that help and usage rendering is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    options: Vec<ValueSpec>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an option under `name`.
    pub fn with(mut self, name: impl Into<String>, spec: ValueSpec) -> Self {
        self.options.push(spec.named(name));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValueSpec> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// A value bound by position rather than by flag.
///
/// Positionals never carry defaults; converting a [`ValueSpec`] that asks for
/// one fails.
///
/// # Examples
///
/// ```
/// use caparg_core::{DeclarationError, PositionalSpec, ValueSpec, ValueType};
///
/// let spec = ValueSpec::new(ValueType::String).have_default().named("name");
/// assert_eq!(
///     PositionalSpec::try_from(spec),
///     Err(DeclarationError::PositionalDefault("name".into()))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ValueSpec", into = "ValueSpec")]
pub struct PositionalSpec(ValueSpec);

impl PositionalSpec {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self(ValueSpec::new(value_type).named(name))
    }

    /// Marks the positional as required.
    pub fn required(self) -> Self {
        Self(self.0.required())
    }

    pub fn spec(&self) -> &ValueSpec {
        &self.0
    }
}

impl TryFrom<ValueSpec> for PositionalSpec {
    type Error = DeclarationError;

    fn try_from(spec: ValueSpec) -> Result<Self, Self::Error> {
        if spec.have_default {
            return Err(DeclarationError::PositionalDefault(spec.name));
        }
        Ok(Self(spec))
    }
}

impl From<PositionalSpec> for ValueSpec {
    fn from(positional: PositionalSpec) -> Self {
        positional.0
    }
}

/// Child of a [`CommandNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Command(CommandNode),
    Options(OptionSet),
    Positional(PositionalSpec),
}

impl From<CommandNode> for Node {
    fn from(node: CommandNode) -> Self {
        Node::Command(node)
    }
}

impl From<OptionSet> for Node {
    fn from(set: OptionSet) -> Self {
        Node::Options(set)
    }
}

impl From<PositionalSpec> for Node {
    fn from(positional: PositionalSpec) -> Self {
        Node::Positional(positional)
    }
}

/// How a value is supplied on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `--name value`, `--name` for booleans.
    Flag,
    /// Bound by position, in declaration order.
    Positional,
}

/// A value spec as it appears in a command's effective option set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub kind: BindingKind,
    pub spec: ValueSpec,
}

impl Binding {
    pub fn flag(spec: ValueSpec) -> Self {
        Self {
            kind: BindingKind::Flag,
            spec,
        }
    }

    pub fn positional(spec: ValueSpec) -> Self {
        Self {
            kind: BindingKind::Positional,
            spec,
        }
    }

    /// Declared name; the key used in the parse result.
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    /// Name as typed on the command line (`good_thing` -> `good-thing`).
    pub fn cli_name(&self) -> String {
        cli_spelling(&self.spec.name)
    }

    /// `--good-thing` for flags, `<name>` for positionals.
    pub fn display_name(&self) -> String {
        match self.kind {
            BindingKind::Flag => format!("--{}", self.cli_name()),
            BindingKind::Positional => format!("<{}>", self.spec.name),
        }
    }
}

/// A command (or the anonymous root) and its children.
///
/// # Examples
///
/// ```
/// use caparg_core::*;
///
/// let eat = command("eat").with_option("what", option(ValueType::String));
/// let drink = eat.rename("drink");
/// assert_eq!(drink.path.to_string(), "drink");
/// assert_eq!(drink.options, eat.options);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandNode {
    /// Path segments this node adds to its parent's path.
    #[serde(default)]
    pub path: CommandPath,
    /// Options of this command alone; not inherited by subcommands. On a
    /// node without a path they apply to every descendant instead.
    #[serde(default, skip_serializing_if = "OptionSet::is_empty")]
    pub options: OptionSet,
    /// Subcommands plus inherited option sets and positionals, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl CommandNode {
    /// Creates a node; whitespace in `path` separates segments.
    pub fn new(path: &str) -> Self {
        Self {
            path: CommandPath::from(path),
            ..Default::default()
        }
    }

    /// The anonymous root. It is never dispatchable itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Adds an option to this command only.
    pub fn with_option(mut self, name: impl Into<String>, spec: ValueSpec) -> Self {
        self.options = self.options.with(name, spec);
        self
    }

    /// Adds options inherited by this command and every descendant.
    pub fn with_options(self, set: OptionSet) -> Self {
        self.with_child(set)
    }

    /// Adds a positional inherited by this command and every descendant.
    pub fn with_positional(self, positional: PositionalSpec) -> Self {
        self.with_child(positional)
    }

    pub fn with_subcommand(self, sub: CommandNode) -> Self {
        self.with_child(sub)
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Returns a copy of this command under a different path.
    pub fn rename(&self, path: &str) -> Self {
        Self {
            path: CommandPath::from(path),
            ..self.clone()
        }
    }
}

/// A command (or subcommand). Pass `""` for the anonymous root.
pub fn command(path: &str) -> CommandNode {
    CommandNode::new(path)
}

/// An empty set of inheritable options.
pub fn options() -> OptionSet {
    OptionSet::new()
}

/// An option of the given type; it receives its name from the set or command
/// it is added to.
pub fn option(value_type: ValueType) -> ValueSpec {
    ValueSpec::new(value_type)
}

/// A positional argument.
pub fn positional(name: impl Into<String>, value_type: ValueType) -> PositionalSpec {
    PositionalSpec::new(name, value_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_set_names_specs_in_order() {
        let set = options()
            .with("messages", option(ValueType::String).required())
            .with("config", option(ValueType::String));
        let names: Vec<&str> = set.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["messages", "config"]);
        assert!(set.iter().next().unwrap().required);
    }

    #[test]
    fn test_children_keep_declaration_order() {
        let node = command("remote")
            .with_subcommand(command("remove"))
            .with_options(options().with("verbose", option(ValueType::Bool)))
            .with_positional(positional("name", ValueType::String));
        assert!(matches!(node.children[0], Node::Command(_)));
        assert!(matches!(node.children[1], Node::Options(_)));
        assert!(matches!(node.children[2], Node::Positional(_)));
    }

    #[test]
    fn test_multi_word_path() {
        assert_eq!(command("remote add").path.segments(), ["remote", "add"]);
        assert!(command("").path.is_empty());
        assert_eq!(command(""), CommandNode::root());
    }

    #[test]
    fn test_binding_names() {
        let flag = Binding::flag(option(ValueType::String).named("good_thing"));
        assert_eq!(flag.name(), "good_thing");
        assert_eq!(flag.display_name(), "--good-thing");
        let pos = Binding::positional(positional("url", ValueType::String).spec().clone());
        assert_eq!(pos.display_name(), "<url>");
    }

    #[test]
    fn test_positional_default_rejected_on_deserialize() {
        let json = r#"{"positional": {"name": "name", "type": "string", "have_default": true}}"#;
        let err = serde_json::from_str::<Node>(json).unwrap_err();
        assert!(err.to_string().contains("cannot have a default"));
    }

    #[test]
    fn test_tree_deserializes() {
        let json = r#"{
            "children": [
                {"options": [{"name": "where", "type": "string"}]},
                {"command": {"path": "eat", "children": [{"command": {"path": "lunch"}}]}}
            ]
        }"#;
        let tree: CommandNode = serde_json::from_str(json).unwrap();
        let expected = command("")
            .with_options(options().with("where", option(ValueType::String)))
            .with_subcommand(command("eat").with_subcommand(command("lunch")));
        assert_eq!(tree, expected);
    }
}
