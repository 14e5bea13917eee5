//! Value and path types shared by declaration, dispatch and binding.
//!
//! These types are designed for serialization with [`serde`] so a command
//! tree can be loaded from JSON or YAML and a parse result can be emitted in
//! the same formats.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved result key holding the matched subcommand path.
///
/// No declared option or positional may use this name.
pub const SUBCOMMAND_KEY: &str = "__caparg_subcommand__";

/// Value names that cannot be declared by users.
pub(crate) const RESERVED_NAMES: &[&str] = &[SUBCOMMAND_KEY, "help"];

/// Rewrites a declared name into its command-line spelling.
///
/// # Examples
///
/// ```
/// assert_eq!(caparg_core::cli_spelling("good_thing"), "good-thing");
/// assert_eq!(caparg_core::cli_spelling("plain"), "plain");
/// ```
pub fn cli_spelling(name: &str) -> String {
    name.replace('_', "-")
}

/// Type tag for a declared value.
///
/// # Examples
///
/// ```
/// use caparg_core::ValueType;
///
/// let vt: ValueType = serde_json::from_str("\"list\"").unwrap();
/// assert_eq!(vt, ValueType::List);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Single string value.
    String,
    /// Presence flag (no value).
    Bool,
    /// Signed integer.
    Int,
    /// Repeated string values, kept in encounter order.
    List,
    /// String to string mapping. Declarable, but not bindable.
    Map,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::List => "list",
            ValueType::Map => "map",
        };
        f.write_str(name)
    }
}

/// Declaration of a single named value (option or positional).
///
/// Options are usually created nameless through [`option`](crate::option)
/// and receive their name when added to an [`OptionSet`](crate::OptionSet).
///
/// # Examples
///
/// ```
/// use caparg_core::{ValueSpec, ValueType};
///
/// let spec = ValueSpec::new(ValueType::String).required().named("where");
/// assert_eq!(spec.name, "where");
/// assert!(spec.required);
/// assert!(!spec.have_default);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueSpec {
    /// Declared name; result key and (hyphenated) flag name.
    #[serde(default)]
    pub name: String,
    /// Coercion applied to the raw value.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Absence is an error.
    #[serde(default)]
    pub required: bool,
    /// Absence produces the type's empty value.
    #[serde(default)]
    pub have_default: bool,
}

impl ValueSpec {
    /// Creates an optional, default-less spec without a name.
    pub fn new(value_type: ValueType) -> Self {
        Self {
            name: String::new(),
            value_type,
            required: false,
            have_default: false,
        }
    }

    /// Marks the value as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Substitutes the type's empty value when absent.
    pub fn have_default(mut self) -> Self {
        self.have_default = true;
        self
    }

    /// Sets the name.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Ordered sequence of path segments identifying a command.
///
/// Declared from a whitespace-separated string (`"remote add"`) or from a
/// list of segments. Ordering is lexicographic by segment sequence, which is
/// also the order usage text lists commands in.
///
/// # Examples
///
/// ```
/// use caparg_core::CommandPath;
///
/// let path = CommandPath::from("remote  add");
/// assert_eq!(path.segments(), ["remote", "add"]);
/// assert_eq!(path.to_string(), "remote add");
/// assert!(CommandPath::from("").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "PathRepr")]
pub struct CommandPath(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum PathRepr {
    Words(String),
    Segments(Vec<String>),
}

impl From<PathRepr> for CommandPath {
    fn from(repr: PathRepr) -> Self {
        match repr {
            PathRepr::Words(words) => CommandPath::from(words.as_str()),
            PathRepr::Segments(segments) => segments.into_iter().collect(),
        }
    }
}

impl CommandPath {
    /// Returns the segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for the anonymous root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `self` followed by every segment of `suffix`.
    pub fn join(&self, suffix: &CommandPath) -> CommandPath {
        self.0.iter().chain(suffix.0.iter()).cloned().collect()
    }

    /// Returns the path as typed on the command line (see [`cli_spelling`]).
    pub fn cli_spelling(&self) -> CommandPath {
        self.0.iter().map(|s| cli_spelling(s)).collect()
    }
}

impl From<&str> for CommandPath {
    fn from(words: &str) -> Self {
        words.split_whitespace().map(String::from).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for CommandPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        CommandPath(
            iter.into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.trim().is_empty())
                .collect(),
        )
    }
}

impl Borrow<[String]> for CommandPath {
    fn borrow(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

/// A bound, coerced value in a [`ParseResult`](crate::ParseResult).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A string value.
    String(String),
    /// A boolean flag; `false` when absent.
    Bool(bool),
    /// A signed integer.
    Int(i64),
    /// Repeated values in encounter order.
    List(Vec<String>),
}

impl Value {
    /// Returns the string, if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the flag, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer, if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the items, if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}
