//! Declarative subcommand parsing with inherited options.
//!
//! This crate builds hierarchical command-line parsers from a tree of
//! declarations:
//!
//! - [`CommandNode`]: a command (or the anonymous root) with local options
//!   and ordered children.
//! - [`OptionSet`]: options inherited by the command that holds them and
//!   every descendant.
//! - [`PositionalSpec`]: a positional argument, also inherited.
//! - [`ValueSpec`]: type, required and default policy of a single value.
//!
//! The tree is flattened into a [`DispatchTable`] mapping every full command
//! path to its effective options. Parsing picks the longest declared path
//! that prefixes the tokens, hands the remaining tokens to an
//! [`ArgumentGrammar`] (by default [`ClapGrammar`]), and coerces the raw
//! values into an immutable [`ParseResult`]. Every runtime failure is a
//! [`ParseError`]; defects in the declaration are [`DeclarationError`]s.
//!
//! # Example
//!
//! ```
//! use caparg_core::*;
//!
//! let tree = command("")
//!     // Inherited by every subcommand.
//!     .with_options(options().with("config", option(ValueType::String).have_default()))
//!     .with_subcommand(
//!         command("remote")
//!             .with_options(options().with("verbose", option(ValueType::Bool)))
//!             .with_subcommand(command("remove").with_positional(positional("name", ValueType::String))),
//!     )
//!     // Multi-word paths are the same as nesting.
//!     .with_subcommand(command("remote add").with_option("good_thing", option(ValueType::String)));
//!
//! let parser = Parser::new(&tree).unwrap();
//! let parsed = parser.parse(["remote", "add", "--good-thing", "stuff"]).unwrap();
//! assert_eq!(parsed.subcommand().to_string(), "remote add");
//! assert_eq!(parsed.get_str("good_thing"), Some("stuff"));
//! assert_eq!(parsed.get_str("config"), Some(""));
//!
//! let parsed = parser.parse(["remote", "remove", "origin", "--verbose"]).unwrap();
//! assert_eq!(parsed.get_str("name"), Some("origin"));
//! assert_eq!(parsed.get_bool("verbose"), Some(true));
//! ```

mod bind;
mod declare;
mod dispatch;
mod error;
mod flatten;
mod grammar;
mod parser;
mod types;
mod validate;

pub use declare::{
    Binding, BindingKind, CommandNode, Node, OptionSet, PositionalSpec, command, option, options,
    positional,
};
pub use dispatch::{DispatchTable, EffectiveOptions, Resolution};
pub use error::{DeclarationError, ParseError, ParseErrorKind};
pub use grammar::{ArgumentGrammar, ClapGrammar, RawValue, RawValues};
pub use parser::{ParseResult, Parser};
pub use types::{CommandPath, SUBCOMMAND_KEY, Value, ValueSpec, ValueType, cli_spelling};
pub use validate::validate_tree;
