//! Declaration validation.
//!
//! Catches structural defects in a flattened command tree before it is used
//! for dispatch: duplicate command paths, duplicate or reserved value names,
//! empty names, and positional layouts that cannot be bound unambiguously
//! (a required positional after an optional one, anything after a list).
//!
//! # Examples
//!
//! ```
//! use caparg_core::*;
//!
//! let tree = command("").with_subcommand(command("eat"));
//! assert!(validate_tree(&tree).is_empty());
//!
//! // Invalid: the same path declared twice
//! let bad = command("")
//!     .with_subcommand(command("remote add"))
//!     .with_subcommand(command("remote").with_subcommand(command("add")));
//! assert_eq!(
//!     validate_tree(&bad),
//!     vec![DeclarationError::DuplicatePath("remote add".into())]
//! );
//! ```

use std::collections::HashSet;

use crate::declare::{Binding, BindingKind, CommandNode};
use crate::error::DeclarationError;
use crate::types::{CommandPath, RESERVED_NAMES, ValueType};

/// Validates a whole declaration tree.
///
/// Returns every defect found; an empty vector means the tree can be
/// compiled.
pub fn validate_tree(root: &CommandNode) -> Vec<DeclarationError> {
    validate_flattened(&root.flatten())
}

pub(crate) fn validate_flattened(pairs: &[(CommandPath, Vec<Binding>)]) -> Vec<DeclarationError> {
    let mut errors = Vec::new();
    let mut seen_paths: HashSet<&CommandPath> = HashSet::new();

    for (path, bindings) in pairs {
        if !seen_paths.insert(path) {
            errors.push(DeclarationError::DuplicatePath(path.to_string()));
            continue;
        }
        errors.extend(validate_bindings(path, bindings));
        errors.extend(validate_positional_layout(path, bindings));
    }

    errors
}

fn validate_bindings(path: &CommandPath, bindings: &[Binding]) -> Vec<DeclarationError> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for binding in bindings {
        let name = binding.name();
        if name.trim().is_empty() {
            errors.push(DeclarationError::EmptyName(path.to_string()));
            continue;
        }

        if RESERVED_NAMES.contains(&name) {
            errors.push(DeclarationError::ReservedName {
                path: path.to_string(),
                name: name.to_string(),
            });
            continue;
        }

        // `a_b` and `a-b` collide on the command line.
        if !seen.insert(binding.cli_name()) {
            errors.push(DeclarationError::DuplicateName {
                path: path.to_string(),
                name: name.to_string(),
            });
        }
    }

    errors
}

fn validate_positional_layout(path: &CommandPath, bindings: &[Binding]) -> Vec<DeclarationError> {
    let mut errors = Vec::new();
    let mut seen_optional = false;
    let mut list: Option<&str> = None;

    for binding in bindings.iter().filter(|b| b.kind == BindingKind::Positional) {
        if let Some(list) = list {
            errors.push(DeclarationError::PositionalAfterList {
                path: path.to_string(),
                list: list.to_string(),
                name: binding.name().to_string(),
            });
        } else if binding.spec.required && seen_optional {
            errors.push(DeclarationError::RequiredAfterOptional {
                path: path.to_string(),
                name: binding.name().to_string(),
            });
        }

        seen_optional |= !binding.spec.required;
        if binding.spec.value_type == ValueType::List {
            list = Some(binding.name());
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use crate::*;

    use super::*;

    #[test]
    fn test_validate_accepts_inherited_tree() {
        let tree = command("")
            .with_options(options().with("config", option(ValueType::String)))
            .with_subcommand(command("remote").with_subcommand(command("remove")))
            .with_subcommand(command("remote add"));
        assert!(validate_tree(&tree).is_empty());
    }

    #[test]
    fn test_validate_rejects_duplicate_path() {
        let tree = command("")
            .with_subcommand(command("eat"))
            .with_subcommand(command("eat"));
        assert_eq!(
            validate_tree(&tree),
            vec![DeclarationError::DuplicatePath("eat".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_paths_equal_after_spelling() {
        let tree = command("")
            .with_subcommand(command("do_it"))
            .with_subcommand(command("do-it"));
        assert_eq!(
            validate_tree(&tree),
            vec![DeclarationError::DuplicatePath("do-it".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_inherited_name_clash() {
        let tree = command("")
            .with_options(options().with("name", option(ValueType::String)))
            .with_subcommand(command("add").with_option("name", option(ValueType::String)));
        assert_eq!(
            validate_tree(&tree),
            vec![DeclarationError::DuplicateName {
                path: "add".to_string(),
                name: "name".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_rejects_underscore_hyphen_clash() {
        let tree = command("").with_subcommand(
            command("eat")
                .with_option("good_thing", option(ValueType::String))
                .with_option("good-thing", option(ValueType::String)),
        );
        assert!(matches!(
            validate_tree(&tree).as_slice(),
            [DeclarationError::DuplicateName { .. }]
        ));
    }

    #[test]
    fn test_validate_rejects_reserved_name() {
        let tree = command("")
            .with_subcommand(command("eat").with_option(SUBCOMMAND_KEY, option(ValueType::String)));
        assert_eq!(
            validate_tree(&tree),
            vec![DeclarationError::ReservedName {
                path: "eat".to_string(),
                name: SUBCOMMAND_KEY.to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let tree = command("eat").with_option(" ", option(ValueType::Bool));
        assert_eq!(
            validate_tree(&tree),
            vec![DeclarationError::EmptyName("eat".to_string())]
        );
    }

    #[test]
    fn test_validate_rejects_required_after_inherited_optional_positional() {
        let tree = command("").with_subcommand(
            command("remote")
                .with_positional(positional("name", ValueType::String))
                .with_subcommand(
                    command("rename").with_positional(positional("to", ValueType::String).required()),
                ),
        );
        assert_eq!(
            validate_tree(&tree),
            vec![DeclarationError::RequiredAfterOptional {
                path: "remote rename".to_string(),
                name: "to".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_rejects_positional_after_list() {
        let tree = command("").with_subcommand(
            command("cp")
                .with_positional(positional("srcs", ValueType::List))
                .with_subcommand(command("x").with_positional(positional("dst", ValueType::String))),
        );
        assert_eq!(
            validate_tree(&tree),
            vec![DeclarationError::PositionalAfterList {
                path: "cp x".to_string(),
                list: "srcs".to_string(),
                name: "dst".to_string(),
            }]
        );
    }

    #[test]
    fn test_validate_accepts_required_then_optional_then_list() {
        let tree = command("").with_subcommand(
            command("remote")
                .with_positional(positional("name", ValueType::String).required())
                .with_subcommand(
                    command("add")
                        .with_positional(positional("url", ValueType::String))
                        .with_positional(positional("extra", ValueType::List)),
                ),
        );
        assert!(validate_tree(&tree).is_empty());
    }

    #[test]
    fn test_validate_reports_every_command() {
        let shared = options().with("x", option(ValueType::Bool));
        let tree = command("")
            .with_options(shared.clone())
            .with_subcommand(command("a").with_options(shared.clone()))
            .with_subcommand(command("b").with_options(shared));
        assert_eq!(validate_tree(&tree).len(), 2);
    }
}
