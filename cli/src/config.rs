//! Command tree declarations loaded from YAML or JSON files.
//!
//! # Example YAML
//!
//! ```yaml
//! children:
//!   - options:
//!       - { name: config, type: string, required: true }
//!   - command:
//!       path: remote
//!       options:
//!         - { name: verbose, type: bool }
//!       children:
//!         - command:
//!             path: add
//!             children:
//!               - positional: { name: name, type: string, required: true }
//!               - positional: { name: url, type: string }
//! ```
//!
//! `path` may be a whitespace-separated string or a list of segments.

use std::fs;
use std::path::Path;

use caparg_core::CommandNode;
use tracing::debug;

use crate::error::Result;

/// Serialization format of a declaration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    Json,
    Yaml,
}

impl DeclarationFormat {
    /// `.json` files are JSON; everything else is read as YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Loads a command tree from `path`.
///
/// # Errors
///
/// Returns [`IoError`](crate::error::CliError::IoError) if the file cannot
/// be read, or a JSON/YAML error if it does not describe a command tree.
pub fn load_tree(path: &Path) -> Result<CommandNode> {
    let raw = fs::read_to_string(path)?;
    let format = DeclarationFormat::from_path(path);
    debug!(path = %path.display(), ?format, "loading declaration");
    parse_tree(&raw, format)
}

/// Parses a command tree from a string.
pub fn parse_tree(raw: &str, format: DeclarationFormat) -> Result<CommandNode> {
    let tree = match format {
        DeclarationFormat::Json => serde_json::from_str(raw)?,
        // YAML goes through a JSON value so variants are read from
        // single-key maps (`- command: {...}`) rather than YAML tags.
        DeclarationFormat::Yaml => {
            let value: serde_json::Value = serde_yaml::from_str(raw)?;
            serde_json::from_value(value)?
        }
    };
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use caparg_core::*;

    use super::*;
    use crate::error::CliError;

    fn sample_yaml() -> &'static str {
        r#"
children:
  - options:
      - name: config
        type: string
        required: true
  - command:
      path: remote
      options:
        - name: verbose
          type: bool
      children:
        - command:
            path: add
            children:
              - positional:
                  name: name
                  type: string
                  required: true
              - positional:
                  name: url
                  type: string
"#
    }

    fn sample_tree() -> CommandNode {
        command("")
            .with_options(options().with("config", option(ValueType::String).required()))
            .with_subcommand(
                command("remote")
                    .with_option("verbose", option(ValueType::Bool))
                    .with_subcommand(
                        command("add")
                            .with_positional(positional("name", ValueType::String).required())
                            .with_positional(positional("url", ValueType::String)),
                    ),
            )
    }

    #[test]
    fn test_parse_yaml() {
        let tree = parse_tree(sample_yaml(), DeclarationFormat::Yaml).unwrap();
        assert_eq!(tree, sample_tree());
    }

    #[test]
    fn test_parse_json() {
        let raw = serde_json::to_string(&sample_tree()).unwrap();
        let tree = parse_tree(&raw, DeclarationFormat::Json).unwrap();
        assert_eq!(tree, sample_tree());
    }

    #[test]
    fn test_path_as_segment_list() {
        let yaml = "children:\n  - command:\n      path: [remote, add]\n";
        let tree = parse_tree(yaml, DeclarationFormat::Yaml).unwrap();
        assert_eq!(tree, command("").with_subcommand(command("remote add")));
    }

    #[test]
    fn test_positional_default_is_rejected() {
        let yaml = r#"
children:
  - positional:
      name: name
      type: string
      have_default: true
"#;
        let err = parse_tree(yaml, DeclarationFormat::Yaml).unwrap_err();
        assert!(matches!(err, CliError::JsonError(_)));
        assert!(err.to_string().contains("cannot have a default"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let yaml = "options:\n  - name: x\n    type: float\n";
        assert!(parse_tree(yaml, DeclarationFormat::Yaml).is_err());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DeclarationFormat::from_path(Path::new("tree.JSON")),
            DeclarationFormat::Json
        );
        assert_eq!(
            DeclarationFormat::from_path(Path::new("tree.yml")),
            DeclarationFormat::Yaml
        );
        assert_eq!(
            DeclarationFormat::from_path(Path::new("tree")),
            DeclarationFormat::Yaml
        );
    }

    #[test]
    fn test_load_tree_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tree.yaml");
        fs::write(&path, sample_yaml()).unwrap();
        assert_eq!(load_tree(&path).unwrap(), sample_tree());

        let missing = load_tree(&dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(missing, CliError::IoError(_)));
    }
}
