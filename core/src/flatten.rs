//! Tree flattening with option inheritance.
//!
//! Every command node is turned into one `(full path, effective bindings)`
//! pair. A node's inheritable children (option sets and positionals) are all
//! accumulated before any of its subcommands is visited, so an option set
//! declared after a subcommand is still inherited by it. Each subcommand
//! receives its own copy of the accumulation; local options of one command
//! never reach its siblings or descendants. The anonymous root is the
//! exception: it has no entry of its own, so its options are inherited.

use tracing::trace;

use crate::declare::{Binding, CommandNode, Node};
use crate::types::CommandPath;

impl Node {
    /// Bindings this child contributes to its parent's descendants.
    fn inheritable(&self) -> Vec<Binding> {
        match self {
            Node::Command(_) => Vec::new(),
            Node::Options(set) => set.iter().cloned().map(Binding::flag).collect(),
            Node::Positional(positional) => vec![Binding::positional(positional.spec().clone())],
        }
    }
}

impl CommandNode {
    /// Flattens the tree into `(full path, effective bindings)` pairs.
    ///
    /// Paths are in command-line spelling. Descendants are emitted before
    /// their ancestors; the anonymous root emits nothing. Duplicate paths are
    /// returned as-is; [`DispatchTable::build`](crate::DispatchTable::build)
    /// rejects them.
    ///
    /// # Examples
    ///
    /// ```
    /// use caparg_core::*;
    ///
    /// let tree = command("")
    ///     .with_options(options().with("where", option(ValueType::String)))
    ///     .with_subcommand(command("eat").with_subcommand(command("lunch")));
    ///
    /// let pairs = tree.flatten();
    /// let paths: Vec<String> = pairs.iter().map(|(p, _)| p.to_string()).collect();
    /// assert_eq!(paths, ["eat lunch", "eat"]);
    /// assert!(pairs.iter().all(|(_, b)| b.iter().any(|b| b.name() == "where")));
    /// ```
    pub fn flatten(&self) -> Vec<(CommandPath, Vec<Binding>)> {
        let mut out = Vec::new();
        self.flatten_into(&CommandPath::default(), Vec::new(), &mut out);
        out
    }

    fn flatten_into(
        &self,
        parent: &CommandPath,
        mut inherited: Vec<Binding>,
        out: &mut Vec<(CommandPath, Vec<Binding>)>,
    ) {
        let full = parent.join(&self.path);
        // A pathless node is never dispatched itself; its own options go
        // to every descendant instead.
        if self.path.is_empty() {
            inherited.extend(self.options.iter().cloned().map(Binding::flag));
        }
        inherited.extend(self.children.iter().flat_map(Node::inheritable));

        for child in &self.children {
            if let Node::Command(sub) = child {
                sub.flatten_into(&full, inherited.clone(), out);
            }
        }

        if !self.path.is_empty() {
            let mut effective = inherited;
            effective.extend(self.options.iter().cloned().map(Binding::flag));
            trace!(path = %full, bindings = effective.len(), "flattened command");
            out.push((full.cli_spelling(), effective));
        }
    }
}
