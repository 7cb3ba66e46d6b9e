//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;
use termtree::Tree;

use crate::domain::{BinarySearchTree, NodeId};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print completed action (green label) to stderr, keeping stdout for data
pub fn action(label: &str, msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", label.green(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for traversals and config dumps)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

enum Visit {
    Enter(NodeId, &'static str),
    Leave(NodeId, &'static str, usize),
}

/// Indented view of the tree shape; children are marked `L:` or `R:`.
pub fn tree_shape(tree: &BinarySearchTree) -> Tree<String> {
    let Some(root) = tree.root() else {
        return Tree::new("(empty)".to_string());
    };

    let mut built: Vec<Tree<String>> = Vec::new();
    let mut stack = vec![Visit::Enter(root, "")];
    while let Some(visit) = stack.pop() {
        match visit {
            Visit::Enter(id, marker) => {
                let node = &tree.arena()[id];
                let children = [(node.left, "L: "), (node.right, "R: ")];
                let present = children.iter().filter(|(child, _)| child.is_some()).count();
                stack.push(Visit::Leave(id, marker, present));
                for (child, marker) in children.into_iter().rev() {
                    if let Some(child) = child {
                        stack.push(Visit::Enter(child, marker));
                    }
                }
            }
            Visit::Leave(id, marker, present) => {
                let leaves = built.split_off(built.len() - present);
                let label = format!("{marker}{} [slot {}]", tree.arena()[id].value, id.index());
                built.push(Tree::new(label).with_leaves(leaves));
            }
        }
    }

    built.pop().unwrap_or_else(|| Tree::new("(empty)".to_string()))
}
