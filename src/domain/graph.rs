//! Graphviz serialization of the tree shape.
//!
//! Every node becomes a record with `left`/`right` ports; every
//! parent/child link becomes an edge leaving the matching port. Node
//! identifiers are arena slots, so repeated dumps of a growing tree keep
//! stable names.

use std::convert::Infallible;
use std::fmt::{self, Write};

use crate::domain::arena::{Node, NodeId};
use crate::domain::tree::BinarySearchTree;

/// Line terminator used in graph files.
pub const LINE_END: &str = "\r\n";

/// Fill colors per node role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub root: String,
    pub node: String,
    pub leaf: String,
    pub highlight: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            root: "#f4acb7".into(),
            node: "#d8e2dc".into(),
            leaf: "#ffe5d9".into(),
            highlight: "#9d8189".into(),
        }
    }
}

impl Palette {
    pub fn color(&self, role: NodeRole) -> &str {
        match role {
            NodeRole::Root => &self.root,
            NodeRole::Highlighted => &self.highlight,
            NodeRole::Leaf => &self.leaf,
            NodeRole::Internal => &self.node,
        }
    }
}

/// Styling role of a node in a dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    Root,
    Highlighted,
    Leaf,
    Internal,
}

impl NodeRole {
    /// Root styling wins over highlighting.
    pub fn classify(id: NodeId, node: &Node, depth: usize, highlight: Option<NodeId>) -> Self {
        if depth == 0 {
            NodeRole::Root
        } else if highlight == Some(id) {
            NodeRole::Highlighted
        } else if node.is_leaf() {
            NodeRole::Leaf
        } else {
            NodeRole::Internal
        }
    }
}

/// Child side, doubling as the record port name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn port(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

enum Item {
    Node(NodeId, usize),
    Edge(NodeId, Side, NodeId),
}

/// Write the `digraph` document for `tree` to `out`.
pub fn write_dot<W: Write>(
    tree: &BinarySearchTree,
    highlight: Option<NodeId>,
    palette: &Palette,
    out: &mut W,
) -> fmt::Result {
    emit_dot(tree, highlight, palette, |piece| out.write_fmt(piece))
}

/// Render the `digraph` document for `tree` as a string.
pub fn render_dot(
    tree: &BinarySearchTree,
    highlight: Option<NodeId>,
    palette: &Palette,
) -> String {
    let mut dot = String::new();
    emit_dot(tree, highlight, palette, |piece| -> Result<(), Infallible> {
        dot.push_str(&piece.to_string());
        Ok(())
    })
    .unwrap_or_else(|never| match never {});
    dot
}

/// Produce the document as formatted pieces, in output order.
fn emit_dot<E>(
    tree: &BinarySearchTree,
    highlight: Option<NodeId>,
    palette: &Palette,
    mut emit: impl FnMut(fmt::Arguments<'_>) -> Result<(), E>,
) -> Result<(), E> {
    emit(format_args!("digraph {{{LINE_END}"))?;
    emit(format_args!("node[shape = Mrecord, style = filled];{LINE_END}"))?;
    emit(format_args!("rankdir = TB;{LINE_END}"))?;

    let mut stack: Vec<Item> = tree
        .root()
        .map(|root| Item::Node(root, 0))
        .into_iter()
        .collect();
    while let Some(item) = stack.pop() {
        match item {
            Item::Node(id, depth) => {
                let node = &tree.arena()[id];
                let role = NodeRole::classify(id, node, depth, highlight);
                emit(format_args!(
                    "{id}[rank = {depth}, \
                     label = \"{{ data = {} | {{ <left> LEFT | <right> RIGHT }} }}\", \
                     fillcolor = \"{}\"];{LINE_END}",
                    node.value,
                    palette.color(role),
                ))?;

                // left edge and subtree come out before the right ones
                if let Some(right) = node.right {
                    stack.push(Item::Node(right, depth + 1));
                    stack.push(Item::Edge(id, Side::Right, right));
                }
                if let Some(left) = node.left {
                    stack.push(Item::Node(left, depth + 1));
                    stack.push(Item::Edge(id, Side::Left, left));
                }
            }
            Item::Edge(parent, side, child) => {
                emit(format_args!("{parent}:<{}>->{child};{LINE_END}", side.port()))?;
            }
        }
    }

    emit(format_args!("}}{LINE_END}"))
}
