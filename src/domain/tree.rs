//! Binary search tree over a fixed node arena.

use std::convert::Infallible;
use std::fmt;
use std::io;

use tracing::{debug, instrument};

use crate::domain::arena::{Node, NodeArena, NodeId, NodeValue};
use crate::domain::error::DomainResult;

/// Depth-first traversal order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Traversal {
    PreOrder,
    InOrder,
    PostOrder,
}

impl Traversal {
    pub const ALL: [Traversal; 3] = [
        Traversal::PreOrder,
        Traversal::InOrder,
        Traversal::PostOrder,
    ];
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Traversal::PreOrder => "preorder",
            Traversal::InOrder => "inorder",
            Traversal::PostOrder => "postorder",
        };
        f.write_str(name)
    }
}

/// Output token of a parenthesized traversal.
#[derive(Debug, Clone, Copy)]
enum Token {
    Open,
    Value(NodeValue),
    Close,
}

/// Pending work on the explicit traversal stack.
enum Step {
    Subtree(Option<NodeId>),
    Emit(Token),
}

/// Unbalanced binary search tree whose nodes all live in one arena.
///
/// Values greater than a node go right; everything else, equal values
/// included, goes left.
#[derive(Debug)]
pub struct BinarySearchTree {
    arena: NodeArena,
    root: Option<NodeId>,
}

impl BinarySearchTree {
    pub fn with_capacity(capacity: usize) -> DomainResult<Self> {
        Ok(Self {
            arena: NodeArena::with_capacity(capacity)?,
            root: None,
        })
    }

    /// Insert `value`, consuming exactly one arena slot.
    #[instrument(level = "trace", skip(self))]
    pub fn insert(&mut self, value: NodeValue) -> DomainResult<NodeId> {
        let id = self.arena.acquire(value)?;

        let Some(mut current) = self.root else {
            debug!(%id, value, "inserted root");
            self.root = Some(id);
            return Ok(id);
        };

        loop {
            let node = &mut self.arena[current];
            let child = if value > node.value {
                &mut node.right
            } else {
                &mut node.left
            };
            match *child {
                Some(next) => current = next,
                None => {
                    *child = Some(id);
                    debug!(%id, parent = %current, value, "inserted node");
                    return Ok(id);
                }
            }
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Handle for the node stored in arena slot `index`, if allocated.
    pub fn slot(&self, index: usize) -> Option<NodeId> {
        self.arena.slot(index)
    }

    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn is_full(&self) -> bool {
        self.arena.is_full()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(NodeId, usize)> =
            self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            let node = &self.arena[id];
            stack.extend(node.left.map(|child| (child, depth + 1)));
            stack.extend(node.right.map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// First node holding `value` along its search path.
    ///
    /// With duplicates this is the topmost one; later copies sit in its
    /// left subtree.
    pub fn find(&self, value: NodeValue) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            if value == node.value {
                return Some(id);
            }
            current = if value > node.value {
                node.right
            } else {
                node.left
            };
        }
        None
    }

    /// Pre-order iterator over `(NodeId, &Node)` pairs.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Write the fully parenthesized traversal to `out`.
    ///
    /// An empty subtree is written as `()`.
    pub fn write_traversal<W: io::Write + ?Sized>(
        &self,
        order: Traversal,
        out: &mut W,
    ) -> io::Result<()> {
        self.walk(order, |token| match token {
            Token::Open => out.write_all(b"("),
            Token::Value(value) => write!(out, "{value}"),
            Token::Close => out.write_all(b")"),
        })
    }

    /// Fully parenthesized traversal as a string.
    pub fn traversal(&self, order: Traversal) -> String {
        let mut text = String::new();
        self.walk(order, |token| -> Result<(), Infallible> {
            match token {
                Token::Open => text.push('('),
                Token::Value(value) => text.push_str(&value.to_string()),
                Token::Close => text.push(')'),
            }
            Ok(())
        })
        .unwrap_or_else(|never| match never {});
        text
    }

    /// Bare node values in traversal order.
    pub fn values(&self, order: Traversal) -> Vec<NodeValue> {
        let mut values = Vec::with_capacity(self.len());
        self.walk(order, |token| -> Result<(), Infallible> {
            if let Token::Value(value) = token {
                values.push(value);
            }
            Ok(())
        })
        .unwrap_or_else(|never| match never {});
        values
    }

    /// Depth-first walk with an explicit stack; degenerate trees can be as
    /// deep as the arena is large.
    fn walk<E>(
        &self,
        order: Traversal,
        mut emit: impl FnMut(Token) -> Result<(), E>,
    ) -> Result<(), E> {
        let mut stack = vec![Step::Subtree(self.root)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Emit(token) => emit(token)?,
                Step::Subtree(None) => {
                    emit(Token::Open)?;
                    emit(Token::Close)?;
                }
                Step::Subtree(Some(id)) => {
                    let node = &self.arena[id];
                    let value = Step::Emit(Token::Value(node.value));
                    let left = Step::Subtree(node.left);
                    let right = Step::Subtree(node.right);

                    emit(Token::Open)?;
                    stack.push(Step::Emit(Token::Close));
                    // pushed in reverse of emission order
                    match order {
                        Traversal::PreOrder => stack.extend([right, left, value]),
                        Traversal::InOrder => stack.extend([right, value, left]),
                        Traversal::PostOrder => stack.extend([value, right, left]),
                    }
                }
            }
        }
        Ok(())
    }
}

/// Pre-order iterator over the nodes of a [`BinarySearchTree`].
pub struct Iter<'a> {
    tree: &'a BinarySearchTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.arena[id];
        // Push right first so the left subtree is visited first
        self.stack.extend(node.right);
        self.stack.extend(node.left);
        Some((id, node))
    }
}
