//! bstviz: an unbalanced binary search tree over a fixed node arena,
//! with parenthesized traversals, Graphviz dumps and an HTML visual log.
//!
//! Layers, innermost first:
//! - [`domain`]: arena, tree, traversals and graph text (no I/O)
//! - [`application`]: dump pipeline and tree sessions
//! - [`infrastructure`]: filesystem/renderer implementations and wiring
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
