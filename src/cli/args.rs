//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{NodeValue, Traversal};

/// Arena-backed binary search tree with Graphviz dumps and an HTML visual log
#[derive(Parser, Debug)]
#[command(name = "bstviz")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Turn debugging information on (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file replacing the local ./.bstviz.toml layer
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Insert values, dump the tree and print its in-order traversal
    Insert(InsertArgs),

    /// Print a traversal without writing any files
    Traverse {
        #[command(flatten)]
        tree: TreeArgs,

        /// Traversal order
        #[arg(short, long, value_enum, default_value_t = OrderArg::In)]
        order: OrderArg,
    },

    /// Print the tree shape
    Show {
        #[command(flatten)]
        tree: TreeArgs,
    },

    /// Replay the reference sequence: 32 slots, two dumps, in-order output
    Demo {
        /// Write graph files only, do not run the renderer
        #[arg(long)]
        no_render: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Values and arena size shared by tree-building commands
#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Arena capacity (default: `capacity` from settings)
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Values to insert, in order
    #[arg(required = true, allow_negative_numbers = true)]
    pub values: Vec<NodeValue>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("highlighting").args(["highlight", "highlight_value"])))]
pub struct InsertArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Dump after every K inserts, in addition to the final dump
    #[arg(long, value_name = "K")]
    pub dump_every: Option<usize>,

    /// Highlight the node in this arena slot in the final dump
    #[arg(long, value_name = "SLOT")]
    pub highlight: Option<usize>,

    /// Highlight the topmost node holding this value in the final dump
    #[arg(long, value_name = "VALUE", allow_negative_numbers = true)]
    pub highlight_value: Option<NodeValue>,

    /// Write graph files only, do not run the renderer
    #[arg(long)]
    pub no_render: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a commented config template
    Template,

    /// Show config paths
    Path,
}

/// Traversal order as spelled on the command line
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderArg {
    Pre,
    In,
    Post,
}

impl From<OrderArg> for Traversal {
    fn from(order: OrderArg) -> Self {
        match order {
            OrderArg::Pre => Traversal::PreOrder,
            OrderArg::In => Traversal::InOrder,
            OrderArg::Post => Traversal::PostOrder,
        }
    }
}
