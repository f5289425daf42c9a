//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use assetry::AssetKind;

/// Page asset aggregator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: assetry.toml)
    #[arg(short = 'C', long, global = true, default_value = "assetry.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Print debug messages
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit provenance comments before every link
    #[arg(long, global = true)]
    pub debug: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default config file
    #[command(visible_alias = "i")]
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Apply a page manifest and print the rendered markup
    #[command(visible_alias = "r")]
    Render {
        /// Page manifest path
        #[arg(value_hint = clap::ValueHint::FilePath)]
        manifest: PathBuf,

        /// Group to render (default: every group)
        #[arg(short, long)]
        group: Option<String>,

        /// Kind to render (default: both)
        #[arg(short, long)]
        kind: Option<KindArg>,
    },

    /// Render manifests to warm the cache, then serve the delivery endpoint
    #[command(visible_alias = "s")]
    Serve {
        /// Page manifest paths
        #[arg(required = true, value_hint = clap::ValueHint::FilePath)]
        manifests: Vec<PathBuf>,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

/// Asset kind selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Css,
    #[value(alias = "js")]
    Javascript,
}

impl From<KindArg> for AssetKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Css => Self::Css,
            KindArg::Javascript => Self::Javascript,
        }
    }
}

impl KindArg {
    /// Kinds selected by an optional flag, stylesheets first.
    pub fn select(kind: Option<Self>) -> Vec<AssetKind> {
        kind.map_or_else(|| AssetKind::ALL.to_vec(), |k| vec![k.into()])
    }
}
