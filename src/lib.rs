//! assetry - page asset aggregation.
//!
//! Pages declare stylesheets and scripts into named groups; each group is run
//! through a transform pipeline (url rewrite, combine, minify) and rendered
//! to `<link>`/`<script>` markup. Processed content is published to a shared
//! cache and delivered by the [`serve`] endpoint.

pub mod logger;

pub mod asset;
pub mod cache;
pub mod config;
pub mod error;
pub mod manager;
pub mod manifest;
pub mod pipeline;
pub mod reader;
pub mod registry;
pub mod render;
pub mod serve;
pub mod utils;

pub use asset::{Asset, AssetBuilder, AssetKind};
pub use config::AssetConfig;
pub use error::{AssetError, Result};
pub use manager::AssetManager;
