//! assetry - page asset aggregator CLI.

mod args;

use anyhow::{Context, Result, bail};
use args::{Cli, Commands, KindArg};
use clap::{ColorChoice, Parser};
use std::{fs, path::Path, sync::Arc};

use assetry::{
    Asset, AssetConfig, AssetKind, AssetManager,
    cache::{CachedContent, ContentCache, MemoryCache},
    log,
    manifest::PageManifest,
    pipeline::MemoCache,
    serve,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    assetry::logger::set_verbose(cli.verbose);

    match &cli.command {
        Commands::Init { force } => init_config(&cli.config, *force),
        Commands::Render {
            manifest,
            group,
            kind,
        } => {
            let config = load_config(&cli)?;
            let markup = render_manifest(config, &Caches::new(), manifest, group.as_deref(), *kind)?;
            print!("{markup}");
            Ok(())
        }
        Commands::Serve {
            manifests,
            interface,
            port,
        } => {
            let mut config = load_config(&cli)?;
            if let Some(interface) = interface {
                Arc::make_mut(&mut config).serve.interface = *interface;
            }
            if let Some(port) = port {
                Arc::make_mut(&mut config).serve.port = *port;
            }
            serve_manifests(config, manifests)
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// Caches shared by every page rendered in this process.
struct Caches {
    content: ContentCache,
    memo: MemoCache,
}

impl Caches {
    fn new() -> Self {
        Self {
            content: Arc::new(MemoryCache::<CachedContent>::new()),
            memo: Arc::new(MemoryCache::<Vec<Asset>>::new()),
        }
    }
}

fn load_config(cli: &Cli) -> Result<Arc<AssetConfig>> {
    let mut config = AssetConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    config.debug |= cli.debug;
    Ok(Arc::new(config))
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    fs::write(path, AssetConfig::template())
        .with_context(|| format!("failed to write {}", path.display()))?;
    log!("init"; "wrote {}", path.display());
    Ok(())
}

/// Apply one manifest and render the selected groups.
fn render_manifest(
    config: Arc<AssetConfig>,
    caches: &Caches,
    manifest: &Path,
    group: Option<&str>,
    kind: Option<KindArg>,
) -> Result<String> {
    let page = PageManifest::load(manifest)?;
    let mut manager =
        AssetManager::new(config, Arc::clone(&caches.content), Arc::clone(&caches.memo))?;
    page.apply(&mut manager)
        .with_context(|| format!("invalid declaration in {}", manifest.display()))?;

    let mut out = String::new();
    for kind in KindArg::select(kind) {
        let groups: Vec<String> = match group {
            Some(name) => vec![name.to_string()],
            None => group_names(&manager, kind),
        };
        for name in &groups {
            let markup = manager
                .render(kind, Some(name))
                .with_context(|| format!("failed to render {kind} group `{name}`"))?;
            out.push_str(&markup);
        }
    }
    Ok(out)
}

fn group_names(manager: &AssetManager, kind: AssetKind) -> Vec<String> {
    manager
        .registry()
        .group_names(kind)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Render every manifest into the shared cache, then serve it.
fn serve_manifests(config: Arc<AssetConfig>, manifests: &[std::path::PathBuf]) -> Result<()> {
    let caches = Caches::new();
    for manifest in manifests {
        render_manifest(Arc::clone(&config), &caches, manifest, None, None)?;
        log!("serve"; "rendered {}", manifest.display());
    }

    let server = serve::bind(&config.serve)?;
    server.run(&config.paths.handler, caches.content)
}
