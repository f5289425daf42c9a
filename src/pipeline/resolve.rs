//! Resolution of relative stylesheet references to absolute URLs.

use url::Url;

use crate::error::{AssetError, Result};

/// Turns a reference found inside an asset into an absolute URL.
pub trait UrlResolver: Send + Sync {
    /// `asset_path` is the asset's current path, `relative` the reference
    /// exactly as written between the quotes.
    fn resolve(&self, asset_path: &str, relative: &str) -> Result<String>;
}

/// Resolves against a site URL: `{base}/{asset dir}/{relative}`.
///
/// `~/` on either side means "from the site root".
#[derive(Debug, Clone)]
pub struct BaseUrlResolver {
    base: Url,
}

impl BaseUrlResolver {
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base).map_err(|e| AssetError::Resolve {
            base: base.to_string(),
            relative: String::new(),
            message: e.to_string(),
        })?;
        Ok(Self { base })
    }
}

impl UrlResolver for BaseUrlResolver {
    fn resolve(&self, asset_path: &str, relative: &str) -> Result<String> {
        let fail = |e: url::ParseError| AssetError::Resolve {
            base: self.base.to_string(),
            relative: relative.to_string(),
            message: e.to_string(),
        };

        let url = match relative.strip_prefix("~/") {
            Some(from_root) => self.base.join(from_root),
            None => {
                let asset_path = asset_path.strip_prefix("~/").unwrap_or(asset_path);
                self.base
                    .join(asset_path.trim_start_matches('/'))
                    .and_then(|asset| asset.join(relative))
            }
        }
        .map_err(fail)?;

        Ok(url.into())
    }
}
