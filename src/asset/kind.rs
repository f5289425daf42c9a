//! Asset kind definitions.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::AssetError;
use crate::utils::mime;

/// Default `media` attribute for stylesheets.
pub const DEFAULT_MEDIA: &str = "all";

/// Kind of page asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    /// Stylesheet, rendered as `<link>`.
    Css,
    /// Script, rendered as `<script>`.
    Javascript,
}

impl AssetKind {
    pub const ALL: [Self; 2] = [Self::Css, Self::Javascript];

    /// Name used in indirect URLs and config sections.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Css => "css",
            Self::Javascript => "javascript",
        }
    }

    /// Content type the delivery endpoint responds with.
    pub const fn content_type(&self) -> &'static str {
        match self {
            Self::Css => mime::types::CSS,
            Self::Javascript => mime::types::JAVASCRIPT,
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "css" | "stylesheet" => Ok(Self::Css),
            "javascript" | "js" | "script" => Ok(Self::Javascript),
            _ => Err(AssetError::UnknownKind(s.to_string())),
        }
    }
}

/// Kind tag plus the attributes only that kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Variant {
    Stylesheet { media: String },
    Script,
}

impl Variant {
    pub fn stylesheet(media: impl Into<String>) -> Self {
        Self::Stylesheet {
            media: media.into(),
        }
    }

    pub const fn kind(&self) -> AssetKind {
        match self {
            Self::Stylesheet { .. } => AssetKind::Css,
            Self::Script => AssetKind::Javascript,
        }
    }

    pub fn media(&self) -> Option<&str> {
        match self {
            Self::Stylesheet { media } => Some(media),
            Self::Script => None,
        }
    }
}

impl From<AssetKind> for Variant {
    fn from(kind: AssetKind) -> Self {
        match kind {
            AssetKind::Css => Self::stylesheet(DEFAULT_MEDIA),
            AssetKind::Javascript => Self::Script,
        }
    }
}
