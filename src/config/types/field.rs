//! Type-safe config field path.

use owo_colors::OwoColorize;
use std::fmt;

/// A dotted TOML field path, e.g. `paths.handler`.
///
/// Generated by `#[derive(Config)]` so diagnostics name fields without
/// hand-written strings:
///
/// ```ignore
/// diag.error(PathsConfig::FIELDS.handler, "must start with `/`");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}
