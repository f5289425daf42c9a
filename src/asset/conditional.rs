//! Browser-version conditional comment gates.
//!
//! `<!--[if lt IE 9]> ... <![endif]-->` wraps a link so only matching
//! browsers load it. `BrowserVersion::All` means "unconditional".

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::error::AssetError;

pub const CONDITIONAL_CLOSE: &str = "<![endif]-->";

/// Comparison operator of a conditional comment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Equality {
    #[default]
    EqualTo,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
}

impl Equality {
    /// Short form used inside the comment (`""` for exact equality).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EqualTo => "",
            Self::LessThan => "lt",
            Self::LessThanOrEqualTo => "lte",
            Self::GreaterThan => "gt",
            Self::GreaterThanOrEqualTo => "gte",
        }
    }
}

impl FromStr for Equality {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "eq" => Ok(Self::EqualTo),
            "lt" => Ok(Self::LessThan),
            "lte" => Ok(Self::LessThanOrEqualTo),
            "gt" => Ok(Self::GreaterThan),
            "gte" => Ok(Self::GreaterThanOrEqualTo),
            _ => Err(AssetError::invalid(format!(
                "`{s}` is not one of lt, lte, gt, gte or empty"
            ))),
        }
    }
}

impl TryFrom<String> for Equality {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Equality> for String {
    fn from(value: Equality) -> Self {
        value.as_str().to_string()
    }
}

/// Browser version a conditional comment targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BrowserVersion {
    #[default]
    All,
    IE,
    IE5,
    IE50,
    IE55,
    IE6,
    IE7,
    IE8,
    IE9,
    IE10,
}

impl BrowserVersion {
    const DISPLAY: [(Self, &'static str); 10] = [
        (Self::All, ""),
        (Self::IE, "IE"),
        (Self::IE5, "IE 5"),
        (Self::IE50, "IE 5.0"),
        (Self::IE55, "IE 5.5"),
        (Self::IE6, "IE 6"),
        (Self::IE7, "IE 7"),
        (Self::IE8, "IE 8"),
        (Self::IE9, "IE 9"),
        (Self::IE10, "IE 10"),
    ];

    /// Display form used inside the comment (`""` for `All`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "",
            Self::IE => "IE",
            Self::IE5 => "IE 5",
            Self::IE50 => "IE 5.0",
            Self::IE55 => "IE 5.5",
            Self::IE6 => "IE 6",
            Self::IE7 => "IE 7",
            Self::IE8 => "IE 8",
            Self::IE9 => "IE 9",
            Self::IE10 => "IE 10",
        }
    }
}

impl FromStr for BrowserVersion {
    type Err = AssetError;

    /// Accepts the display form (`"IE 5.5"`) or its spaceless variant (`"ie5.5"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Self::DISPLAY
            .iter()
            .find(|(_, display)| display.replace(' ', "").eq_ignore_ascii_case(&wanted))
            .map(|(version, _)| *version)
            .ok_or_else(|| AssetError::invalid(format!("`{s}` is not a known browser version")))
    }
}

impl TryFrom<String> for BrowserVersion {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BrowserVersion> for String {
    fn from(value: BrowserVersion) -> Self {
        value.as_str().to_string()
    }
}

/// An optional conditional-comment gate. The default is unconditional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Conditional {
    pub equality: Equality,
    pub browser: BrowserVersion,
}

impl Conditional {
    pub const fn new(equality: Equality, browser: BrowserVersion) -> Self {
        Self { equality, browser }
    }

    pub fn is_conditional(&self) -> bool {
        self.browser != BrowserVersion::All
    }

    /// Opening comment, e.g. `<!--[if lt IE 9]>`.
    pub fn open_tag(&self) -> String {
        let parts: Vec<&str> = [self.equality.as_str(), self.browser.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        format!("<!--[if {}]>", parts.join(" "))
    }
}

impl fmt::Display for Conditional {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.open_tag())
    }
}
