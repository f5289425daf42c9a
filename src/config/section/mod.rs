//! Configuration section definitions.
//!
//! | Section        | Purpose                                         |
//! |----------------|-------------------------------------------------|
//! | `[paths]`      | Asset root, base path, endpoint path, url base  |
//! | `[css]`        | Stylesheet alternate name, transforms, locale   |
//! | `[javascript]` | Script alternate name, transforms, locale       |
//! | `[cache]`      | Entry expiry                                    |
//! | `[serve]`      | Delivery endpoint interface and port            |

mod cache;
mod kind;
mod paths;
mod serve;

pub use cache::CacheConfig;
pub use kind::{CssConfig, JavascriptConfig, TransformKind};
pub use paths::PathsConfig;
pub use serve::ServeConfig;
