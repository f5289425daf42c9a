//! Indirect-delivery endpoint.
//!
//! Pages link in-memory assets as `{handler}?type={kind}&key={hex}`; this
//! module answers those requests from the shared content cache.
//!
//! ```text
//! bind()  ──► BoundServer ──► run()
//!                               │
//!                               ├── rayon pool handles requests
//!                               └── Ctrl+C unblocks the server
//! ```

mod lifecycle;
mod response;

use anyhow::Result;
use crossbeam::channel::Receiver;
use percent_encoding::percent_decode_str;
use std::{borrow::Cow, net::SocketAddr, sync::Arc};
use tiny_http::{Request, Server};

use crate::asset::AssetKind;
use crate::cache::{CachePort, CachedContent, ContentCache};
use crate::config::section::ServeConfig;
use crate::error::{AssetError, Result as AssetResult};
use crate::log;
use crate::utils::hash::ContentHash;

pub use lifecycle::{bind_with_retry, register_shutdown};

/// Number of request worker threads.
const WORKERS: usize = 4;

// ============================================================================
// Dispatch
// ============================================================================

/// Answer one delivery query: `(content type, body)`.
///
/// Both `key` and `type` must be present and non-blank. The content type is
/// taken from the requested `type`.
pub fn dispatch(
    cache: &dyn CachePort<CachedContent>,
    query: &str,
) -> AssetResult<(&'static str, Arc<str>)> {
    let key = query_param(query, "key")
        .ok_or_else(|| AssetError::invalid("the query parameter 'key' is required"))?;
    let kind_text = query_param(query, "type")
        .ok_or_else(|| AssetError::invalid("the query parameter 'type' is required"))?;
    let kind: AssetKind = kind_text.parse()?;

    let missing = || AssetError::MissingKey(key.to_string());
    let hash = ContentHash::from_hex(&key).ok_or_else(missing)?;
    let cached = cache.get(&hash).ok_or_else(missing)?;

    Ok((kind.content_type(), cached.content))
}

/// First non-blank value of `name` in a urlencoded query string.
fn query_param<'a>(query: &'a str, name: &str) -> Option<Cow<'a, str>> {
    query
        .split('&')
        .filter_map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(k) == name).then(|| decode(v))
        })
        .find(|value| !value.trim().is_empty())
}

/// Form decoding: `+` is a space, then percent escapes.
fn decode(text: &str) -> Cow<'_, str> {
    if text.contains('+') {
        let spaced = text.replace('+', " ");
        return Cow::Owned(percent_decode_str(&spaced).decode_utf8_lossy().into_owned());
    }
    percent_decode_str(text).decode_utf8_lossy()
}

// ============================================================================
// Server
// ============================================================================

/// Bound server, ready to run.
pub struct BoundServer {
    server: Arc<Server>,
    pub addr: SocketAddr,
    shutdown_rx: Receiver<()>,
}

/// Bind the endpoint on `[serve]` and install the Ctrl+C handler.
pub fn bind(config: &ServeConfig) -> Result<BoundServer> {
    let (server, addr) = bind_with_retry(config.interface, config.port)?;
    let server = Arc::new(server);
    let shutdown_rx = register_shutdown(Arc::clone(&server))?;

    log!("serve"; "http://{}", addr);
    Ok(BoundServer {
        server,
        addr,
        shutdown_rx,
    })
}

impl BoundServer {
    /// Serve `handler` from `cache` until Ctrl+C.
    pub fn run(self, handler: &str, cache: ContentCache) -> Result<()> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(WORKERS)
            .build()?;

        pool.scope(|scope| {
            for request in self.server.incoming_requests() {
                if self.shutdown_rx.try_recv().is_ok() {
                    break;
                }
                let cache = Arc::clone(&cache);
                scope.spawn(move |_| {
                    if let Err(e) = handle_request(request, handler, cache.as_ref()) {
                        log!("serve"; "{}", e);
                    }
                });
            }
        });

        Ok(())
    }
}

fn handle_request(
    request: Request,
    handler: &str,
    cache: &dyn CachePort<CachedContent>,
) -> Result<()> {
    let url = request.url().to_string();
    let (path, query) = url.split_once('?').unwrap_or((&url, ""));

    if path != handler {
        return response::respond_not_found(request);
    }
    if !response::is_readable_request(&request) {
        return response::respond_method_not_allowed(request);
    }

    match dispatch(cache, query) {
        Ok((content_type, body)) => response::respond_content(request, content_type, &body),
        Err(e) => {
            log!("serve"; "{}: {}", url, e);
            let status = match e {
                AssetError::MissingKey(_) => 404,
                _ => 400,
            };
            response::respond_error(request, status, &e.to_string())
        }
    }
}
