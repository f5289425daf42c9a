//! HTTP response helpers.

use anyhow::{Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::utils::mime::types::PLAIN;

/// Processed content never changes under its key.
const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Respond with cached asset content.
pub fn respond_content(request: Request, content_type: &'static str, body: &str) -> Result<()> {
    let headers = [
        make_header("Content-Type", content_type)?,
        make_header("Cache-Control", IMMUTABLE)?,
    ];

    if is_head_request(&request) {
        let response = headers
            .into_iter()
            .fold(Response::empty(StatusCode(200)), Response::with_header);
        request.respond(response)?;
        return Ok(());
    }

    let response = headers.into_iter().fold(
        Response::from_data(body.as_bytes().to_vec()),
        Response::with_header,
    );
    request.respond(response)?;
    Ok(())
}

/// Respond with a plain-text error.
pub fn respond_error(request: Request, status: u16, message: &str) -> Result<()> {
    let response = Response::from_string(format!("{status} {message}"))
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", PLAIN)?);
    request.respond(response)?;
    Ok(())
}

pub fn respond_not_found(request: Request) -> Result<()> {
    respond_error(request, 404, "Not Found")
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    respond_error(request, 405, "Method Not Allowed")
}

pub fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

pub fn is_readable_request(request: &Request) -> bool {
    matches!(request.method(), Method::Get | Method::Head)
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}
