//! Local preview server.
//!
//! Serves the exported site from `config.build.output` with `tiny_http`:
//!
//! - Static file serving, `index.html` resolution for directories
//! - `/` redirects to the site prefix (`/papers/`)
//! - Graceful shutdown on Ctrl+C
//!
//! # Architecture
//!
//! ```text
//! serve_site()
//!     │
//!     ├── build_site()        export once before serving
//!     │
//!     ├── try_bind_port()     configured port, or the next free one
//!     │
//!     └── incoming_requests()
//!             │
//!             └── resolve_request() → file | redirect | 404
//! ```

use crate::{build::build_site, config::SiteConfig, log};
use anyhow::{Context, Result, anyhow};
use std::{
    fs,
    io::Cursor,
    net::{IpAddr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Build the site, then serve it until Ctrl+C is received.
pub fn serve_site(config: &SiteConfig) -> Result<()> {
    build_site(config)?;

    let interface: IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid interface `{}`", config.serve.interface))?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    // Set up Ctrl+C handler for graceful shutdown
    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}{}/", addr, config.url_prefix());

    // Blocks until Ctrl+C
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// Outcome of resolving a request URL against the output directory.
#[derive(Debug, PartialEq, Eq)]
enum Resolved {
    File(PathBuf),
    Redirect(String),
    NotFound,
}

/// Resolve a request URL.
///
/// Resolution order:
/// 1. `/` with a site prefix → redirect to `/{prefix}/`
/// 2. Exact file match → file
/// 3. Directory with index.html → index.html
/// 4. Anything else, including paths escaping the root → 404
fn resolve_request(serve_root: &Path, url: &str, prefix: &str) -> Resolved {
    // Strip query string and fragment before decoding, so `%3F` stays in the path
    let raw_path = url.split(['?', '#']).next().unwrap_or(url);

    // Decode URL-encoded characters (e.g., %20 → space)
    let path = urlencoding::decode(raw_path)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_default();
    let request_path = path.trim_matches('/');

    if request_path.is_empty() && !prefix.is_empty() {
        return Resolved::Redirect(format!("{prefix}/"));
    }

    let relative = Path::new(request_path);
    if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        return Resolved::NotFound;
    }

    let local_path = serve_root.join(relative);
    if local_path.is_file() {
        return Resolved::File(local_path);
    }

    let index_path = local_path.join("index.html");
    if local_path.is_dir() && index_path.is_file() {
        return Resolved::File(index_path);
    }

    Resolved::NotFound
}

/// Handle a single HTTP request.
fn handle_request(request: Request, config: &SiteConfig) -> Result<()> {
    match resolve_request(&config.build.output, request.url(), &config.url_prefix()) {
        Resolved::File(path) => serve_file(request, &path),
        Resolved::Redirect(location) => serve_redirect(request, &location),
        Resolved::NotFound => serve_not_found(request),
    }
}

// ============================================================================
// Response Helpers
// ============================================================================

fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name, value).map_err(|()| anyhow!("Invalid header {name}: {value}"))
}

/// Serve a file with appropriate content type.
fn serve_file(request: Request, path: &Path) -> Result<()> {
    let content = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let response =
        Response::from_data(content).with_header(header("Content-Type", guess_content_type(path))?);

    request.respond(response)?;
    Ok(())
}

/// Serve a temporary redirect.
fn serve_redirect(request: Request, location: &str) -> Result<()> {
    let response = Response::empty(StatusCode(302)).with_header(header("Location", location)?);
    request.respond(response)?;
    Ok(())
}

/// Serve 404 Not Found response.
fn serve_not_found(request: Request) -> Result<()> {
    let response = Response::new(
        StatusCode(404),
        vec![header("Content-Type", "text/plain")?],
        Cursor::new("404 Not Found"),
        Some(13),
        None,
    );
    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        // Web content
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",

        Some("txt") => "text/plain; charset=utf-8",

        // Default binary
        _ => "application/octet-stream",
    }
}
