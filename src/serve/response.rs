//! HTTP response helpers.

use crate::{
    embed::serve::reload_script_tag,
    utils::{
        html::inject_before_body_end,
        mime::{self, types},
    },
};
use anyhow::{Context, Result};
use flate2::{Compression, write::GzEncoder};
use std::{fs, io::Write, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Respond with a file from the serving root.
///
/// HTML gets the live reload client injected on the way out.
pub fn respond_file(request: Request, path: &Path, ws_port: u16) -> Result<()> {
    let content_type = mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let body = fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let body = maybe_inject_reload(body, content_type, ws_port);
    send_body(request, 200, content_type, body)
}

pub fn respond_not_found(request: Request) -> Result<()> {
    if is_head_request(&request) {
        return send_head(request, 404, types::PLAIN);
    }
    send_body(request, 404, types::PLAIN, b"404 Not Found".to_vec())
}

pub fn respond_method_not_allowed(request: Request) -> Result<()> {
    let response = Response::from_data(b"405 Method Not Allowed".to_vec())
        .with_status_code(StatusCode(405))
        .with_header(make_header("Content-Type", types::PLAIN))
        .with_header(make_header("Allow", "GET, HEAD"));
    request.respond(response)?;
    Ok(())
}

/// Respond with 503 while shutting down.
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(request, 503, types::PLAIN, b"503 Service Unavailable".to_vec())
}

pub fn is_allowed_method(request: &Request) -> bool {
    matches!(request.method(), Method::Get | Method::Head)
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

/// Inject the reload `<script>` into HTML bodies.
pub fn maybe_inject_reload(body: Vec<u8>, content_type: &str, ws_port: u16) -> Vec<u8> {
    if content_type.starts_with("text/html") {
        inject_before_body_end(&body, reload_script_tag(ws_port).as_bytes())
    } else {
        body
    }
}

fn send_head(request: Request, status: u16, content_type: &'static str) -> Result<()> {
    let response = Response::empty(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Cache-Control", "no-cache, max-age=0"));
    request.respond(response)?;
    Ok(())
}

fn send_body(request: Request, status: u16, content_type: &'static str, body: Vec<u8>) -> Result<()> {
    let gzip = mime::is_compressible(content_type) && accepts_gzip(&request);
    let body = if gzip { gzip_bytes(&body)? } else { body };

    let mut response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type))
        .with_header(make_header("Cache-Control", "no-cache, max-age=0"));
    if mime::is_compressible(content_type) {
        response.add_header(make_header("Vary", "Accept-Encoding"));
    }
    if gzip {
        response.add_header(make_header("Content-Encoding", "gzip"));
    }

    request.respond(response)?;
    Ok(())
}

fn accepts_gzip(request: &Request) -> bool {
    request
        .headers()
        .iter()
        .filter(|h| h.field.equiv("Accept-Encoding"))
        .any(|h| header_accepts_gzip(h.value.as_str()))
}

/// `gzip` listed in an `Accept-Encoding` value without `q=0`.
fn header_accepts_gzip(value: &str) -> bool {
    value.split(',').any(|coding| {
        let mut parts = coding.split(';').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let refused = parts.any(|p| {
            p.strip_prefix("q=")
                .and_then(|q| q.trim().parse::<f32>().ok())
                .is_some_and(|q| q == 0.0)
        });
        (name.eq_ignore_ascii_case("gzip") || name == "*") && !refused
    })
}

fn gzip_bytes(body: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(body.len() / 2), Compression::fast());
    encoder.write_all(body)?;
    encoder.finish().context("gzip failed")
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    Header::from_bytes(key, value).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_header_accepts_gzip() {
        assert!(header_accepts_gzip("gzip"));
        assert!(header_accepts_gzip("gzip, deflate, br"));
        assert!(header_accepts_gzip("br;q=1.0, GZIP;q=0.8"));
        assert!(header_accepts_gzip("*"));
        assert!(!header_accepts_gzip("deflate, br"));
        assert!(!header_accepts_gzip("gzip;q=0"));
        assert!(!header_accepts_gzip(""));
    }

    #[test]
    fn test_gzip_bytes() {
        let body = "<p>slide</p>".repeat(50);
        let compressed = gzip_bytes(body.as_bytes()).unwrap();
        assert!(compressed.len() < body.len());

        let mut decoded = String::new();
        GzDecoder::new(&compressed[..]).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_reload_injected_into_html_only() {
        let html = maybe_inject_reload(b"<body><p>x</p></body>".to_vec(), types::HTML, 8081);
        let html = String::from_utf8(html).unwrap();
        assert!(html.contains("<script>"));
        assert!(html.contains("8081"));
        assert!(html.ends_with("</script></body>"));

        let css = maybe_inject_reload(b"p{}".to_vec(), types::CSS, 8081);
        assert_eq!(css, b"p{}");
    }
}
