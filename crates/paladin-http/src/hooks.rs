//! Request/response logging hooks
//!
//! Summary lines go out at DEBUG (WARN for error statuses). The detail
//! block is only built when TRACE is enabled.

use crate::client::HttpResponse;
use paladin_core_types::{display_header_value, RequestId};
use regex::Regex;
use reqwest::header::HeaderMap;
use reqwest::{Method, Url};
use std::sync::OnceLock;

/// Placeholder for bodies that are not logged
pub const OMITTED: &str = "<omitted>";

fn text_content() -> Option<&'static Regex> {
    static TEXT_CONTENT: OnceLock<Option<Regex>> = OnceLock::new();
    TEXT_CONTENT
        .get_or_init(|| Regex::new(r"(?i)(application/json|text/html)").ok())
        .as_ref()
}

/// Whether a body of this content type is printable in logs
pub fn is_text_content(content_type: &str) -> bool {
    text_content().is_some_and(|re| re.is_match(content_type))
}

/// One `Name: value` line per header, credentials redacted
pub fn format_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| {
            let value = String::from_utf8_lossy(value.as_bytes());
            format!("{}: {}", name, display_header_value(name.as_str(), &value))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn log_request(request_id: &RequestId, method: &Method, url: &Url) {
    tracing::debug!(
        request_id = %request_id,
        method = %method,
        url = %url,
        "Req: {} {}",
        method,
        url
    );
}

pub fn log_response(resp: &HttpResponse) {
    let status = resp.status().as_u16();
    let content_type = resp.content_type().unwrap_or("*");
    let content_length = resp.content_length().unwrap_or("*");

    if resp.is_error() {
        tracing::warn!(
            request_id = %resp.request_id(),
            status,
            "Resp: {} {} -> [{} {}], <{} {}>",
            resp.method(),
            resp.url(),
            status,
            resp.reason(),
            content_type,
            content_length
        );
    } else {
        tracing::debug!(
            request_id = %resp.request_id(),
            status,
            "Resp: {} {} -> [{} {}], <{} {}>",
            resp.method(),
            resp.url(),
            status,
            resp.reason(),
            content_type,
            content_length
        );
    }
}

/// Request line, both header blocks, elapsed time and the body
pub fn response_detail(resp: &HttpResponse) -> String {
    let content = if resp.content_type().is_some_and(is_text_content) {
        resp.text()
    } else {
        OMITTED.to_string()
    };
    format!(
        "{method} {url} {status}\n{headers}\n\n-.-.-.- response (elapsed: {elapsed:.3}s) -.-.-.-\n{status} {reason}\n{resp_headers}\n\n{content}",
        method = resp.method(),
        url = resp.url(),
        status = resp.status().as_u16(),
        headers = format_headers(resp.request_headers()),
        elapsed = resp.elapsed().as_secs_f64(),
        reason = resp.reason(),
        resp_headers = format_headers(resp.headers()),
        content = content,
    )
}

pub fn log_response_detail(resp: &HttpResponse) {
    tracing::trace!(request_id = %resp.request_id(), "{}", response_detail(resp));
}
