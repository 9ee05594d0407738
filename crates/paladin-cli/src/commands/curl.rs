//! curl command
//!
//! Usage: paladin curl [-X METHOD] [-H 'name: value']... [-D DATA] [-T SECONDS] URL

use crate::commands::timed;
use clap::{Args, ValueEnum};
use paladin_core::AppConfig;
use paladin_http::client::parse_header;
use paladin_http::header::{HeaderMap, HeaderName, HeaderValue};
use paladin_http::{default_client, ClientOptions, Method};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Options => Method::OPTIONS,
        }
    }
}

#[derive(Debug, Args)]
pub struct CurlArgs {
    /// Request URL, e.g. http://www.example.com
    pub url: String,

    /// Request method
    #[arg(short = 'X', long, value_enum, ignore_case = true, default_value_t = HttpMethod::Get)]
    pub method: HttpMethod,

    /// HTTP header, e.g. 'content-type: application/json'
    #[arg(short = 'H', long = "header", value_parser = header_arg)]
    pub headers: Vec<(HeaderName, HeaderValue)>,

    /// Request body
    #[arg(short = 'D', long)]
    pub data: Option<String>,

    /// Timeout in seconds
    #[arg(short = 'T', long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

fn header_arg(raw: &str) -> Result<(HeaderName, HeaderValue), String> {
    parse_header(raw).map_err(|e| e.message().to_string())
}

/// Reject URLs without a scheme before any request is made
pub fn check_url(url: &str) -> Result<(), String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(format!(
            "url \"{}\" is invalid, do you mean http(s)://{} ?",
            url, url
        ))
    }
}

/// `content-type` -> `Content-Type`
pub fn title_case(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}

fn print_headers(headers: &HeaderMap) {
    for (name, value) in headers {
        println!(
            "{}: {}",
            title_case(name.as_str()),
            String::from_utf8_lossy(value.as_bytes())
        );
    }
}

/// Execute curl command
pub fn execute(args: CurlArgs, conf: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    check_url(&args.url)?;

    let mut options = ClientOptions::new();
    if let Some(timeout) = args.timeout {
        options = options.timeout(timeout);
    }
    let client = default_client(options, &conf.httpclient)?;
    let headers: HeaderMap = args.headers.into_iter().collect();
    let method = Method::from(args.method);

    let resp = timed("curl", || {
        client.send(method, &args.url, headers, args.data.clone())
    })?;

    println!("{} {}", resp.method(), resp.url());
    print_headers(resp.request_headers());
    println!();
    if let Some(data) = &args.data {
        println!("{}", data);
    }

    println!("========== response ==========");
    println!("{} {}", resp.status().as_u16(), resp.reason());
    print_headers(resp.headers());
    println!();
    println!("{}", resp.text());
    println!("(Elapsed: {:.3}s)", resp.elapsed().as_secs_f64());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_url() {
        assert!(check_url("https://example.com").is_ok());
        assert_eq!(
            check_url("example.com").unwrap_err(),
            "url \"example.com\" is invalid, do you mean http(s)://example.com ?"
        );
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("content-type"), "Content-Type");
        assert_eq!(title_case("x-request-id"), "X-Request-Id");
        assert_eq!(title_case("accept"), "Accept");
    }
}
