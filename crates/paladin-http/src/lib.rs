//! Paladin HTTP - blocking client with logging hooks
//!
//! Provides:
//! - `default_client`: a reqwest client that logs every request and response
//! - Optional TRACE detail (headers, elapsed, text bodies)
//! - `raise_for_status` and connect-error retries
//! - Public IP lookup against free providers

pub mod client;
pub mod hooks;
pub mod ipinfo;

// Re-export key types
pub use client::{default_client, ClientOptions, HttpClient, HttpResponse};
pub use reqwest::Method;
pub use reqwest::header;
