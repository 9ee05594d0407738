//! Public IP lookup
//!
//! Asks each provider in turn; the first usable answer wins.

#![allow(clippy::result_large_err)]

use crate::client::{default_client, ClientOptions};
use paladin_core::errors::{ExError, ExErrorKind, Result};
use paladin_core::utils::strutil::ip_version;
use paladin_core::HttpClientConfig;

/// A JSON endpoint that reports the caller's address in one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpProvider<'a> {
    pub name: &'a str,
    pub base_url: &'a str,
    pub path: &'a str,
    pub field: &'a str,
}

pub const IPINFO: IpProvider<'static> = IpProvider {
    name: "ipinfo",
    base_url: "https://ipinfo.io",
    path: "/json",
    field: "ip",
};

pub const IP_API: IpProvider<'static> = IpProvider {
    name: "ip-api",
    base_url: "http://ip-api.com",
    path: "/json",
    field: "query",
};

pub const DEFAULT_PROVIDERS: &[IpProvider<'static>] = &[IPINFO, IP_API];

impl IpProvider<'_> {
    /// # Errors
    ///
    /// Transport and status errors from the client, or `ExternalService`
    /// when the field is missing or not an IP address.
    pub fn public_ip(&self, conf: &HttpClientConfig) -> Result<String> {
        let client = default_client(
            ClientOptions::new()
                .base_url(self.base_url)
                .raise_for_status(true),
            conf,
        )?;
        let body: serde_json::Value = client.get(self.path)?.json()?;

        body.get(self.field)
            .and_then(|v| v.as_str())
            .filter(|ip| ip_version(ip).is_some())
            .map(str::to_string)
            .ok_or_else(|| {
                ExError::new(ExErrorKind::ExternalService)
                    .with_op("public_ip")
                    .with_message(format!("{}: no address in field `{}`", self.name, self.field))
            })
    }
}

/// Public IP of this host, from the default providers
///
/// # Errors
///
/// `ExternalService` when every provider fails.
pub fn public_ip(conf: &HttpClientConfig) -> Result<String> {
    public_ip_from(DEFAULT_PROVIDERS, conf)
}

/// Public IP from the first provider that answers
///
/// # Errors
///
/// `ExternalService` when every provider fails; the last failure is kept as
/// the source.
pub fn public_ip_from(providers: &[IpProvider<'_>], conf: &HttpClientConfig) -> Result<String> {
    let mut last_error = None;
    for provider in providers {
        match provider.public_ip(conf) {
            Ok(ip) => return Ok(ip),
            Err(err) => {
                tracing::debug!(provider = provider.name, error = %err, "public ip lookup failed");
                last_error = Some(err);
            }
        }
    }

    let err = ExError::new(ExErrorKind::ExternalService)
        .with_op("public_ip")
        .with_message("get public ip failed");
    Err(match last_error {
        Some(source) => err.with_source(source),
        None => err,
    })
}
