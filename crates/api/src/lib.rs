//! Enhancement service client utilities.
//!
//! This module provides a lightweight client for talking to the CV
//! enhancement backend. It focuses on:
//!
//! - Constructing an HTTP client with sensible defaults and a request deadline
//! - Discovering the bearer credential from `CVLIFT_API_TOKEN` or the OS
//!   keychain (nothing is ever embedded in the binary)
//! - Validating `CVLIFT_API_BASE` for safety
//! - Building requests with a consistent User-Agent and JSON Accept header
//!
//! The primary entry point is [`EnhancerClient`]. Create an instance via
//! [`EnhancerClient::new_from_env`], then build requests with
//! [`EnhancerClient::request`].

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, Url, header};
use tracing::{debug, warn};

/// Default backend address when `CVLIFT_API_BASE` is unset.
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
/// Environment variable overriding the backend base URL.
pub const API_BASE_ENV: &str = "CVLIFT_API_BASE";
/// Environment variable supplying the bearer token.
pub const API_TOKEN_ENV: &str = "CVLIFT_API_TOKEN";
/// Environment variable overriding the per-request deadline, in seconds.
pub const REQUEST_TIMEOUT_ENV: &str = "CVLIFT_REQUEST_TIMEOUT_SECS";
/// Per-request deadline applied when the env override is unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Keychain service/user pair under which the token may be stored.
const KEYRING_SERVICE: &str = "cvlift";
const KEYRING_USER: &str = "api-token";

/// Hostnames allowed to use plain HTTP for local development.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1", "::1"];

#[derive(Debug, Clone)]
/// Thin wrapper around a configured `reqwest::Client` for backend access.
///
/// The client pre-configures default headers (bearer authorization when a
/// token was discovered, JSON accept) and builds requests against a validated
/// base URL. Every request carries the configured deadline, so a stalled
/// backend fails the call instead of hanging the workflow.
pub struct EnhancerClient {
    pub base_url: String,
    pub http: Client,
    pub user_agent: String,
}

impl EnhancerClient {
    /// Construct an [`EnhancerClient`] from the environment.
    ///
    /// Resolution order for the bearer credential:
    /// - `CVLIFT_API_TOKEN` environment variable
    /// - OS keychain entry (`cvlift` / `api-token`)
    ///
    /// The base URL is taken from `CVLIFT_API_BASE` (if set) or falls back to
    /// the local development default. Non-localhost hosts must use HTTPS.
    /// A missing token is allowed: requests go out unauthenticated and the
    /// backend's 401 surfaces as a step failure.
    pub fn new_from_env() -> Result<Self> {
        let api_token = env::var(API_TOKEN_ENV).ok().filter(|t| !t.is_empty()).or_else(get_keyring_token);
        if api_token.is_none() {
            warn!("no API token found in {API_TOKEN_ENV} or the OS keychain; requests will be unauthenticated");
        }

        let mut default_headers = header::HeaderMap::new();
        if let Some(api_token) = api_token {
            let authorization_header_value = format!("Bearer {}", api_token);
            let mut value = header::HeaderValue::from_str(&authorization_header_value)
                .context("API token contains characters not valid in a header")?;
            value.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, value);
        }
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let timeout = request_timeout();
        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .context("build http client")?;

        let base_url = env::var(API_BASE_ENV).unwrap_or_else(|_| DEFAULT_API_BASE.into());
        validate_base_url(&base_url)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            user_agent: format!("cvlift/0.1; {}", env::consts::OS),
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and API-relative path.
    ///
    /// The resulting request includes the configured User-Agent and default
    /// headers, and is resolved relative to `self.base_url`.
    pub fn request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");

        self.http
            .request(method, url)
            .header(header::USER_AGENT, &self.user_agent)
    }
}

/// Per-request deadline, env-overridable. Falls back to the default on
/// unparsable values rather than failing client construction.
fn request_timeout() -> Duration {
    let secs = env::var(REQUEST_TIMEOUT_ENV)
        .ok()
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost`/`127.0.0.1`/`::1`: any scheme is allowed
/// - otherwise: scheme must be HTTPS
pub fn validate_base_url(base: &str) -> Result<()> {
    let parsed = Url::parse(base).map_err(|e| anyhow!("Invalid {} URL '{}': {}", API_BASE_ENV, base, e))?;

    let host = parsed
        .host_str()
        .ok_or_else(|| anyhow!("{} must include a host", API_BASE_ENV))?;

    if LOCALHOST_DOMAINS.iter().any(|&allowed| host.eq_ignore_ascii_case(allowed)) {
        return Ok(());
    }

    if parsed.scheme() != "https" {
        return Err(anyhow!(
            "{} must use https for non-localhost hosts; got '{}://'",
            API_BASE_ENV,
            parsed.scheme()
        ));
    }

    Ok(())
}

/// Attempt to read the API token from the OS keychain.
///
/// Lookup failures are expected on machines without a stored entry and are
/// logged at debug only.
fn get_keyring_token() -> Option<String> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_USER).ok()?;
    match entry.get_password() {
        Ok(token) if !token.is_empty() => Some(token),
        Ok(_) => None,
        Err(error) => {
            debug!(%error, "no keychain token");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_bases_allow_plain_http() {
        assert!(validate_base_url("http://localhost:8000").is_ok());
        assert!(validate_base_url("http://127.0.0.1:8000").is_ok());
        assert!(validate_base_url("https://localhost").is_ok());
    }

    #[test]
    fn remote_bases_require_https() {
        assert!(validate_base_url("https://api.cvlift.example.com").is_ok());
        assert!(validate_base_url("http://api.cvlift.example.com").is_err());
    }

    #[test]
    fn malformed_bases_are_rejected() {
        assert!(validate_base_url("not a url").is_err());
        assert!(validate_base_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn timeout_env_override_is_used() {
        temp_env::with_var(REQUEST_TIMEOUT_ENV, Some("5"), || {
            assert_eq!(request_timeout(), Duration::from_secs(5));
        });
    }

    #[test]
    fn bad_timeout_values_fall_back_to_default() {
        temp_env::with_var(REQUEST_TIMEOUT_ENV, Some("not-a-number"), || {
            assert_eq!(request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
        temp_env::with_var(REQUEST_TIMEOUT_ENV, Some("0"), || {
            assert_eq!(request_timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        });
    }

    #[test]
    fn client_uses_env_base_url() {
        temp_env::with_vars(
            [(API_BASE_ENV, Some("http://localhost:9999/")), (API_TOKEN_ENV, Some("test-token"))],
            || {
                let client = EnhancerClient::new_from_env().expect("build client");
                assert_eq!(client.base_url, "http://localhost:9999");
            },
        );
    }
}
