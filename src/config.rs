// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Environment configuration.
//!
//! The upstream endpoint is fixed at startup; agents can never supply a URL.

use std::env;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;

pub const MAX_HEADER_KEY_LENGTH: usize = 100;
pub const MAX_HEADER_VALUE_LENGTH: usize = 1000;

pub const DEFAULT_HTTP_PORT: u16 = 27447;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_EXECUTE_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// The single upstream GraphQL endpoint every request targets.
    pub endpoint: String,
    /// Headers merged under session headers on every outbound call.
    pub default_headers: IndexMap<String, String>,
    pub redis_url: Option<String>,
    /// Bound for introspection and other non-execute outbound calls.
    pub request_timeout: Duration,
    /// Bound for the execute path.
    pub execute_timeout: Duration,
    /// Port for `--http` mode.
    pub http_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let endpoint = env::var("DEFAULT_GRAPHQL_ENDPOINT")
            .context("DEFAULT_GRAPHQL_ENDPOINT is required")?;

        let default_headers = match env::var("DEFAULT_GRAPHQL_HEADERS") {
            Ok(raw) if !raw.trim().is_empty() => parse_default_headers(&raw)?,
            _ => IndexMap::new(),
        };

        let redis_url = env::var("REDIS_URL").ok().filter(|url| !url.is_empty());

        let request_timeout = Duration::from_secs(
            env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse::<u64>().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        );
        let execute_timeout = Duration::from_secs(
            env::var("EXECUTE_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse::<u64>().ok())
                .unwrap_or(DEFAULT_EXECUTE_TIMEOUT_SECS),
        );

        let http_port = env::var("QUERYSCULPTOR_HTTP_PORT")
            .ok()
            .and_then(|raw| raw.parse::<u16>().ok())
            .unwrap_or(DEFAULT_HTTP_PORT);

        Ok(Self {
            endpoint,
            default_headers,
            redis_url,
            request_timeout,
            execute_timeout,
            http_port,
        })
    }
}

fn parse_default_headers(raw: &str) -> Result<IndexMap<String, String>> {
    let parsed: serde_json::Value =
        serde_json::from_str(raw).context("DEFAULT_GRAPHQL_HEADERS must be valid JSON")?;
    let object = parsed
        .as_object()
        .context("DEFAULT_GRAPHQL_HEADERS must be a JSON object of string values")?;

    let mut headers = IndexMap::new();
    for (key, value) in object {
        let Some(value) = value.as_str() else {
            bail!("DEFAULT_GRAPHQL_HEADERS value for '{key}' must be a string");
        };
        if key.chars().count() > MAX_HEADER_KEY_LENGTH {
            bail!("DEFAULT_GRAPHQL_HEADERS name '{key}' exceeds {MAX_HEADER_KEY_LENGTH} characters");
        }
        if value.chars().count() > MAX_HEADER_VALUE_LENGTH {
            bail!(
                "DEFAULT_GRAPHQL_HEADERS value for '{key}' exceeds {MAX_HEADER_VALUE_LENGTH} characters"
            );
        }
        headers.insert(key.clone(), value.to_owned());
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::parse_default_headers;

    #[test]
    fn parses_string_object() {
        let headers =
            parse_default_headers(r#"{"authorization": "Bearer token", "x-team": "dex"}"#)
                .expect("parse");
        assert_eq!(headers.get("authorization").map(String::as_str), Some("Bearer token"));
        assert_eq!(headers.get("x-team").map(String::as_str), Some("dex"));
    }

    #[test]
    fn rejects_non_object_and_non_string_values() {
        assert!(parse_default_headers("[]").is_err());
        assert!(parse_default_headers(r#"{"retries": 3}"#).is_err());
        assert!(parse_default_headers("not json").is_err());
    }

    #[test]
    fn rejects_oversized_keys_and_values() {
        let long_key = format!(r#"{{"{}": "v"}}"#, "k".repeat(101));
        assert!(parse_default_headers(&long_key).is_err());

        let long_value = format!(r#"{{"k": "{}"}}"#, "v".repeat(1001));
        assert!(parse_default_headers(&long_value).is_err());
    }
}
