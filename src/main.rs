// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-QuerySculptor-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of QuerySculptor and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! QuerySculptor entrypoint.
//!
//! Serves MCP over stdio by default (intended for tool integrations). With
//! `--http`, serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};
use tracing::info;

use querysculptor::config::Config;
use querysculptor::mcp::{App, SculptorMcp};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--http] [--http-port <port>]\n\nServes MCP over stdio by default.\n--http serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`.\n--http-port overrides the configured port and implies --http.\n\nConfiguration comes from the environment: DEFAULT_GRAPHQL_ENDPOINT (required),\nDEFAULT_GRAPHQL_HEADERS, REDIS_URL, REQUEST_TIMEOUT_SECS, EXECUTE_TIMEOUT_SECS,\nQUERYSCULPTOR_HTTP_PORT."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    http: bool,
    http_port: Option<u16>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--http" => {
                if options.http {
                    return Err(());
                }
                options.http = true;
            }
            "--http-port" => {
                if options.http_port.is_some() {
                    return Err(());
                }
                let raw = args.next().ok_or(())?;
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.http_port = Some(port);
            }
            _ => return Err(()),
        }
    }

    Ok(options)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "querysculptor=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "querysculptor".to_owned());
    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            std::process::exit(2);
        }
    };

    let config = Config::from_env()?;
    let http_port = options.http_port.unwrap_or(config.http_port);
    let serve_http = options.http || options.http_port.is_some();

    let app = Arc::new(App::new(config));
    let mcp = SculptorMcp::new(app);

    if serve_http {
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", http_port)).await?;
        info!(port = http_port, "serving MCP over streamable HTTP at /mcp");

        let server_config = StreamableHttpServerConfig {
            stateful_mode: true,
            ..StreamableHttpServerConfig::default()
        };
        let session_manager = Arc::new(LocalSessionManager::default());
        let service = {
            let mcp = mcp.clone();
            StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, server_config)
        };
        let router = Router::new().nest_service("/mcp", service);

        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                tokio::signal::ctrl_c().await.ok();
            })
            .await?;
    } else {
        mcp.serve_stdio().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions};

    #[test]
    fn parses_empty_args() {
        let options = parse_options(std::iter::empty()).expect("parse options");
        assert_eq!(options, CliOptions::default());
    }

    #[test]
    fn parses_http_flag() {
        let options = parse_options(["--http".to_owned()].into_iter()).expect("parse options");
        assert!(options.http);
        assert_eq!(options.http_port, None);
    }

    #[test]
    fn parses_http_port() {
        let options = parse_options(["--http-port".to_owned(), "9000".to_owned()].into_iter())
            .expect("parse options");
        assert_eq!(options.http_port, Some(9000));
    }

    #[test]
    fn rejects_unknown_flags_and_bad_ports() {
        assert!(parse_options(["--nope".to_owned()].into_iter()).is_err());
        assert!(parse_options(["--http-port".to_owned()].into_iter()).is_err());
        assert!(
            parse_options(["--http-port".to_owned(), "a lot".to_owned()].into_iter()).is_err()
        );
        assert!(parse_options(["--http".to_owned(), "--http".to_owned()].into_iter()).is_err());
    }
}
