// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Nuotta CLI
//!
//! Captures traffic for a list of URLs, or replays exported capture logs
//! into a user listing.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context};

use nuotta::{
    replay_logs, Capture, CaptureConfig, DirectorySaver, HttpClient, Request, TransportHost, UserRegistry,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("nuotta=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "capture" => capture_urls(&args[2..]).await,
        "users" => replay_users(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        "--version" | "-v" | "version" => {
            println!("nuotta {}", nuotta::VERSION);
            return ExitCode::SUCCESS;
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            return ExitCode::from(1);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"Nuotta - Redacting traffic capture for Slack web clients

USAGE:
    nuotta <COMMAND> [OPTIONS]

COMMANDS:
    capture [--users] [--out DIR] <url>...
                    Fetch URLs through a capture and save the redacted log
    users <log.ndjson>...
                    Replay capture logs and print users as NDJSON
    help            Show this help message
    version         Show version information

EXAMPLES:
    nuotta capture --users --out captures https://app.slack.com/api/users.list
    nuotta users slack_capture_*.ndjson > users.ndjson

Set RUST_LOG=nuotta=debug to see every captured exchange.
"#
    );
}

struct CaptureArgs {
    users: bool,
    out: PathBuf,
    urls: Vec<String>,
}

fn parse_capture_args(args: &[String]) -> anyhow::Result<CaptureArgs> {
    let mut parsed = CaptureArgs {
        users: false,
        out: PathBuf::from("."),
        urls: Vec::new(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--users" => parsed.users = true,
            "--out" => {
                let dir = iter.next().context("--out needs a directory")?;
                parsed.out = PathBuf::from(dir);
            }
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            url => parsed.urls.push(url.to_string()),
        }
    }

    if parsed.urls.is_empty() {
        bail!("Usage: nuotta capture [--users] [--out DIR] <url>...");
    }
    Ok(parsed)
}

async fn capture_urls(args: &[String]) -> anyhow::Result<()> {
    let args = parse_capture_args(args)?;

    let host = Arc::new(TransportHost::with_client(HttpClient::new()?));
    let config = CaptureConfig::any_host().user_capture(args.users);
    let capture = Capture::install(host.clone(), config)?
        .with_saver(Arc::new(DirectorySaver::new(&args.out)));

    for url in &args.urls {
        let request = Request::get(url).with_context(|| format!("invalid URL {}", url))?;
        match host.fetch(request).await {
            Ok(response) => println!(
                "{} {} ({} bytes, {}ms)",
                response.status_code(),
                url,
                response.body_len(),
                response.response_time_ms
            ),
            Err(e) => eprintln!("Failed to fetch {}: {}", url, e),
        }
    }

    let status = capture.status();
    println!(
        "\nCaptured {} entries (~{} bytes), {} users",
        status.entries, status.approx_bytes, status.users
    );

    let log = capture.download(None)?;
    println!("Log saved to {}", log.display());
    if args.users {
        let users = capture.download_users(None)?;
        println!("Users saved to {}", users.display());
    }

    capture.stop();
    Ok(())
}

fn replay_users(paths: &[String]) -> anyhow::Result<()> {
    if paths.is_empty() {
        bail!("Usage: nuotta users <log.ndjson>...");
    }

    let mut registry = UserRegistry::new();
    let counts = replay_logs(paths, &mut registry)?;

    print!("{}", registry.export_ndjson()?);
    eprintln!(
        "files={} lines={} users={} skipped={} unique={}",
        counts.files,
        counts.lines,
        counts.users,
        counts.skipped,
        registry.len()
    );
    Ok(())
}
