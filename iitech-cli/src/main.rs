//! Command-line interface for iitech
//! Applies YAML transformation documents to the newsletter HTML template.
//!
//! Usage:
//!   iitech transform `<template>` `<transforms>` [-o `<output>`] [--server-root `<url>`]
//!   iitech check `<transforms>`
//!   iitech review `<template>` [-o `<output>`]
//!
//! Exit status is 0 when every entry applied (or parsed, for `check`), 1 when any entry did
//! not, and 2 when nothing could be run at all.

mod commands;

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn build_cli() -> Command {
    Command::new("iitech")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Apply YAML transformations to the newsletter template")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_name("FILE")
                .help("TOML file layered over the built-in defaults"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .global(true)
                .value_parser(["text", "json"])
                .default_value("text")
                .help("How outcomes are reported on stdout"),
        )
        .subcommand(
            Command::new("transform")
                .about("Apply a transformation document to a template")
                .arg(
                    Arg::new("template")
                        .help("Newsletter HTML template")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("transforms")
                        .help("YAML transformation document")
                        .required(true)
                        .index(2),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("Write the result here instead of overwriting the template"),
                )
                .arg(
                    Arg::new("server-root")
                        .long("server-root")
                        .value_name("URL")
                        .help("Base URL for relative image sources and file links"),
                ),
        )
        .subcommand(
            Command::new("review")
                .about("Normalize the outbound links of a template")
                .arg(
                    Arg::new("template")
                        .help("Newsletter HTML template")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .value_name("FILE")
                        .help("Write the result here instead of overwriting the template"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Parse a transformation document and report malformed entries")
                .arg(
                    Arg::new("transforms")
                        .help("YAML transformation document")
                        .required(true)
                        .index(1),
                ),
        )
}

fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    match run(&matches) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(2)
        }
    }
}

/// Returns whether every entry went through.
fn run(matches: &ArgMatches) -> anyhow::Result<bool> {
    let mut loader = iitech_config::Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        loader = loader.with_file(path);
    }
    if let Some(("transform", sub)) = matches.subcommand() {
        if let Some(root) = sub.get_one::<String>("server-root") {
            loader = loader.set_override("render.server_root", root.as_str())?;
        }
    }
    let config = loader.build().context("failed to load configuration")?;

    init_logging(&config.logging.level);

    let format = commands::OutputFormat::from_arg(
        matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text"),
    );

    match matches.subcommand() {
        Some(("transform", sub)) => {
            let template = required(sub, "template")?;
            let transforms = required(sub, "transforms")?;
            let output = sub.get_one::<String>("output").unwrap_or(template);
            commands::transform(&config, template, transforms, output, format)
        }
        Some(("review", sub)) => {
            let template = required(sub, "template")?;
            let output = sub.get_one::<String>("output").unwrap_or(template);
            commands::review(&config, template, output, format)
        }
        Some(("check", sub)) => commands::check(required(sub, "transforms")?, format),
        _ => anyhow::bail!("no command given"),
    }
}

fn required<'a>(matches: &'a ArgMatches, name: &str) -> anyhow::Result<&'a String> {
    matches
        .get_one::<String>(name)
        .with_context(|| format!("missing argument <{}>", name))
}

/// Log to stderr, filtered by `RUST_LOG` or else the configured level.
fn init_logging(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
