//! The `transform`, `review` and `check` subcommands

use anyhow::Context;
use iitech_config::IitechConfig;
use iitech_engine::{apply_transformations, TransformationDocument, TransformationOutcome};
use iitech_template::TemplateDocument;
use serde::Serialize;
use std::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_arg(value: &str) -> Self {
        match value {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

fn load_transformations(path: &str) -> anyhow::Result<TransformationDocument> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read transformations from {}", path))?;
    TransformationDocument::from_yaml(&source)
        .with_context(|| format!("failed to load transformations from {}", path))
}

/// Apply `transforms` to `template` and write the page to `output`. The page is written even
/// when some entries fail, since the ones that applied are independent of them.
pub fn transform(
    config: &IitechConfig,
    template: &str,
    transforms: &str,
    output: &str,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    let options = config
        .render
        .render_options()
        .context("invalid render.server_root")?;
    let transformations = load_transformations(transforms)?;

    let mut page = load_template(config, template)?;

    let outcomes = apply_transformations(&mut page, transformations.entries(), &options);

    let rendered = page.to_html()?;
    fs::write(output, rendered).with_context(|| format!("failed to write {}", output))?;
    tracing::info!(output, entries = outcomes.len(), "wrote newsletter");

    match format {
        OutputFormat::Text => {
            for outcome in &outcomes {
                println!("{}", describe(outcome));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcomes)?),
    }

    Ok(outcomes.iter().all(TransformationOutcome::is_applied))
}

fn load_template(config: &IitechConfig, template: &str) -> anyhow::Result<TemplateDocument> {
    let html = fs::read_to_string(template)
        .with_context(|| format!("failed to read template {}", template))?;
    TemplateDocument::parse(&html, &config.template)
        .with_context(|| format!("failed to load template {}", template))
}

/// Normalize the outbound links of `template` and write the page to `output`.
pub fn review(
    config: &IitechConfig,
    template: &str,
    output: &str,
    format: OutputFormat,
) -> anyhow::Result<bool> {
    let mut page = load_template(config, template)?;
    let report = page.review();

    let rendered = page.to_html()?;
    fs::write(output, rendered).with_context(|| format!("failed to write {}", output))?;
    tracing::info!(output, links = report.external, "wrote reviewed newsletter");

    match format {
        OutputFormat::Text => println!(
            "reviewed {} links: {} retargeted, {} untracked, {} removed",
            report.external, report.retargeted, report.untracked, report.removed
        ),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(true)
}

fn describe(outcome: &TransformationOutcome) -> String {
    match outcome {
        TransformationOutcome::Applied { identifier } => format!("applied    {}", identifier),
        TransformationOutcome::TargetNotFound { identifier } => {
            format!("not found  {}", identifier)
        }
        TransformationOutcome::ConfigurationError { identifier, error } => {
            format!("error      {}: {}", identifier, error)
        }
    }
}

#[derive(Debug, Serialize)]
struct CheckReport<'a> {
    identifier: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Parse `transforms` without touching a template.
pub fn check(transforms: &str, format: OutputFormat) -> anyhow::Result<bool> {
    let transformations = load_transformations(transforms)?;
    let reports: Vec<_> = transformations
        .entries()
        .iter()
        .map(|entry| CheckReport {
            identifier: &entry.identifier,
            error: entry.parsed.as_ref().err().map(ToString::to_string),
        })
        .collect();

    match format {
        OutputFormat::Text => {
            for report in &reports {
                match &report.error {
                    None => println!("ok         {}", report.identifier),
                    Some(error) => println!("error      {}: {}", report.identifier, error),
                }
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
    }

    Ok(reports.iter().all(|report| report.error.is_none()))
}
