//! `analyze` subcommand: score one listing and print the audit report.

use std::fmt::Write as _;
use std::io::Read as _;
use std::sync::Arc;

use localvis_core::{EngineConfig, ScoreResult};
use localvis_engine::{Engine, RawFields};
use serde_json::Value;

/// Score the listing in `input` and print a text or JSON report to stdout.
///
/// The country comes from `--country`, falling back to a `country` string in
/// the input object.
///
/// # Errors
///
/// Returns an error if the input cannot be read or is not a JSON object, no
/// country is given, the weight table is unknown, or a field fails
/// validation (the message names the field).
pub(crate) fn run_analyze(
    config: Arc<EngineConfig>,
    input: &str,
    country: Option<&str>,
    table: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let raw = read_fields(input)?;
    let country = resolve_country(country, &raw)?;
    tracing::debug!(input, country = %country, fields = raw.len(), "analyzing listing");

    let mut engine = Engine::new(config)?;
    if let Some(table) = table {
        engine = engine.with_default_table(table)?;
    }

    let result = engine.analyze(&raw, &country).map_err(|e| {
        anyhow::anyhow!("invalid value for field '{}' ({}): {e}", e.field(), e.code())
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let name = raw.get("business_name").and_then(Value::as_str);
        print!("{}", render_report(&result, name)?);
    }
    Ok(())
}

fn read_fields(input: &str) -> anyhow::Result<RawFields> {
    let text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| anyhow::anyhow!("failed to read input file {input}: {e}"))?
    };
    parse_fields(&text)
}

pub(crate) fn parse_fields(text: &str) -> anyhow::Result<RawFields> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("input must be a JSON object of listing fields, got {other}"),
    }
}

pub(crate) fn resolve_country(flag: Option<&str>, raw: &RawFields) -> anyhow::Result<String> {
    flag.or_else(|| raw.get("country").and_then(Value::as_str))
        .map(|c| c.trim().to_ascii_uppercase())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!("no country given; pass --country or add a \"country\" field")
        })
}

/// Plain-text audit report.
pub(crate) fn render_report(
    result: &ScoreResult,
    business_name: Option<&str>,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    let currency = &result.revenue_loss.currency;

    if let Some(name) = business_name {
        writeln!(out, "Listing: {name}")?;
    }
    writeln!(
        out,
        "Visibility score: {}/100 - {} ({}), severity {}",
        result.total_score,
        result.label,
        result.label.display_es(),
        result.severity.as_str(),
    )?;
    writeln!(
        out,
        "Country: {}  Table: {}  Analyzed: {}",
        result.country,
        result.weight_table,
        result.analyzed_at.format("%Y-%m-%d %H:%M UTC")
    )?;
    if let Some(gap) = &result.configuration_gap {
        writeln!(
            out,
            "note: no market profile for {}; default market assumptions used",
            gap.requested_country
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{:<14}{:>7}{:>5}", "DIMENSION", "POINTS", "MAX")?;
    for dim in &result.dimension_scores {
        writeln!(out, "{:<14}{:>7}{:>5}", dim.name, dim.points, dim.max_points)?;
    }

    let loss = &result.revenue_loss;
    writeln!(out)?;
    writeln!(out, "Lost customers/month: {}", loss.lost_customers_per_month)?;
    writeln!(out, "Lost revenue/month:   {:.2} {currency}", loss.monthly_loss)?;
    writeln!(out, "Lost revenue/year:    {:.2} {currency}", loss.annual_loss)?;
    writeln!(
        out,
        "Estimated rank:       #{} (up to {} positions recoverable)",
        result.rank.estimated_rank, result.rank.improvement_potential
    )?;

    writeln!(out)?;
    if result.critical_issues.is_empty() {
        writeln!(out, "No critical issues found.")?;
    } else {
        writeln!(out, "ISSUES")?;
        for issue in &result.critical_issues {
            writeln!(
                out,
                "- {} [{}] ~{:.2} {currency}/month",
                issue.title,
                issue.kind.as_str(),
                issue.estimated_monthly_impact
            )?;
            writeln!(out, "  {}", issue.description)?;
        }
    }
    Ok(out)
}
