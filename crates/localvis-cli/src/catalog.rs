//! Read-only listings of the loaded engine configuration.

use std::fmt::Write as _;

use localvis_core::{EngineConfig, DEFAULT_MARKET_KEY};

/// One block per weight table; the default table is marked.
pub(crate) fn render_tables(config: &EngineConfig) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for (name, table) in &config.weight_tables {
        let marker = if *name == config.default_weight_table {
            " (default)"
        } else {
            ""
        };
        writeln!(out, "{name}{marker}")?;
        for entry in table.entries() {
            writeln!(out, "  {:<14}{:>4}", entry.dimension, entry.weight)?;
        }
    }
    Ok(out)
}

/// Market assumptions table, configured countries first, then the fallback.
pub(crate) fn render_markets(config: &EngineConfig) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(
        out,
        "{:<9}{:<20}{:>10}{:>12}  CURRENCY",
        "CODE", "MARKET", "SEARCHES", "TICKET"
    )?;
    let rows = config
        .markets
        .iter()
        .map(|(code, profile)| (code.as_str(), profile))
        .chain(std::iter::once((DEFAULT_MARKET_KEY, &config.default_market)));
    for (code, profile) in rows {
        writeln!(
            out,
            "{:<9}{:<20}{:>10}{:>12}  {}",
            code,
            profile.name,
            profile.monthly_search_volume,
            profile.average_ticket.to_string(),
            profile.currency
        )?;
    }
    writeln!(out, "conversion rate: {}", config.conversion_rate)?;
    Ok(out)
}
