use super::GlobalOptions;
use crate::api::DevicePolicy;
use crate::input::{load_mac_statuses, MacStatusEntry};
use anyhow::Result;
use colored::Colorize;
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};
use std::path::Path;

pub fn run(global: &GlobalOptions, csv: Option<&Path>) -> Result<()> {
    let path = global.csv_path(csv)?;
    let entries = load_mac_statuses(&path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", format!("Checking {}", path.display()).bright_cyan())?;
    print_plan(&summarize(&entries), &mut out)?;
    Ok(())
}

/// Offline view of a CSV plan. Group policy names can only be resolved per
/// network, so they are listed rather than validated.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub rows: usize,
    pub direct: BTreeMap<String, usize>,
    pub group_policy_names: BTreeMap<String, usize>,
    pub malformed_macs: Vec<String>,
    pub duplicate_macs: Vec<String>,
}

pub fn summarize(entries: &[MacStatusEntry]) -> PlanSummary {
    let mut summary = PlanSummary {
        rows: entries.len(),
        ..PlanSummary::default()
    };
    let mut seen = HashSet::new();

    for entry in entries {
        let bucket = match entry.status.as_str() {
            DevicePolicy::ALLOWED | DevicePolicy::BLOCKED => &mut summary.direct,
            _ => &mut summary.group_policy_names,
        };
        *bucket.entry(entry.status.clone()).or_default() += 1;

        if !looks_like_mac(&entry.mac) {
            summary.malformed_macs.push(entry.mac.clone());
        }
        if !seen.insert(normalize_mac(&entry.mac)) {
            summary.duplicate_macs.push(entry.mac.clone());
        }
    }

    summary
}

fn normalize_mac(mac: &str) -> String {
    mac.chars()
        .filter(|c| !matches!(c, ':' | '-' | '.'))
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Twelve hex digits, optionally separated by `:`, `-` or `.`
pub fn looks_like_mac(mac: &str) -> bool {
    let digits = normalize_mac(mac);
    digits.len() == 12 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

fn print_plan<W: Write + ?Sized>(summary: &PlanSummary, out: &mut W) -> io::Result<()> {
    writeln!(out, "  {} data rows", summary.rows)?;

    for (status, count) in &summary.direct {
        writeln!(out, "  ✓ {} → {}", count, status.green())?;
    }
    for (name, count) in &summary.group_policy_names {
        writeln!(
            out,
            "  ? {} → {} (group policy; must exist in each network)",
            count,
            name.yellow()
        )?;
    }

    if !summary.malformed_macs.is_empty() {
        writeln!(out, "{}", "  ⚠ Values that do not look like MAC addresses:".yellow())?;
        for mac in &summary.malformed_macs {
            writeln!(out, "    - {}", mac)?;
        }
    }
    if !summary.duplicate_macs.is_empty() {
        writeln!(out, "{}", "  ⚠ Repeated MAC addresses (last row wins):".yellow())?;
        for mac in &summary.duplicate_macs {
            writeln!(out, "    - {}", mac)?;
        }
    }

    Ok(())
}
