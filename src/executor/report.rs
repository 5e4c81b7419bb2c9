use colored::Colorize;
use std::collections::BTreeMap;
use std::io::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// Dashboard answered 201 Created
    Provisioned,
    /// Dry run: payload resolved, nothing sent
    Planned,
    /// Request sent (or attempted) and not created
    Failed { status: Option<u16>, reason: String },
    /// Status matched neither a direct policy nor a group policy of the network
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub network_id: String,
    pub network_name: String,
    pub mac: String,
    pub status: String,
    pub outcome: EntryOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedNetwork {
    pub network_id: String,
    pub network_name: String,
    pub reason: String,
}

/// Everything that happened during one provisioning run
#[derive(Debug, Default)]
pub struct ProvisionReport {
    pub entries: Vec<EntryReport>,
    pub skipped_networks: Vec<SkippedNetwork>,
}

impl ProvisionReport {
    pub fn count(&self, matches: impl Fn(&EntryOutcome) -> bool) -> usize {
        self.entries.iter().filter(|e| matches(&e.outcome)).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| *o == EntryOutcome::Provisioned)
    }

    pub fn planned(&self) -> usize {
        self.count(|o| *o == EntryOutcome::Planned)
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, EntryOutcome::Failed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| *o == EntryOutcome::Skipped)
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn print_summary<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{}", "Summary".bold())?;
        writeln!(out, "  ✓ {} provisioned", self.succeeded().to_string().green())?;
        if self.planned() > 0 {
            writeln!(out, "  → {} planned (dry run)", self.planned().to_string().cyan())?;
        }
        writeln!(out, "  ⊘ {} skipped", self.skipped().to_string().yellow())?;
        writeln!(out, "  ✗ {} failed", self.failed().to_string().red())?;

        if !self.skipped_networks.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "Skipped networks:".yellow().bold())?;
            for network in &self.skipped_networks {
                writeln!(out, "  ⊘ {}", network.network_name.yellow())?;
                writeln!(out, "     Reason: {}", network.reason)?;
            }
        }

        let mut failures_by_network: BTreeMap<&str, Vec<&EntryReport>> = BTreeMap::new();
        for entry in &self.entries {
            if matches!(entry.outcome, EntryOutcome::Failed { .. }) {
                failures_by_network
                    .entry(entry.network_name.as_str())
                    .or_default()
                    .push(entry);
            }
        }

        if !failures_by_network.is_empty() {
            writeln!(out)?;
            writeln!(out, "{}", "Failed provisioning:".red().bold())?;
            for (network, failures) in failures_by_network {
                writeln!(out, "  {}:", network.red())?;
                for failure in failures {
                    if let EntryOutcome::Failed { reason, .. } = &failure.outcome {
                        writeln!(out, "    - {} → {}: {}", failure.mac, failure.status, reason)?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
impl ProvisionReport {
    /// Provisioning requests issued (or planned) against one network
    pub fn attempts_for(&self, network_id: &str) -> usize {
        self.entries
            .iter()
            .filter(|e| e.network_id == network_id && e.outcome != EntryOutcome::Skipped)
            .count()
    }
}
