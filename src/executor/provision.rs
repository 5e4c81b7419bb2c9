use super::report::{EntryOutcome, EntryReport, ProvisionReport, SkippedNetwork};
use crate::api::{policy_index, DashboardApi, DevicePolicy, Network, ProvisionPayload};
use crate::input::MacStatusEntry;
use crate::select::status_suffix;
use anyhow::Result;
use colored::Colorize;
use std::collections::HashMap;
use std::io::Write;

/// Resolve the provisioning payload for one entry against a network's policy index.
///
/// `None` means the status is neither a direct policy nor one of the network's
/// group policies.
pub fn build_payload(
    entry: &MacStatusEntry,
    policies: &HashMap<&str, &str>,
) -> Option<ProvisionPayload> {
    DevicePolicy::resolve(&entry.status, policies)
        .map(|policy| ProvisionPayload::new(&entry.mac, &policy))
}

/// Applies a MAC → status plan to each selected network in turn.
pub struct Provisioner<'a, A: DashboardApi + ?Sized> {
    api: &'a A,
    dry_run: bool,
}

impl<'a, A: DashboardApi + ?Sized> Provisioner<'a, A> {
    pub fn new(api: &'a A, dry_run: bool) -> Self {
        Self { api, dry_run }
    }

    /// Provision every entry on every network, in order.
    ///
    /// Failures are recorded per network or per entry and never stop the run; the
    /// only error returned is a failure to write to `out`.
    pub fn run<W: Write + ?Sized>(
        &self,
        networks: &[Network],
        entries: &[MacStatusEntry],
        out: &mut W,
    ) -> Result<ProvisionReport> {
        let mut report = ProvisionReport::default();

        if self.dry_run {
            writeln!(out, "{}", "[DRY RUN MODE]".yellow().bold())?;
            writeln!(out)?;
        }

        for network in networks {
            self.provision_network(network, entries, out, &mut report)?;
            writeln!(out)?;
        }

        Ok(report)
    }

    fn provision_network<W: Write + ?Sized>(
        &self,
        network: &Network,
        entries: &[MacStatusEntry],
        out: &mut W,
        report: &mut ProvisionReport,
    ) -> Result<()> {
        writeln!(out, "{}:", network.name.blue())?;

        let policies = match self.api.list_group_policies(&network.id) {
            Ok(policies) => policies,
            Err(e) => {
                let reason = status_suffix(&e);
                log::warn!("Group policies for {} unavailable: {}", network.id, e);
                writeln!(
                    out,
                    "{} {}",
                    format!("Failed to retrieve group policies for {}.", network.name).red(),
                    reason
                )?;
                report.skipped_networks.push(SkippedNetwork {
                    network_id: network.id.clone(),
                    network_name: network.name.clone(),
                    reason,
                });
                return Ok(());
            }
        };
        log::debug!("{} has {} group policies", network.name, policies.len());
        let index = policy_index(&policies);

        let total = entries.len();
        for (i, entry) in entries.iter().enumerate() {
            writeln!(
                out,
                "- Updating policy for MAC address {} to {} policy ({} of {})",
                entry.mac.blue(),
                entry.status.yellow(),
                (i + 1).to_string().blue(),
                total.to_string().blue()
            )?;

            let outcome = match build_payload(entry, &index) {
                Some(payload) => self.send(network, entry, &payload, out)?,
                None => {
                    writeln!(
                        out,
                        "  - {} Skipping...",
                        format!("Invalid status/policy for MAC address {}.", entry.mac).red()
                    )?;
                    EntryOutcome::Skipped
                }
            };

            report.entries.push(EntryReport {
                network_id: network.id.clone(),
                network_name: network.name.clone(),
                mac: entry.mac.clone(),
                status: entry.status.clone(),
                outcome,
            });
        }

        Ok(())
    }

    fn send<W: Write + ?Sized>(
        &self,
        network: &Network,
        entry: &MacStatusEntry,
        payload: &ProvisionPayload,
        out: &mut W,
    ) -> Result<EntryOutcome> {
        if self.dry_run {
            writeln!(
                out,
                "  → Would send: {}",
                serde_json::to_string(payload)?.yellow()
            )?;
            return Ok(EntryOutcome::Planned);
        }

        match self.api.provision_clients(&network.id, payload) {
            Ok(()) => {
                writeln!(out, "  - {}", "Success!".green())?;
                Ok(EntryOutcome::Provisioned)
            }
            Err(e) => {
                let reason = status_suffix(&e);
                log::warn!("Provisioning {} on {} failed: {}", entry.mac, network.id, e);
                writeln!(
                    out,
                    "  - {} {}",
                    format!(
                        "Failed to update {} to {} policy.",
                        entry.mac, entry.status
                    )
                    .red(),
                    reason
                )?;
                Ok(EntryOutcome::Failed {
                    status: e.status(),
                    reason,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeDashboard;
    use crate::api::GroupPolicy;
    use serde_json::json;

    fn entry(mac: &str, status: &str) -> MacStatusEntry {
        MacStatusEntry {
            mac: mac.to_string(),
            status: status.to_string(),
        }
    }

    fn network(id: &str, name: &str) -> Network {
        Network {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    fn guest_policy() -> GroupPolicy {
        GroupPolicy {
            id: "123".into(),
            name: "Guest".into(),
        }
    }

    #[test]
    fn allowed_entry_with_no_policies_is_posted() {
        let api = FakeDashboard::default().with_policies("N_1", Vec::new());
        let mut out = Vec::<u8>::new();

        let report = Provisioner::new(&api, false)
            .run(
                &[network("N_1", "HQ")],
                &[entry("AA:BB:CC:DD:EE:FF", "Allowed")],
                &mut out,
            )
            .unwrap();

        let sent = api.provisioned.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "N_1");
        assert_eq!(
            serde_json::to_value(&sent[0].1).unwrap(),
            json!({"clients": [{"mac": "AA:BB:CC:DD:EE:FF"}], "devicePolicy": "Allowed"})
        );
        assert_eq!(report.succeeded(), 1);
        assert!(String::from_utf8(out).unwrap().contains("Success!"));
    }

    #[test]
    fn named_status_resolves_to_group_policy() {
        let api = FakeDashboard::default().with_policies("N_1", vec![guest_policy()]);
        let mut out = Vec::<u8>::new();

        Provisioner::new(&api, false)
            .run(&[network("N_1", "HQ")], &[entry("AA:BB:CC:DD:EE:FF", "Guest")], &mut out)
            .unwrap();

        let sent = api.provisioned.borrow();
        assert_eq!(sent[0].1.device_policy, "Group Policy");
        assert_eq!(sent[0].1.group_policy_id.as_deref(), Some("123"));
    }

    #[test]
    fn unknown_status_is_skipped_without_a_request() {
        let api = FakeDashboard::default().with_policies("N_1", vec![guest_policy()]);
        let mut out = Vec::<u8>::new();

        let report = Provisioner::new(&api, false)
            .run(
                &[network("N_1", "HQ")],
                &[entry("AA:BB:CC:DD:EE:FF", "Contractors")],
                &mut out,
            )
            .unwrap();

        assert!(api.provisioned.borrow().is_empty());
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.entries.len(), 1);
        assert!(String::from_utf8(out).unwrap().contains("Skipping..."));
    }

    #[test]
    fn attempts_match_resolvable_rows_per_network() {
        // "Guest" only exists on N_2.
        let api = FakeDashboard::default()
            .with_policies("N_1", Vec::new())
            .with_policies("N_2", vec![guest_policy()]);
        let entries = vec![
            entry("00:00:00:00:00:01", "Allowed"),
            entry("00:00:00:00:00:02", "Guest"),
            entry("00:00:00:00:00:03", "Blocked"),
            entry("00:00:00:00:00:04", "blocked"),
        ];
        let mut out = Vec::<u8>::new();

        let report = Provisioner::new(&api, false)
            .run(&[network("N_1", "HQ"), network("N_2", "Branch")], &entries, &mut out)
            .unwrap();

        assert_eq!(report.attempts_for("N_1"), 2);
        assert_eq!(report.attempts_for("N_2"), 3);
        assert_eq!(report.skipped(), 3);

        let sent: Vec<(String, String)> = api
            .provisioned
            .borrow()
            .iter()
            .map(|(net, p)| (net.clone(), p.clients[0].mac.clone()))
            .collect();
        assert_eq!(
            sent,
            vec![
                ("N_1".into(), "00:00:00:00:00:01".into()),
                ("N_1".into(), "00:00:00:00:00:03".into()),
                ("N_2".into(), "00:00:00:00:00:01".into()),
                ("N_2".into(), "00:00:00:00:00:02".into()),
                ("N_2".into(), "00:00:00:00:00:03".into()),
            ]
        );
    }

    #[test]
    fn failed_policy_fetch_skips_only_that_network() {
        let api = FakeDashboard::default()
            .with_policies_status("N_1", 403)
            .with_policies("N_2", Vec::new());
        let mut out = Vec::<u8>::new();

        let report = Provisioner::new(&api, false)
            .run(
                &[network("N_1", "HQ"), network("N_2", "Branch")],
                &[entry("AA:BB:CC:DD:EE:FF", "Blocked")],
                &mut out,
            )
            .unwrap();

        assert_eq!(report.skipped_networks.len(), 1);
        assert_eq!(report.skipped_networks[0].network_id, "N_1");
        assert_eq!(report.skipped_networks[0].reason, "Status code: 403");
        assert_eq!(report.attempts_for("N_1"), 0);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(*api.policy_fetches.borrow(), vec!["N_1", "N_2"]);
    }

    #[test]
    fn failed_update_is_reported_and_batch_continues() {
        let api = FakeDashboard::default()
            .with_policies("N_1", Vec::new())
            .with_provision_status("00:00:00:00:00:01", 400);
        let mut out = Vec::<u8>::new();

        let report = Provisioner::new(&api, false)
            .run(
                &[network("N_1", "HQ")],
                &[
                    entry("00:00:00:00:00:01", "Allowed"),
                    entry("00:00:00:00:00:02", "Allowed"),
                ],
                &mut out,
            )
            .unwrap();

        assert_eq!(api.provisioned.borrow().len(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(
            report.entries[0].outcome,
            EntryOutcome::Failed {
                status: Some(400),
                reason: "Status code: 400".into()
            }
        );
        assert!(String::from_utf8(out)
            .unwrap()
            .contains("Failed to update 00:00:00:00:00:01 to Allowed policy."));
    }

    #[test]
    fn transport_error_is_reported_without_status_and_batch_continues() {
        let api = FakeDashboard::default()
            .with_policies("N_1", Vec::new())
            .with_provision_transport_error("00:00:00:00:00:01");
        let mut out = Vec::<u8>::new();

        let report = Provisioner::new(&api, false)
            .run(
                &[network("N_1", "HQ")],
                &[
                    entry("00:00:00:00:00:01", "Blocked"),
                    entry("00:00:00:00:00:02", "Blocked"),
                ],
                &mut out,
            )
            .unwrap();

        assert_eq!(api.provisioned.borrow().len(), 2);
        assert_eq!(api.provisioned.borrow()[1].1.clients[0].mac, "00:00:00:00:00:02");
        match &report.entries[0].outcome {
            EntryOutcome::Failed { status: None, reason } => {
                assert!(!reason.is_empty());
                assert!(!reason.starts_with("Status code"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(report.entries[1].outcome, EntryOutcome::Provisioned);
        assert!(report.has_failures());
    }

    #[test]
    fn whitespace_around_a_status_does_not_match() {
        let api = FakeDashboard::default().with_policies("N_1", vec![guest_policy()]);
        let mut out = Vec::<u8>::new();

        let report = Provisioner::new(&api, false)
            .run(
                &[network("N_1", "HQ")],
                &[entry("00:00:00:00:00:01", " Allowed"), entry("00:00:00:00:00:02", "Guest ")],
                &mut out,
            )
            .unwrap();

        assert!(api.provisioned.borrow().is_empty());
        assert_eq!(report.skipped(), 2);
    }

    #[test]
    fn dry_run_resolves_but_never_posts() {
        let api = FakeDashboard::default().with_policies("N_1", vec![guest_policy()]);
        let mut out = Vec::<u8>::new();

        let report = Provisioner::new(&api, true)
            .run(
                &[network("N_1", "HQ")],
                &[entry("AA:BB:CC:DD:EE:FF", "Guest"), entry("11:22:33:44:55:66", "VIP")],
                &mut out,
            )
            .unwrap();

        assert!(api.provisioned.borrow().is_empty());
        assert_eq!(report.planned(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(!report.has_failures());
        assert!(String::from_utf8(out).unwrap().contains("\"groupPolicyId\":\"123\""));
    }

    #[test]
    fn rerun_gives_identical_outcomes() {
        let api = FakeDashboard::default()
            .with_policies("N_1", vec![guest_policy()])
            .with_provision_status("00:00:00:00:00:02", 404);
        let entries = vec![
            entry("00:00:00:00:00:01", "Guest"),
            entry("00:00:00:00:00:02", "Blocked"),
            entry("00:00:00:00:00:03", "Nope"),
        ];
        let networks = vec![network("N_1", "HQ")];
        let provisioner = Provisioner::new(&api, false);

        let first = provisioner.run(&networks, &entries, &mut Vec::<u8>::new()).unwrap();
        let second = provisioner.run(&networks, &entries, &mut Vec::<u8>::new()).unwrap();

        assert_eq!(first.entries, second.entries);
    }
}
