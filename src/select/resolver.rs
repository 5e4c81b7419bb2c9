use super::prompt::{prompt_until, Prompter};
use super::selection::{parse_network_choice, parse_org_choice};
use crate::api::{DashboardApi, Network, Organization};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::Write;

pub fn print_heading<W: Write + ?Sized>(out: &mut W, title: &str) -> Result<()> {
    writeln!(out, "{}", "=".repeat(50).bright_blue())?;
    writeln!(out, "{}", title.bright_blue().bold())?;
    writeln!(out, "{}", "=".repeat(50).bright_blue())?;
    Ok(())
}

/// Fetch organizations and pick one, either from `preselect` or interactively.
///
/// Any failure to list organizations aborts the run.
pub fn resolve_organization<A, W>(
    api: &A,
    prompter: &mut dyn Prompter,
    out: &mut W,
    preselect: Option<&str>,
) -> Result<Organization>
where
    A: DashboardApi + ?Sized,
    W: Write + ?Sized,
{
    let mut organizations = api
        .list_organizations()
        .context("Failed to retrieve organizations")?;

    if organizations.is_empty() {
        bail!("No organizations are accessible with this API key");
    }

    print_heading(out, "Organizations")?;
    for (i, org) in organizations.iter().enumerate() {
        writeln!(out, "{}. {}", (i + 1).to_string().blue(), org.name)?;
    }

    let index = match preselect {
        Some(value) => find_organization(&organizations, value)?,
        None => prompt_until(
            prompter,
            out,
            "Enter the number of the organization to provision MAC addresses:",
            |answer| parse_org_choice(answer, organizations.len()),
        )?,
    };

    let selected = organizations.swap_remove(index);
    log::info!("Selected organization {} ({})", selected.name, selected.id);
    Ok(selected)
}

/// `--org` accepts an organization id or a 1-based index; ids win.
fn find_organization(organizations: &[Organization], value: &str) -> Result<usize> {
    let value = value.trim();
    if let Some(index) = organizations.iter().position(|org| org.id == value) {
        return Ok(index);
    }

    parse_org_choice(value, organizations.len())
        .with_context(|| format!("No organization matches `{}`", value))
}

/// Fetch the organization's networks and pick a non-empty subset.
///
/// A failed fetch is not fatal: it is reported and an empty selection is returned.
pub fn resolve_networks<A, W>(
    api: &A,
    prompter: &mut dyn Prompter,
    out: &mut W,
    organization: &Organization,
    preselect: Option<&str>,
) -> Result<Vec<Network>>
where
    A: DashboardApi + ?Sized,
    W: Write + ?Sized,
{
    print_heading(out, &format!("Networks for {}", organization.name))?;

    let networks = match api.list_networks(&organization.id) {
        Ok(networks) => networks,
        Err(e) => {
            log::warn!("Listing networks for {} failed: {}", organization.id, e);
            writeln!(
                out,
                "{} {}",
                format!("Failed to retrieve networks for {}.", organization.name).red(),
                status_suffix(&e)
            )?;
            return Ok(Vec::new());
        }
    };

    if networks.is_empty() {
        writeln!(
            out,
            "{}",
            format!("{} has no networks.", organization.name).yellow()
        )?;
        return Ok(Vec::new());
    }

    writeln!(out, "{}. All networks", "0".blue())?;
    for (i, network) in networks.iter().enumerate() {
        writeln!(out, "{}. {}", (i + 1).to_string().blue(), network.name)?;
    }

    let indices = match preselect {
        Some(value) => parse_network_choice(value, networks.len())
            .with_context(|| format!("Invalid --networks value `{}`", value))?,
        None => prompt_until(
            prompter,
            out,
            "Enter the number(s) of the network(s) to provision MAC addresses (comma-separated, 0 for all):",
            |answer| parse_network_choice(answer, networks.len()),
        )?,
    };

    Ok(indices.into_iter().map(|i| networks[i].clone()).collect())
}

/// "Status code: N" when the server answered, otherwise the transport error
pub fn status_suffix(error: &crate::api::ApiError) -> String {
    match error.status() {
        Some(code) => format!("Status code: {}", code),
        None => error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeDashboard;
    use crate::select::prompt::testing::ScriptedPrompter;

    fn orgs() -> Vec<Organization> {
        vec![
            Organization {
                id: "o-1".into(),
                name: "Acme".into(),
            },
            Organization {
                id: "o-2".into(),
                name: "Globex".into(),
            },
        ]
    }

    fn nets() -> Vec<Network> {
        vec![
            Network {
                id: "N_1".into(),
                name: "HQ".into(),
            },
            Network {
                id: "N_2".into(),
                name: "Branch".into(),
            },
            Network {
                id: "N_3".into(),
                name: "Lab".into(),
            },
        ]
    }

    #[test]
    fn organization_prompt_retries_then_selects() {
        let api = FakeDashboard::default().with_organizations(orgs());
        let mut prompter = ScriptedPrompter::new(&["abc", "5", "2"]);
        let mut out = Vec::<u8>::new();

        let org = resolve_organization(&api, &mut prompter, &mut out, None).unwrap();

        assert_eq!(org.id, "o-2");
        assert_eq!(prompter.asked.len(), 3);
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Acme"));
        assert!(printed.contains("Globex"));
    }

    #[test]
    fn organization_fetch_failure_aborts_without_prompting() {
        let api = FakeDashboard::default().with_organizations_status(401);
        let mut prompter = ScriptedPrompter::new(&["1"]);
        let mut out = Vec::<u8>::new();

        let err = resolve_organization(&api, &mut prompter, &mut out, None).unwrap_err();

        assert!(err.to_string().contains("Failed to retrieve organizations"));
        assert!(prompter.asked.is_empty());
        assert_eq!(api.network_list_calls(), 0);
    }

    #[test]
    fn organization_preselect_by_id_or_index() {
        let api = FakeDashboard::default().with_organizations(orgs());
        let mut prompter = ScriptedPrompter::new(&[]);
        let mut out = Vec::<u8>::new();

        let by_id = resolve_organization(&api, &mut prompter, &mut out, Some("o-1")).unwrap();
        let by_index = resolve_organization(&api, &mut prompter, &mut out, Some("2")).unwrap();

        assert_eq!(by_id.name, "Acme");
        assert_eq!(by_index.name, "Globex");
        assert!(resolve_organization(&api, &mut prompter, &mut out, Some("o-9")).is_err());
        assert!(prompter.asked.is_empty());
    }

    #[test]
    fn empty_organization_list_is_fatal() {
        let api = FakeDashboard::default();
        let mut prompter = ScriptedPrompter::new(&[]);
        let mut out = Vec::<u8>::new();

        assert!(resolve_organization(&api, &mut prompter, &mut out, None).is_err());
    }

    #[test]
    fn zero_selects_all_networks_in_fetch_order() {
        let api = FakeDashboard::default().with_networks(nets());
        let mut prompter = ScriptedPrompter::new(&["0"]);
        let mut out = Vec::<u8>::new();

        let selected =
            resolve_networks(&api, &mut prompter, &mut out, &orgs()[0], None).unwrap();

        assert_eq!(selected, nets());
    }

    #[test]
    fn network_list_keeps_duplicates_after_reprompt() {
        let api = FakeDashboard::default().with_networks(nets());
        let mut prompter = ScriptedPrompter::new(&["", "4", "3,1,1"]);
        let mut out = Vec::<u8>::new();

        let selected =
            resolve_networks(&api, &mut prompter, &mut out, &orgs()[0], None).unwrap();

        let names: Vec<_> = selected.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["Lab", "HQ", "HQ"]);
        assert_eq!(prompter.asked.len(), 3);
    }

    #[test]
    fn network_fetch_failure_yields_empty_selection() {
        let api = FakeDashboard::default().with_networks_status(500);
        let mut prompter = ScriptedPrompter::new(&[]);
        let mut out = Vec::<u8>::new();

        let selected =
            resolve_networks(&api, &mut prompter, &mut out, &orgs()[0], None).unwrap();

        assert!(selected.is_empty());
        assert!(prompter.asked.is_empty());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Status code: 500"));
    }

    #[test]
    fn network_preselect_uses_same_syntax() {
        let api = FakeDashboard::default().with_networks(nets());
        let mut prompter = ScriptedPrompter::new(&[]);
        let mut out = Vec::<u8>::new();

        let selected =
            resolve_networks(&api, &mut prompter, &mut out, &orgs()[0], Some("2")).unwrap();
        assert_eq!(selected[0].id, "N_2");

        assert!(resolve_networks(&api, &mut prompter, &mut out, &orgs()[0], Some("7")).is_err());
    }
}
