use super::GlobalOptions;
use crate::api::{DashboardApi, DashboardClient};
use crate::executor::Provisioner;
use crate::input::load_mac_statuses;
use crate::select::{print_heading, resolve_networks, resolve_organization, Prompter, TerminalPrompter};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::io::{self, Write};
use std::path::Path;

pub fn run(
    global: &GlobalOptions,
    csv: Option<&Path>,
    org: Option<&str>,
    networks: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let settings = global.settings(csv)?;
    let client = DashboardClient::new(&settings).context("Failed to build Dashboard client")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut prompter = TerminalPrompter;

    let options = RunOptions {
        csv_path: &settings.csv_path,
        org,
        networks,
        dry_run,
    };
    let report_has_failures = execute(&client, &mut prompter, &mut out, &options)?;

    if report_has_failures {
        bail!("provisioning completed with errors");
    }
    Ok(())
}

pub struct RunOptions<'a> {
    pub csv_path: &'a Path,
    pub org: Option<&'a str>,
    pub networks: Option<&'a str>,
    pub dry_run: bool,
}

/// Organization -> networks -> CSV -> provisioning. Returns whether any
/// provisioning call failed.
pub fn execute<A, W>(
    api: &A,
    prompter: &mut dyn Prompter,
    out: &mut W,
    options: &RunOptions<'_>,
) -> Result<bool>
where
    A: DashboardApi + ?Sized,
    W: Write + ?Sized,
{
    let organization = resolve_organization(api, prompter, out, options.org)?;
    writeln!(out)?;

    let networks = resolve_networks(api, prompter, out, &organization, options.networks)?;
    writeln!(out)?;

    let entries = load_mac_statuses(options.csv_path)?;
    log::info!(
        "Loaded {} MAC statuses from {}",
        entries.len(),
        options.csv_path.display()
    );

    print_heading(out, "Provision MAC Addresses")?;
    if networks.is_empty() {
        writeln!(out, "{}", "No networks selected; nothing to provision.".yellow())?;
    }

    let report = Provisioner::new(api, options.dry_run).run(&networks, &entries, out)?;
    report.print_summary(out)?;

    Ok(report.has_failures())
}
