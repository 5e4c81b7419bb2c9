use super::GlobalOptions;
use crate::api::{DashboardApi, DashboardClient};
use crate::cli::ListResource;
use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{self, Write};

pub fn run(global: &GlobalOptions, resource: &ListResource) -> Result<()> {
    let settings = global.settings(None)?;
    let client = DashboardClient::new(&settings).context("Failed to build Dashboard client")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    list(&client, resource, &mut out)
}

pub fn list<A, W>(api: &A, resource: &ListResource, out: &mut W) -> Result<()>
where
    A: DashboardApi + ?Sized,
    W: Write + ?Sized,
{
    let rows: Vec<(String, String)> = match resource {
        ListResource::Organizations => api
            .list_organizations()
            .context("Failed to retrieve organizations")?
            .into_iter()
            .map(|o| (o.id, o.name))
            .collect(),
        ListResource::Networks { org } => api
            .list_networks(org)
            .with_context(|| format!("Failed to retrieve networks for {}", org))?
            .into_iter()
            .map(|n| (n.id, n.name))
            .collect(),
        ListResource::Policies { network } => api
            .list_group_policies(network)
            .with_context(|| format!("Failed to retrieve group policies for {}", network))?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect(),
    };

    if rows.is_empty() {
        writeln!(out, "{}", "Nothing found.".yellow())?;
        return Ok(());
    }

    let width = rows.iter().map(|(id, _)| id.len()).max().unwrap_or(0);
    for (id, name) in rows {
        writeln!(out, "{:<width$}  {}", id, name, width = width)?;
    }
    Ok(())
}
