//! Report and task list output.

use std::io::{self, Write};

use console::style;

use netdeploy_core::deploy::{DeploymentOutcome, DeploymentReport};
use netdeploy_core::task::Task;

/// Print registered tasks.
pub fn write_task_list<W: Write>(writer: &mut W, tasks: &[Box<dyn Task>]) -> io::Result<()> {
    if tasks.is_empty() {
        writeln!(writer, "No tasks registered.")?;
        return Ok(());
    }

    writeln!(writer, "{:<12} Description", "Task")?;
    writeln!(writer, "{}", "-".repeat(50))?;
    for task in tasks {
        writeln!(writer, "{:<12} {}", task.id(), task.description())?;
    }
    Ok(())
}

/// Print a report as a human-readable table.
pub fn write_report_table<W: Write>(writer: &mut W, report: &DeploymentReport) -> io::Result<()> {
    if report.is_aborted() {
        writeln!(writer, "{}", style("Deployment aborted. Nothing was deployed.").yellow())?;
        return Ok(());
    }
    if report.is_empty() {
        writeln!(writer, "No networks selected. Nothing was deployed.")?;
        return Ok(());
    }

    writeln!(writer, "{:<20} {:<10} Details", "Network", "Status")?;
    writeln!(writer, "{}", "-".repeat(60))?;
    for (network, outcome) in report.iter() {
        let (status, details) = match outcome {
            DeploymentOutcome::Deployed { artifacts } => {
                (style("deployed").green(), artifacts.join(", "))
            }
            DeploymentOutcome::Skipped { reason } => (style("skipped").dim(), reason.clone()),
            DeploymentOutcome::Failed { reason } => (style("failed").red(), reason.clone()),
        };
        writeln!(writer, "{:<20} {:<10} {}", network, status, details)?;
    }
    writeln!(writer)?;

    let failed = report.failures().len();
    let summary = format!(
        "Summary: {} deployed, {} skipped, {} failed",
        report.deployed_count(),
        report.skipped_count(),
        failed
    );
    if failed == 0 {
        writeln!(writer, "{}", style(summary).green())?;
    } else {
        writeln!(writer, "{}", style(summary).red())?;
    }
    Ok(())
}

/// Print a report as pretty JSON.
pub fn write_report_json<W: Write>(writer: &mut W, report: &DeploymentReport) -> io::Result<()> {
    let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
    writeln!(writer, "{}", json)
}
