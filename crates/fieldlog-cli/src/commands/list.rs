use std::path::Path;

use fieldlog_core::Report;

use crate::cli::StatusFilter;
use crate::commands::common::{format_report_lines, open_store, report_to_list_item, ReportListItem};
use crate::error::CliError;

pub fn run_list(
    limit: usize,
    status: Option<StatusFilter>,
    as_json: bool,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;

    let mut reports: Vec<Report> = match status {
        Some(filter) => {
            // Status queries come back oldest-first (sync order); the list
            // view shows newest first
            let mut matching = store.reports_by_status(filter.into())?;
            matching.reverse();
            matching
        }
        None => store.all()?,
    };
    reports.truncate(limit);

    if as_json {
        let json_items = reports
            .iter()
            .map(report_to_list_item)
            .collect::<Vec<ReportListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_report_lines(&reports) {
            println!("{line}");
        }
    }

    Ok(())
}
