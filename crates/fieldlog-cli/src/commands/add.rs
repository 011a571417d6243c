use std::path::Path;

use fieldlog_core::factory::ReportFactory;

use crate::commands::common::open_store;
use crate::error::CliError;

pub fn run_add(
    location: &str,
    technician: &str,
    findings: &str,
    db_path: &Path,
) -> Result<(), CliError> {
    let store = open_store(db_path)?;
    let factory = ReportFactory::new(store);
    let report = factory.create(location, technician, findings)?;

    println!("{}", report.id);
    Ok(())
}
