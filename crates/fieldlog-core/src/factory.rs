//! Report factory
//!
//! Validates input and produces a new pending report, persisted before the
//! call returns. No network access happens here: capture must succeed fully
//! offline.

use std::sync::Arc;

use crate::error::{Result, ValidationError};
use crate::models::Report;
use crate::store::ReportStore;

const MIN_LOCATION_CHARS: usize = 3;
const MIN_TECHNICIAN_CHARS: usize = 2;
const MIN_FINDINGS_CHARS: usize = 10;

/// Validate report input. Checks run in a fixed order and stop at the first
/// failure: location, then technician, then findings.
pub fn validate(
    location: &str,
    technician: &str,
    findings: &str,
) -> std::result::Result<(), ValidationError> {
    if location.chars().count() < MIN_LOCATION_CHARS {
        return Err(ValidationError::LocationTooShort);
    }
    if technician.chars().count() < MIN_TECHNICIAN_CHARS {
        return Err(ValidationError::TechnicianTooShort);
    }
    if findings.chars().count() < MIN_FINDINGS_CHARS {
        return Err(ValidationError::FindingsTooShort);
    }
    Ok(())
}

/// Creates validated pending reports in the local store
#[derive(Clone)]
pub struct ReportFactory {
    store: Arc<ReportStore>,
}

impl ReportFactory {
    /// Create a factory writing to the given store
    #[must_use]
    pub const fn new(store: Arc<ReportStore>) -> Self {
        Self { store }
    }

    /// Validate input and persist a new pending report
    ///
    /// Invalid input returns a [`ValidationError`] without touching the
    /// store; valid input performs exactly one durable write.
    pub fn create(&self, location: &str, technician: &str, findings: &str) -> Result<Report> {
        validate(location, technician, findings)?;

        let report = Report::new(location, technician, findings);
        self.store.put(&report)?;
        Ok(report)
    }
}
