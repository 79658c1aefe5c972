//! End-of-run report.
//!
//! The report is line oriented and fully deterministic: entity types and
//! messages are rendered in lexicographic order.
//!
//! ```text
//! Report
//! ==========================================
//! Number of role assignments: 12
//! Total errors: 3
//!
//! Summary
//! ==========================================
//! For /v2/organizations/org-guid/user_roles:
//! -   2 HTTP bad response: 502
//! Other errors:
//! -   1 role service rejected assign-role: 404 - role not found
//! ```

use crate::error::MigrationError;
use crate::models::{Organization, RoleAssignment, Space};
use std::collections::BTreeMap;
use std::io::Write;
use tokio::sync::mpsc::Receiver;

const RULE: &str = "==========================================";

/// Error messages grouped by the entity type they are attributed to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSummary {
    per_type: BTreeMap<String, BTreeMap<String, usize>>,
    other: BTreeMap<String, usize>
}

impl ErrorSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_per_type_error(&mut self, entity_type: &str, message: &str) {
        *self
            .per_type
            .entry(entity_type.to_string())
            .or_default()
            .entry(message.to_string())
            .or_default() += 1;
    }

    pub fn add_other_error(&mut self, message: &str) {
        *self.other.entry(message.to_string()).or_default() += 1;
    }

    pub fn add(&mut self, error: &MigrationError) {
        let message = error.to_string();
        match error.entity_type() {
            Some(entity_type) => self.add_per_type_error(entity_type, &message),
            None => self.add_other_error(&message)
        }
    }

    /// Number of errors recorded, typed or not.
    pub fn count(&self) -> usize {
        let typed: usize = self.per_type.values().flat_map(|m| m.values()).sum();
        typed + self.other.values().sum::<usize>()
    }

    pub fn per_type(&self) -> &BTreeMap<String, BTreeMap<String, usize>> {
        &self.per_type
    }

    pub fn other(&self) -> &BTreeMap<String, usize> {
        &self.other
    }
}

pub fn compute_errors<'a, I>(errors: I) -> ErrorSummary
where
    I: IntoIterator<Item = &'a MigrationError>
{
    let mut summary = ErrorSummary::new();
    for error in errors {
        summary.add(error);
    }
    summary
}

pub fn count_assignments(orgs: &[Organization], spaces: &[Space]) -> usize {
    orgs.iter().map(|o| o.assignments.len()).sum::<usize>()
        + spaces.iter().map(|s| s.assignments.len()).sum::<usize>()
}

pub fn generate_report<W: Write>(
    w: &mut W,
    assignment_count: usize,
    summary: &ErrorSummary
) -> std::io::Result<()> {
    writeln!(w, "Report")?;
    writeln!(w, "{RULE}")?;
    writeln!(w, "Number of role assignments: {assignment_count}")?;
    writeln!(w, "Total errors: {}", summary.count())?;
    writeln!(w)?;
    writeln!(w, "Summary")?;
    writeln!(w, "{RULE}")?;

    for (entity_type, messages) in &summary.per_type {
        writeln!(w, "For {entity_type}:")?;
        for (message, count) in messages {
            writeln!(w, "- {count:>3} {message}")?;
        }
    }

    if !summary.other.is_empty() {
        writeln!(w, "Other errors:")?;
        for (message, count) in &summary.other {
            writeln!(w, "- {count:>3} {message}")?;
        }
    }

    Ok(())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Reporter;

impl Reporter {
    pub fn generate_report<W: Write>(
        &self,
        w: &mut W,
        orgs: &[Organization],
        spaces: &[Space],
        errors: &[MigrationError]
    ) -> std::io::Result<()> {
        generate_report(w, count_assignments(orgs, spaces), &compute_errors(errors))
    }
}

/// Drains a flattened assignment stream and its error stream, then renders
/// the report.
///
/// Both channels are drained concurrently so that a producer blocked on one
/// of them can always make progress.
pub async fn generate_streaming_report<W: Write>(
    w: &mut W,
    mut assignments: Receiver<RoleAssignment>,
    mut errors: Receiver<MigrationError>
) -> std::io::Result<(usize, ErrorSummary)> {
    let count_assignments = async {
        let mut count = 0;
        while assignments.recv().await.is_some() {
            count += 1;
        }
        count
    };

    let summarize_errors = async {
        let mut summary = ErrorSummary::new();
        while let Some(error) = errors.recv().await {
            summary.add(&error);
        }
        summary
    };

    let (count, summary) = tokio::join!(count_assignments, summarize_errors);
    generate_report(w, count, &summary)?;
    Ok((count, summary))
}
