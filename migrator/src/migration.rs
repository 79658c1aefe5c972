use crate::error::{MigrationError, RunError};
use crate::models::{Organization, Space};
use crate::populator::Populator;
use crate::reporter::{ErrorSummary, Reporter, count_assignments, generate_streaming_report};
use crate::retriever::Retriever;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

const CHANNEL_CAPACITY: usize = 8;

pub const DRY_RUN_BANNER_BEFORE: &str = "DRY-RUN; ROLE ASSIGNMENTS WILL NOT BE MIGRATED";
pub const DRY_RUN_BANNER_AFTER: &str = "DRY-RUN; ROLE ASSIGNMENTS WERE NOT MIGRATED";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationOutcome {
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub dry_run: bool,
    pub organizations: usize,
    pub spaces: usize,
    pub assignments: usize,
    pub errors: usize
}

impl MigrationOutcome {
    fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            dry_run,
            ..Default::default()
        }
    }

    fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }
}

/// Runs one migration: a single producer walking the source and one
/// consumer per stream (organizations, spaces, errors).
pub struct Migrator {
    retriever: Arc<Retriever>,
    populator: Arc<Populator>,
    reporter: Reporter,
    namespace: String
}

impl Migrator {
    pub fn new(
        retriever: Arc<Retriever>,
        populator: Arc<Populator>,
        reporter: Reporter,
        namespace: impl Into<String>
    ) -> Self {
        Self {
            retriever,
            populator,
            reporter,
            namespace: namespace.into()
        }
    }

    /// Migrates everything the retriever finds and writes the report to `w`.
    ///
    /// Collected fetch and populate failures end up in the report, never in
    /// the returned error.
    pub async fn migrate<W: Write>(
        &self,
        w: &mut W,
        dry_run: bool
    ) -> Result<MigrationOutcome, RunError> {
        let mut outcome = MigrationOutcome::new(dry_run);
        info!(dry_run, namespace = %self.namespace, "Starting migration");

        let (org_tx, mut org_rx) = mpsc::channel::<Organization>(CHANNEL_CAPACITY);
        let (space_tx, mut space_rx) = mpsc::channel::<Space>(CHANNEL_CAPACITY);
        let (error_tx, mut error_rx) = mpsc::channel::<MigrationError>(CHANNEL_CAPACITY);

        let retriever = self.retriever.clone();
        let producer = tokio::spawn(async move {
            retriever.fetch_resources(org_tx, space_tx, error_tx).await;
        });

        let populator = self.populator.clone();
        let namespace = self.namespace.clone();
        let org_consumer = tokio::spawn(async move {
            let mut orgs = Vec::new();
            let mut errors = Vec::new();
            while let Some(org) = org_rx.recv().await {
                if !dry_run {
                    errors.extend(populator.populate_organization(&org, &namespace).await);
                }
                orgs.push(org);
            }
            (orgs, errors)
        });

        let populator = self.populator.clone();
        let namespace = self.namespace.clone();
        let space_consumer = tokio::spawn(async move {
            let mut spaces = Vec::new();
            let mut errors = Vec::new();
            while let Some(space) = space_rx.recv().await {
                if !dry_run {
                    errors.extend(populator.populate_space(&space, &namespace).await);
                }
                spaces.push(space);
            }
            (spaces, errors)
        });

        let error_consumer = tokio::spawn(async move {
            let mut errors = Vec::new();
            while let Some(error) = error_rx.recv().await {
                errors.push(error);
            }
            errors
        });

        let (produced, orgs, spaces, retrieval_errors) =
            tokio::join!(producer, org_consumer, space_consumer, error_consumer);
        produced?;
        let (orgs, org_errors) = orgs?;
        let (spaces, space_errors) = spaces?;

        let mut errors = retrieval_errors?;
        errors.extend(org_errors);
        errors.extend(space_errors);

        if dry_run {
            writeln!(w, "{DRY_RUN_BANNER_BEFORE}")?;
        }
        self.reporter.generate_report(w, &orgs, &spaces, &errors)?;
        if dry_run {
            writeln!(w, "{DRY_RUN_BANNER_AFTER}")?;
        }

        outcome.organizations = orgs.len();
        outcome.spaces = spaces.len();
        outcome.assignments = count_assignments(&orgs, &spaces);
        outcome.errors = errors.len();
        outcome.complete();

        info!(
            organizations = outcome.organizations,
            spaces = outcome.spaces,
            assignments = outcome.assignments,
            errors = outcome.errors,
            dry_run,
            "Migration completed"
        );

        Ok(outcome)
    }
}

/// Counts every role assignment the retriever can see without touching the
/// destination, and writes the report to `w`.
pub async fn inventory<W: Write>(
    retriever: Arc<Retriever>,
    w: &mut W
) -> Result<(usize, ErrorSummary), RunError> {
    info!("Starting inventory");

    let (assignment_tx, assignment_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (error_tx, error_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let producer = tokio::spawn(async move {
        retriever.fetch_assignments(assignment_tx, error_tx).await;
    });

    let (count, summary) = generate_streaming_report(w, assignment_rx, error_rx).await?;
    producer.await?;

    info!(assignments = count, errors = summary.count(), "Inventory completed");
    Ok((count, summary))
}
