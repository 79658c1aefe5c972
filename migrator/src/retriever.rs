use crate::cloudcontroller::{Fetched, SourceClient};
use crate::error::MigrationError;
use crate::models::{Organization, RoleAssignment, Space};
use std::sync::Arc;
use tokio::sync::mpsc::Sender;
use tracing::{info, warn};

/// Walks every organization and its spaces, streaming complete records to
/// the consumers.
///
/// Failures are per entity: a listing that fails is reported on the error
/// channel and the walk continues with whatever was retrieved, so a single
/// broken route never starves the rest of the migration. The output
/// channels close when the retriever returns and drops its senders.
pub struct Retriever {
    client: Arc<dyn SourceClient>
}

impl Retriever {
    pub fn new(client: Arc<dyn SourceClient>) -> Self {
        Self { client }
    }

    pub async fn fetch_resources(
        &self,
        orgs: Sender<Organization>,
        spaces: Sender<Space>,
        errors: Sender<MigrationError>
    ) {
        let org_guids = settle(self.client.org_guids().await, &errors).await;
        info!(count = org_guids.len(), "Fetched organization GUIDs");

        let org_total = org_guids.len();
        for (org_index, org_guid) in org_guids.into_iter().enumerate() {
            let assignments = settle(self.client.org_role_assignments(&org_guid).await, &errors).await;
            info!(
                org = %org_guid,
                org_index = org_index + 1,
                org_total,
                assignments = assignments.len(),
                "Fetched organization role assignments"
            );

            let org = Organization {
                guid: org_guid.clone(),
                assignments
            };
            if orgs.send(org).await.is_err() {
                warn!(org = %org_guid, "Organization consumer went away");
            }

            let space_guids = settle(self.client.space_guids(&org_guid).await, &errors).await;
            let space_total = space_guids.len();

            for (space_index, space_guid) in space_guids.into_iter().enumerate() {
                let assignments =
                    settle(self.client.space_role_assignments(&space_guid).await, &errors).await;
                info!(
                    org = %org_guid,
                    org_index = org_index + 1,
                    org_total,
                    space = %space_guid,
                    space_index = space_index + 1,
                    space_total,
                    assignments = assignments.len(),
                    "Fetched space role assignments"
                );

                let space = Space {
                    guid: space_guid.clone(),
                    org_guid: org_guid.clone(),
                    assignments
                };
                if spaces.send(space).await.is_err() {
                    warn!(space = %space_guid, "Space consumer went away");
                }
            }
        }

        info!("Done fetching resources");
    }

    /// Same walk as [`Retriever::fetch_resources`], flattened into one
    /// stream of role assignments.
    pub async fn fetch_assignments(
        &self,
        assignments: Sender<RoleAssignment>,
        errors: Sender<MigrationError>
    ) {
        let org_guids = settle(self.client.org_guids().await, &errors).await;
        info!(count = org_guids.len(), "Fetched organization GUIDs");

        for org_guid in org_guids {
            let org_assignments =
                settle(self.client.org_role_assignments(&org_guid).await, &errors).await;
            forward(org_assignments, &assignments).await;

            let space_guids = settle(self.client.space_guids(&org_guid).await, &errors).await;
            for space_guid in space_guids {
                let space_assignments =
                    settle(self.client.space_role_assignments(&space_guid).await, &errors).await;
                forward(space_assignments, &assignments).await;
            }
        }

        info!("Done fetching role assignments");
    }
}

/// Reports a failed listing and carries on with what it retained.
async fn settle<T>(fetched: Fetched<T>, errors: &Sender<MigrationError>) -> Vec<T> {
    match fetched {
        Ok(items) => items,
        Err(partial) => {
            if errors.send(partial.error).await.is_err() {
                warn!("Error consumer went away");
            }
            partial.retained
        }
    }
}

async fn forward(items: Vec<RoleAssignment>, out: &Sender<RoleAssignment>) {
    for item in items {
        if out.send(item).await.is_err() {
            warn!("Role assignment consumer went away");
            return;
        }
    }
}
