use crate::error::MigrationError;
use crate::models::{Organization, RoleAssignment, Space};
use crate::perm::{Actor, Permission, RoleService};
use crate::roles::{ResourceKind, RoleCatalog};
use std::sync::Arc;
use tracing::{debug, warn};

/// Recreates one resource's roles and role assignments in the role service.
///
/// Failures are collected, never short-circuited: a failed role creation
/// does not prevent the remaining roles or any assignment from being
/// attempted.
pub struct Populator {
    client: Arc<dyn RoleService>,
    catalog: RoleCatalog
}

impl Populator {
    pub fn new(client: Arc<dyn RoleService>) -> Self {
        Self {
            client,
            catalog: RoleCatalog::default()
        }
    }

    pub fn with_catalog(mut self, catalog: RoleCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn catalog(&self) -> &RoleCatalog {
        &self.catalog
    }

    pub async fn populate_organization(
        &self,
        org: &Organization,
        namespace: &str
    ) -> Vec<MigrationError> {
        self.populate(
            ResourceKind::Organization,
            &org.guid,
            &org.assignments,
            namespace
        )
        .await
    }

    pub async fn populate_space(&self, space: &Space, namespace: &str) -> Vec<MigrationError> {
        self.populate(
            ResourceKind::Space,
            &space.guid,
            &space.assignments,
            namespace
        )
        .await
    }

    async fn populate(
        &self,
        kind: ResourceKind,
        guid: &str,
        assignments: &[RoleAssignment],
        namespace: &str
    ) -> Vec<MigrationError> {
        let mut errors = Vec::new();
        let kind_label = kind.prefix();

        for role in self.catalog.roles(kind) {
            let name = self.catalog.role_name(kind, role, guid);
            let permissions = vec![Permission {
                name: self.catalog.permission_name(kind, role),
                resource_pattern: guid.to_string()
            }];

            match self.client.create_role(&name, permissions).await {
                Ok(_) => {
                    metrics::counter!("migrator_roles_created_total", "kind" => kind_label)
                        .increment(1);
                }
                Err(e) => {
                    warn!(%kind, guid, role = %name, error = %e, "Failed to create role");
                    metrics::counter!("migrator_populate_errors_total", "kind" => kind_label)
                        .increment(1);
                    errors.push(e.into());
                }
            }
        }

        for assignment in assignments {
            let actor = Actor {
                id: assignment.user_guid.clone(),
                issuer: namespace.to_string()
            };

            for role in &assignment.roles {
                let role_name = self.catalog.role_name(kind, role, guid);

                match self.client.assign_role(&actor, &role_name).await {
                    Ok(()) => {
                        metrics::counter!("migrator_role_assignments_total", "kind" => kind_label)
                            .increment(1);
                    }
                    Err(e) => {
                        warn!(
                            %kind,
                            guid,
                            user = %actor.id,
                            role = %role_name,
                            error = %e,
                            "Failed to assign role"
                        );
                        metrics::counter!("migrator_populate_errors_total", "kind" => kind_label)
                            .increment(1);
                        errors.push(e.into());
                    }
                }
            }
        }

        debug!(%kind, guid, errors = errors.len(), "Populated resource");
        errors
    }
}
