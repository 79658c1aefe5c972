use async_trait::async_trait;
use migrator::cloudcontroller::routes;
use migrator::{ErrorEvent, Fetched, PartialFetch, RoleAssignment, SourceClient, SourceError};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct OrgRecord {
    guid: String,
    assignments: Vec<RoleAssignment>,
    spaces: Vec<SpaceRecord>
}

#[derive(Debug, Clone, Default)]
struct SpaceRecord {
    guid: String,
    assignments: Vec<RoleAssignment>
}

/// Source client serving organizations and spaces from memory.
///
/// A failing route answers with the configured status wrapped in the same
/// [`ErrorEvent`] the HTTP client produces, so errors are attributed to the
/// route exactly as in production.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    orgs: Vec<OrgRecord>,
    failures: HashMap<String, u16>
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_org(mut self, org_guid: &str, assignments: Vec<RoleAssignment>) -> Self {
        self.orgs.push(OrgRecord {
            guid: org_guid.to_string(),
            assignments,
            spaces: Vec::new()
        });
        self
    }

    /// Adds a space to an organization added earlier with
    /// [`InMemorySource::with_org`].
    pub fn with_space(
        mut self,
        org_guid: &str,
        space_guid: &str,
        assignments: Vec<RoleAssignment>
    ) -> Self {
        if let Some(org) = self.orgs.iter_mut().find(|o| o.guid == org_guid) {
            org.spaces.push(SpaceRecord {
                guid: space_guid.to_string(),
                assignments
            });
        }
        self
    }

    pub fn fail_route(mut self, route: &str, status: u16) -> Self {
        self.failures.insert(route.to_string(), status);
        self
    }

    fn serve<T: Clone>(&self, route: &str, guid: &str, items: &[T]) -> Fetched<T> {
        match self.failures.get(route) {
            Some(&status) => Err(PartialFetch {
                retained: Vec::new(),
                error: ErrorEvent::new(route, guid, SourceError::BadStatus { status }).into()
            }),
            None => Ok(items.to_vec())
        }
    }

    fn org(&self, org_guid: &str) -> Option<&OrgRecord> {
        self.orgs.iter().find(|o| o.guid == org_guid)
    }

    fn space(&self, space_guid: &str) -> Option<&SpaceRecord> {
        self.orgs
            .iter()
            .flat_map(|o| o.spaces.iter())
            .find(|s| s.guid == space_guid)
    }
}

#[async_trait]
impl SourceClient for InMemorySource {
    async fn org_guids(&self) -> Fetched<String> {
        let guids: Vec<String> = self.orgs.iter().map(|o| o.guid.clone()).collect();
        self.serve(routes::ORGANIZATIONS, "", &guids)
    }

    async fn space_guids(&self, org_guid: &str) -> Fetched<String> {
        let guids: Vec<String> = self
            .org(org_guid)
            .map(|o| o.spaces.iter().map(|s| s.guid.clone()).collect())
            .unwrap_or_default();
        self.serve(&routes::organization_spaces(org_guid), org_guid, &guids)
    }

    async fn org_role_assignments(&self, org_guid: &str) -> Fetched<RoleAssignment> {
        let assignments = self
            .org(org_guid)
            .map(|o| o.assignments.clone())
            .unwrap_or_default();
        self.serve(
            &routes::organization_user_roles(org_guid),
            org_guid,
            &assignments
        )
    }

    async fn space_role_assignments(&self, space_guid: &str) -> Fetched<RoleAssignment> {
        let assignments = self
            .space(space_guid)
            .map(|s| s.assignments.clone())
            .unwrap_or_default();
        self.serve(&routes::space_user_roles(space_guid), space_guid, &assignments)
    }
}
