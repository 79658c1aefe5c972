//! Read side of the migration: the Cloud Controller v2 API.

mod client;
pub mod responses;
pub mod routes;

pub use client::CloudControllerClient;

use crate::error::MigrationError;
use crate::models::RoleAssignment;
use async_trait::async_trait;

/// Resources collected before a listing failed, together with the failure.
///
/// A page that fails to decode contributes nothing; pages decoded before it
/// are retained.
#[derive(Debug)]
pub struct PartialFetch<T> {
    pub retained: Vec<T>,
    pub error: MigrationError
}

pub type Fetched<T> = Result<Vec<T>, PartialFetch<T>>;

#[async_trait]
pub trait SourceClient: Send + Sync {
    async fn org_guids(&self) -> Fetched<String>;
    async fn space_guids(&self, org_guid: &str) -> Fetched<String>;
    async fn org_role_assignments(&self, org_guid: &str) -> Fetched<RoleAssignment>;
    async fn space_role_assignments(&self, space_guid: &str) -> Fetched<RoleAssignment>;
}
