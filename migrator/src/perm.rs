//! Write side of the migration: the Perm role service.

use crate::error::RoleServiceError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    pub resource_pattern: String
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub issuer: String
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String
}

/// Destination role service. Both calls are idempotent by name on the
/// service side, which is what makes a migration safe to re-run.
#[async_trait]
pub trait RoleService: Send + Sync {
    async fn create_role(
        &self,
        name: &str,
        permissions: Vec<Permission>
    ) -> Result<Role, RoleServiceError>;

    async fn assign_role(&self, actor: &Actor, role_name: &str) -> Result<(), RoleServiceError>;
}

#[derive(Debug, Serialize)]
struct CreateRoleRequest<'a> {
    name: &'a str,
    permissions: Vec<Permission>
}

#[derive(Debug, Serialize)]
struct AssignRoleRequest<'a> {
    actor: &'a Actor,
    role_name: &'a str
}

/// JSON-over-HTTP client for the role service.
///
/// Every request is bounded by `request_timeout`.
pub struct HttpRoleService {
    base_url: Url,
    client: Client,
    request_timeout: Duration
}

impl HttpRoleService {
    pub fn new(
        base_url: &str,
        client: Client,
        request_timeout: Duration
    ) -> Result<Self, RoleServiceError> {
        let base_url = Url::parse(base_url).map_err(|e| RoleServiceError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string()
        })?;

        Ok(Self {
            base_url,
            client,
            request_timeout
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, RoleServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| RoleServiceError::InvalidUrl {
                url: path.to_string(),
                reason: e.to_string()
            })
    }

    async fn post<B: Serialize + Sync>(
        &self,
        operation: &str,
        path: &str,
        body: &B
    ) -> Result<Option<reqwest::Response>, RoleServiceError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, operation, "Making role service request");

        let response = self
            .client
            .post(url)
            .json(body)
            .timeout(self.request_timeout)
            .send()
            .await
            .inspect_err(|e| warn!(operation, error = %e, "Failed to perform role service request"))?;

        match response.status() {
            status if status.is_success() => Ok(Some(response)),
            StatusCode::CONFLICT => {
                debug!(operation, "Role service reports the entry already exists");
                Ok(None)
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(RoleServiceError::Rejected {
                    operation: operation.to_string(),
                    status: status.as_u16(),
                    message
                })
            }
        }
    }
}

#[async_trait]
impl RoleService for HttpRoleService {
    async fn create_role(
        &self,
        name: &str,
        permissions: Vec<Permission>
    ) -> Result<Role, RoleServiceError> {
        let request = CreateRoleRequest { name, permissions };

        match self.post("create-role", "roles", &request).await? {
            Some(response) => Ok(response.json::<Role>().await?),
            None => Ok(Role {
                name: name.to_string()
            })
        }
    }

    async fn assign_role(&self, actor: &Actor, role_name: &str) -> Result<(), RoleServiceError> {
        let request = AssignRoleRequest { actor, role_name };
        self.post("assign-role", "role-assignments", &request)
            .await?;
        Ok(())
    }
}

pub fn create_http_role_service(
    base_url: &str,
    client: Client,
    request_timeout: Duration
) -> Result<Arc<dyn RoleService>, RoleServiceError> {
    Ok(Arc::new(HttpRoleService::new(base_url, client, request_timeout)?))
}
