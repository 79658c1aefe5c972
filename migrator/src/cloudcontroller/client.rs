use super::responses::{
    Envelope, MetadataResource, OrganizationUserResource, Page, SpaceUserResource
};
use super::{Fetched, PartialFetch, SourceClient, routes};
use crate::error::{ErrorEvent, SourceError, SourceResult};
use crate::models::RoleAssignment;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Cloud Controller client built on an already-authenticated HTTP client.
pub struct CloudControllerClient {
    host: Url,
    http: Client,
    request_timeout: Duration
}

impl CloudControllerClient {
    pub fn new(host: &str, http: Client, request_timeout: Duration) -> SourceResult<Self> {
        let host = Url::parse(host).map_err(|e| SourceError::InvalidRoute {
            route: host.to_string(),
            reason: e.to_string()
        })?;

        Ok(Self {
            host,
            http,
            request_timeout
        })
    }

    fn resolve(&self, route: &str) -> SourceResult<Url> {
        self.host
            .join(route)
            .map_err(|e| SourceError::InvalidRoute {
                route: route.to_string(),
                reason: e.to_string()
            })
    }

    /// Walks `route` page by page, following `next_url` until it is absent.
    ///
    /// `on_page` receives every page body intact. Pagination stops at the
    /// first failure: a status of 400 or above, a body that is not a
    /// pagination envelope, or an error returned by `on_page`.
    pub async fn paginated_get<F>(&self, route: &str, mut on_page: F) -> SourceResult<()>
    where
        F: FnMut(&[u8]) -> SourceResult<()> + Send
    {
        let mut route = route.to_string();

        loop {
            let url = self.resolve(&route)?;
            debug!(route = %route, "Making Cloud Controller request");

            let response = self
                .http
                .get(url)
                .header(ACCEPT, "application/json")
                .timeout(self.request_timeout)
                .send()
                .await
                .inspect_err(|e| warn!(route = %route, error = %e, "Failed to perform request"))?;

            let status = response.status();
            if status.is_client_error() || status.is_server_error() {
                warn!(route = %route, status = status.as_u16(), "Cloud Controller returned an error status");
                return Err(SourceError::BadStatus {
                    status: status.as_u16()
                });
            }

            let body = response.bytes().await?;

            let envelope: Envelope = serde_json::from_slice(&body)
                .inspect_err(|e| warn!(route = %route, error = %e, "Failed to decode response"))?;

            on_page(&body[..])?;

            match envelope.next_url {
                Some(next_url) => route = next_url,
                None => return Ok(())
            }
        }
    }

    async fn collect<R, T, F>(&self, route: &str, guid: &str, convert: F) -> Fetched<T>
    where
        R: DeserializeOwned + Send,
        T: Send,
        F: Fn(R) -> T + Send + Sync
    {
        let mut items = Vec::new();

        let outcome = self
            .paginated_get(route, |body| {
                let page: Page<R> = serde_json::from_slice(body)?;
                items.extend(page.resources.into_iter().map(&convert));
                Ok(())
            })
            .await;

        match outcome {
            Ok(()) => Ok(items),
            Err(cause) => {
                warn!(
                    route = %route,
                    retained = items.len(),
                    error = %cause,
                    "Failed to fetch resources"
                );
                metrics::counter!("migrator_fetch_errors_total").increment(1);
                Err(PartialFetch {
                    retained: items,
                    error: ErrorEvent::new(route, guid, cause).into()
                })
            }
        }
    }
}

#[async_trait]
impl SourceClient for CloudControllerClient {
    async fn org_guids(&self) -> Fetched<String> {
        self.collect(routes::ORGANIZATIONS, "", |r: MetadataResource| {
            r.metadata.guid
        })
        .await
    }

    async fn space_guids(&self, org_guid: &str) -> Fetched<String> {
        let route = routes::organization_spaces(org_guid);
        self.collect(&route, org_guid, |r: MetadataResource| r.metadata.guid)
            .await
    }

    async fn org_role_assignments(&self, org_guid: &str) -> Fetched<RoleAssignment> {
        let route = routes::organization_user_roles(org_guid);
        self.collect(&route, org_guid, |r: OrganizationUserResource| {
            RoleAssignment {
                resource_guid: org_guid.to_string(),
                user_guid: r.metadata.guid,
                roles: r.entity.organization_roles
            }
        })
        .await
    }

    async fn space_role_assignments(&self, space_guid: &str) -> Fetched<RoleAssignment> {
        let route = routes::space_user_roles(space_guid);
        self.collect(&route, space_guid, |r: SpaceUserResource| RoleAssignment {
            resource_guid: space_guid.to_string(),
            user_guid: r.metadata.guid,
            roles: r.entity.space_roles
        })
        .await
    }
}
