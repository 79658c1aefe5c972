use migrator::RoleAssignment;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn assignment(resource_guid: &str, user_guid: &str, roles: &[&str]) -> RoleAssignment {
    RoleAssignment {
        resource_guid: resource_guid.to_string(),
        user_guid: user_guid.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect()
    }
}

/// A `/v2/organizations` or `/v2/organizations/:guid/spaces` page.
pub fn metadata_page(guids: &[&str], next_url: Option<&str>) -> Value {
    let resources: Vec<Value> = guids
        .iter()
        .map(|guid| json!({"metadata": {"guid": guid}}))
        .collect();
    json!({"next_url": next_url, "resources": resources})
}

pub fn org_user_roles_page(users: &[(&str, &[&str])], next_url: Option<&str>) -> Value {
    user_roles_page("organization_roles", users, next_url)
}

pub fn space_user_roles_page(users: &[(&str, &[&str])], next_url: Option<&str>) -> Value {
    user_roles_page("space_roles", users, next_url)
}

fn user_roles_page(field: &str, users: &[(&str, &[&str])], next_url: Option<&str>) -> Value {
    let resources: Vec<Value> = users
        .iter()
        .map(|(user, roles)| {
            let mut entity = serde_json::Map::new();
            entity.insert(field.to_string(), json!(roles));
            json!({"metadata": {"guid": user}, "entity": entity})
        })
        .collect();
    json!({"next_url": next_url, "resources": resources})
}

pub async fn mount_page(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub async fn mount_status(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Expected totals for the foundation mounted by [`mount_foundation`].
pub struct Foundation;

impl Foundation {
    pub const ORGANIZATIONS: usize = 2;
    pub const SPACES: usize = 2;
    pub const ASSIGNMENTS: usize = 5;
    /// Four organization roles per organization, three space roles per space.
    pub const ROLES_CREATED: usize = 14;
    /// One per (user, role) pair.
    pub const ROLES_ASSIGNED: usize = 7;
}

/// Mounts a Cloud Controller with two organizations listed across two pages,
/// each with one space.
///
/// | resource | users                                               |
/// |----------|-----------------------------------------------------|
/// | org-1    | user-a `org_auditor`, `org_manager`; user-b `org_auditor` |
/// | org-2    | user-c `org_user`                                   |
/// | space-1  | user-a `space_developer`                            |
/// | space-2  | user-c `space_manager`, `space_auditor`             |
pub async fn mount_foundation(server: &MockServer) {
    mount_page(
        server,
        "/v2/organizations",
        metadata_page(&["org-1"], Some("/v2/organizations/page-2"))
    )
    .await;
    mount_page(
        server,
        "/v2/organizations/page-2",
        metadata_page(&["org-2"], None)
    )
    .await;

    mount_page(
        server,
        "/v2/organizations/org-1/user_roles",
        org_user_roles_page(
            &[
                ("user-a", &["org_auditor", "org_manager"]),
                ("user-b", &["org_auditor"])
            ],
            None
        )
    )
    .await;
    mount_page(
        server,
        "/v2/organizations/org-2/user_roles",
        org_user_roles_page(&[("user-c", &["org_user"])], None)
    )
    .await;

    mount_page(
        server,
        "/v2/organizations/org-1/spaces",
        metadata_page(&["space-1"], None)
    )
    .await;
    mount_page(
        server,
        "/v2/organizations/org-2/spaces",
        metadata_page(&["space-2"], None)
    )
    .await;

    mount_page(
        server,
        "/v2/spaces/space-1/user_roles",
        space_user_roles_page(&[("user-a", &["space_developer"])], None)
    )
    .await;
    mount_page(
        server,
        "/v2/spaces/space-2/user_roles",
        space_user_roles_page(&[("user-c", &["space_manager", "space_auditor"])], None)
    )
    .await;
}

pub const ISSUER: &str = "https://uaa.example.com/oauth/token";

/// Mounts the UAA token endpoint, and the OIDC discovery document unless
/// `issuer` is `None`.
pub async fn mount_uaa(server: &MockServer, issuer: Option<&str>) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "some-token",
            "token_type": "bearer",
            "expires_in": 3600
        })))
        .mount(server)
        .await;

    if let Some(issuer) = issuer {
        Mock::given(method("GET"))
            .and(path("/oauth/token/.well-known/openid-configuration"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"issuer": issuer})))
            .mount(server)
            .await;
    }
}
