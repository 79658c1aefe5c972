//! Cloud Controller v2 routes walked by the retriever.

pub const ORGANIZATIONS: &str = "/v2/organizations";

pub fn organization_user_roles(org_guid: &str) -> String {
    format!("/v2/organizations/{}/user_roles", org_guid)
}

pub fn organization_spaces(org_guid: &str) -> String {
    format!("/v2/organizations/{}/spaces", org_guid)
}

pub fn space_user_roles(space_guid: &str) -> String {
    format!("/v2/spaces/{}/user_roles", space_guid)
}
