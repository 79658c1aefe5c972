use serde::Deserialize;

/// Pagination metadata shared by every list response.
///
/// Decoded independently of the resources so that any page body can be
/// followed without knowing its resource shape.
#[derive(Debug, Default, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub next_url: Option<String>
}

#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub resources: Vec<T>
}

#[derive(Debug, Deserialize)]
pub struct Metadata {
    pub guid: String
}

/// An organization or space as listed by `/v2/organizations` and
/// `/v2/organizations/:guid/spaces`.
#[derive(Debug, Deserialize)]
pub struct MetadataResource {
    pub metadata: Metadata
}

#[derive(Debug, Deserialize)]
pub struct OrganizationUserResource {
    pub metadata: Metadata,
    pub entity: OrganizationUserEntity
}

#[derive(Debug, Deserialize)]
pub struct OrganizationUserEntity {
    #[serde(default)]
    pub organization_roles: Vec<String>
}

#[derive(Debug, Deserialize)]
pub struct SpaceUserResource {
    pub metadata: Metadata,
    pub entity: SpaceUserEntity
}

#[derive(Debug, Deserialize)]
pub struct SpaceUserEntity {
    #[serde(default)]
    pub space_roles: Vec<String>
}
