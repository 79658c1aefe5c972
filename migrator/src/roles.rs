//! Naming policy for destination roles.
//!
//! Every organization and space gets its own copy of a fixed set of roles,
//! named `<kind>-<role>-<guid>`. Source role tags (`org_auditor`,
//! `space-developer`, `billing_manager`) are normalized by dropping the
//! redundant kind prefix before they are mapped onto those names.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Organization,
    Space
}

impl ResourceKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Organization => "org",
            Self::Space => "space"
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization => write!(f, "organization"),
            Self::Space => write!(f, "space")
        }
    }
}

/// The canonical roles created for each resource kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCatalog {
    organization_roles: Vec<String>,
    space_roles: Vec<String>
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::new(
            ["auditor", "billing_manager", "manager", "user"],
            ["auditor", "developer", "manager"]
        )
    }
}

impl RoleCatalog {
    pub fn new<O, S>(organization_roles: O, space_roles: S) -> Self
    where
        O: IntoIterator,
        O::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>
    {
        Self {
            organization_roles: organization_roles.into_iter().map(Into::into).collect(),
            space_roles: space_roles.into_iter().map(Into::into).collect()
        }
    }

    pub fn roles(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::Organization => &self.organization_roles,
            ResourceKind::Space => &self.space_roles
        }
    }

    /// Strips every leading `<prefix>_` or `<prefix>-` from a source role tag.
    pub fn normalize<'a>(&self, kind: ResourceKind, role: &'a str) -> &'a str {
        let prefix = kind.prefix();
        let mut role = role;
        while let Some(rest) = role
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix('_').or_else(|| rest.strip_prefix('-')))
        {
            role = rest;
        }
        role
    }

    pub fn role_name(&self, kind: ResourceKind, role: &str, resource_guid: &str) -> String {
        format!(
            "{}-{}-{}",
            kind.prefix(),
            self.normalize(kind, role),
            resource_guid
        )
    }

    pub fn permission_name(&self, kind: ResourceKind, role: &str) -> String {
        format!("{}.{}", kind.prefix(), self.normalize(kind, role))
    }
}
