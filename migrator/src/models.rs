/// The roles one user holds on one organization or space.
///
/// `roles` are source tags such as `org_auditor` or `space_developer`;
/// they are normalized only when role names are derived for the destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAssignment {
    pub resource_guid: String,
    pub user_guid: String,
    pub roles: Vec<String>
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Organization {
    pub guid: String,
    pub assignments: Vec<RoleAssignment>
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Space {
    pub guid: String,
    pub org_guid: String,
    pub assignments: Vec<RoleAssignment>
}
