use async_trait::async_trait;
use migrator::{Actor, Permission, Role, RoleService, RoleServiceError};
use parking_lot::Mutex;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleCall {
    pub name: String,
    pub permissions: Vec<Permission>
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignRoleCall {
    pub actor: Actor,
    pub role_name: String
}

/// In-memory role service that records every call it receives.
#[derive(Debug, Default)]
pub struct FakeRoleService {
    create_calls: Mutex<Vec<CreateRoleCall>>,
    assign_calls: Mutex<Vec<AssignRoleCall>>,
    failing_roles: HashSet<String>,
    failing_assignments: HashSet<String>
}

impl FakeRoleService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects every create-role call for `role_name`.
    pub fn fail_create_role(mut self, role_name: &str) -> Self {
        self.failing_roles.insert(role_name.to_string());
        self
    }

    /// Rejects every assign-role call targeting `role_name`.
    pub fn fail_assign_role(mut self, role_name: &str) -> Self {
        self.failing_assignments.insert(role_name.to_string());
        self
    }

    pub fn create_calls(&self) -> Vec<CreateRoleCall> {
        self.create_calls.lock().clone()
    }

    pub fn assign_calls(&self) -> Vec<AssignRoleCall> {
        self.assign_calls.lock().clone()
    }

    pub fn create_call_count(&self) -> usize {
        self.create_calls.lock().len()
    }

    pub fn assign_call_count(&self) -> usize {
        self.assign_calls.lock().len()
    }

    pub fn assigned_role_names(&self) -> Vec<String> {
        self.assign_calls
            .lock()
            .iter()
            .map(|call| call.role_name.clone())
            .collect()
    }
}

fn rejected(operation: &str, role_name: &str) -> RoleServiceError {
    RoleServiceError::Rejected {
        operation: operation.to_string(),
        status: 500,
        message: format!("injected failure for {}", role_name)
    }
}

#[async_trait]
impl RoleService for FakeRoleService {
    async fn create_role(
        &self,
        name: &str,
        permissions: Vec<Permission>
    ) -> Result<Role, RoleServiceError> {
        self.create_calls.lock().push(CreateRoleCall {
            name: name.to_string(),
            permissions
        });

        if self.failing_roles.contains(name) {
            return Err(rejected("create-role", name));
        }

        Ok(Role {
            name: name.to_string()
        })
    }

    async fn assign_role(&self, actor: &Actor, role_name: &str) -> Result<(), RoleServiceError> {
        self.assign_calls.lock().push(AssignRoleCall {
            actor: actor.clone(),
            role_name: role_name.to_string()
        });

        if self.failing_assignments.contains(role_name) {
            return Err(rejected("assign-role", role_name));
        }

        Ok(())
    }
}
