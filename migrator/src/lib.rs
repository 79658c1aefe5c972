//! Migration of Cloud Controller organization and space role assignments
//! into the Perm role service.
//!
//! A [`Retriever`] walks the source API and streams organizations, spaces and
//! failures to the [`Migrator`], which recreates roles and assignments
//! through a [`Populator`] and finally renders a deterministic report.

pub mod cloudcontroller;
pub mod error;
pub mod migration;
pub mod models;
pub mod perm;
pub mod populator;
pub mod reporter;
pub mod retriever;
pub mod roles;

pub use cloudcontroller::{CloudControllerClient, Fetched, PartialFetch, SourceClient};
pub use error::{ErrorEvent, MigrationError, RoleServiceError, RunError, SourceError};
pub use migration::{MigrationOutcome, Migrator, inventory};
pub use models::{Organization, RoleAssignment, Space};
pub use perm::{Actor, HttpRoleService, Permission, Role, RoleService, create_http_role_service};
pub use populator::Populator;
pub use reporter::{ErrorSummary, Reporter};
pub use retriever::Retriever;
pub use roles::{ResourceKind, RoleCatalog};
